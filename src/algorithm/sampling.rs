//! Weighted random draws shared by the repair handlers and the generator
//!
//! All randomness flows through an injected `Rng` so runs are reproducible
//! with a seeded generator.

use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;

/// Draw one index with probability proportional to its weight
///
/// Negative or non-finite weights count as zero. When every weight is zero the
/// draw falls back to uniform. Returns `None` only for an empty slice.
pub fn weighted_choice<R: Rng>(weights: &[f64], rng: &mut R) -> Option<usize> {
    if weights.is_empty() {
        return None;
    }

    let sanitized: Vec<f64> = weights
        .iter()
        .map(|&w| if w.is_finite() && w > 0.0 { w } else { 0.0 })
        .collect();

    match WeightedIndex::new(&sanitized) {
        Ok(dist) => Some(dist.sample(rng)),
        Err(_) => Some(rng.random_range(0..weights.len())),
    }
}

/// Draw up to `amount` distinct indices, each step weighted over what remains
///
/// Indices are returned in draw order. Asking for more than `weights.len()`
/// returns every index.
pub fn weighted_sample<R: Rng>(weights: &[f64], amount: usize, rng: &mut R) -> Vec<usize> {
    let mut remaining: Vec<usize> = (0..weights.len()).collect();
    let amount = amount.min(remaining.len());
    let mut chosen = Vec::with_capacity(amount);

    while chosen.len() < amount {
        let current: Vec<f64> = remaining.iter().map(|&idx| weights[idx]).collect();
        let Some(pick) = weighted_choice(&current, rng) else {
            break;
        };
        chosen.push(remaining.swap_remove(pick));
    }

    chosen
}

/// Scale weights so they sum to one, or leave them uniform if they sum to zero
pub fn normalize(weights: &mut [f64]) {
    if weights.is_empty() {
        return;
    }

    let total: f64 = weights.iter().sum();
    if total > 0.0 && total.is_finite() {
        for w in weights.iter_mut() {
            *w /= total;
        }
    } else {
        let uniform = 1.0 / weights.len() as f64;
        weights.fill(uniform);
    }
}
