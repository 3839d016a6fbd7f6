//! Per-question answer sampling

use rand::Rng;
use smallvec::SmallVec;

use crate::algorithm::frequency::{AnswerCountDistribution, FrequencyTable};
use crate::algorithm::sampling::{normalize, weighted_sample};
use crate::models::Domains;

/// Codes sampled for one question
pub type SampledCodes = SmallVec<[String; 4]>;

/// Draws a weighted, without-replacement answer for one question
///
/// Holds only shared references, so one sampler can be used from many
/// workers at once as long as each brings its own random source.
#[derive(Debug, Clone, Copy)]
pub struct AnswerSampler<'a> {
    domains: &'a Domains,
    frequencies: &'a FrequencyTable,
    counts: &'a AnswerCountDistribution,
}

impl<'a> AnswerSampler<'a> {
    /// Create a sampler over fixed tables
    #[must_use]
    pub const fn new(
        domains: &'a Domains,
        frequencies: &'a FrequencyTable,
        counts: &'a AnswerCountDistribution,
    ) -> Self {
        Self {
            domains,
            frequencies,
            counts,
        }
    }

    /// Question domains the sampler draws from
    #[must_use]
    pub const fn domains(&self) -> &'a Domains {
        self.domains
    }

    /// Sample the answer to `question`
    ///
    /// When `context` holds consequents that belong to the question, the draw
    /// is restricted to them and weighted by rule confidence. Otherwise the
    /// whole domain is used, weighted by the frequency table. In both cases the
    /// number of codes comes from the answer-count distribution, capped at the
    /// number of candidates.
    pub fn sample<R: Rng>(
        &self,
        question: usize,
        context: &[(String, f64)],
        rng: &mut R,
    ) -> SampledCodes {
        let domain = self.domains.domain(question);
        let desired = self.counts.draw(question, rng);

        let mut positions: Vec<usize> = Vec::new();
        let mut confidences: Vec<f64> = Vec::new();
        for (code, confidence) in context {
            if let Some((target, position)) = self.domains.locate(code) {
                if target == question && !positions.contains(&position) {
                    positions.push(position);
                    confidences.push(*confidence);
                }
            }
        }

        if positions.is_empty() {
            return weighted_sample(self.frequencies.question(question), desired, rng)
                .into_iter()
                .map(|position| domain[position].clone())
                .collect();
        }

        normalize(&mut confidences);
        weighted_sample(&confidences, desired, rng)
            .into_iter()
            .map(|idx| domain[positions[idx]].clone())
            .collect()
    }
}
