//! Frequency estimation over question domains
//!
//! The frequency table is recomputed on every correction pass and once per
//! cluster before generation, since repairs shift the observed distribution.

use rand::Rng;

use super::sampling::{normalize, weighted_choice};
use crate::models::{AnswerRow, Domains};

/// Smoothed probability of every domain code, per question
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyTable {
    masses: Vec<Vec<f64>>,
}

impl FrequencyTable {
    /// Estimate frequencies from an answer set
    ///
    /// Each code's raw mass is its occurrence count divided by the number of
    /// rows. With `static_error > 0` every mass becomes `x + (1 - x) * e`.
    /// Each question's distribution is then normalized to sum to one.
    #[must_use]
    pub fn compute(answers: &[AnswerRow], domains: &Domains, static_error: f64) -> Self {
        let mut masses: Vec<Vec<f64>> = domains.iter().map(|domain| vec![0.0; domain.len()]).collect();

        if !answers.is_empty() {
            let row_share = 1.0 / answers.len() as f64;
            for code in answers.iter().flatten() {
                if let Some((question, position)) = domains.locate(code) {
                    masses[question][position] += row_share;
                }
            }
        }

        for question in &mut masses {
            if static_error > 0.0 {
                for x in question.iter_mut() {
                    *x += (1.0 - *x) * static_error;
                }
            }
            normalize(question);
        }

        Self { masses }
    }

    /// Distribution of one question, aligned with its domain
    #[must_use]
    pub fn question(&self, question: usize) -> &[f64] {
        &self.masses[question]
    }

    /// Mass of a code, zero if it belongs to no domain
    #[must_use]
    pub fn mass_of(&self, domains: &Domains, code: &str) -> f64 {
        domains
            .locate(code)
            .map_or(0.0, |(question, position)| self.masses[question][position])
    }

    /// Number of questions covered
    #[must_use]
    pub fn len(&self) -> usize {
        self.masses.len()
    }

    /// Check if the table covers no questions
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.masses.is_empty()
    }
}

/// Probability of a respondent selecting 0..=max codes, per question
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerCountDistribution {
    probabilities: Vec<Vec<f64>>,
}

impl AnswerCountDistribution {
    /// Use precomputed probabilities, indexed by question then by count
    #[must_use]
    pub fn from_probabilities(probabilities: Vec<Vec<f64>>) -> Self {
        Self { probabilities }
    }

    /// Relative frequency of each selection count among `answers`
    ///
    /// Counts above a question's maximum are dropped rather than clamped.
    #[must_use]
    pub fn from_answers(answers: &[AnswerRow], domains: &Domains, max_answers: &[usize]) -> Self {
        let mut probabilities: Vec<Vec<f64>> =
            max_answers.iter().map(|&max| vec![0.0; max + 1]).collect();

        if !answers.is_empty() {
            let row_share = 1.0 / answers.len() as f64;
            for row in answers {
                for (question, count) in domains.count_per_question(row).into_iter().enumerate() {
                    if let Some(slot) = probabilities
                        .get_mut(question)
                        .and_then(|counts| counts.get_mut(count))
                    {
                        *slot += row_share;
                    }
                }
            }
        }

        Self { probabilities }
    }

    /// Probabilities for one question, indexed by count
    #[must_use]
    pub fn question(&self, question: usize) -> &[f64] {
        self.probabilities
            .get(question)
            .map_or(&[][..], Vec::as_slice)
    }

    /// Draw how many codes to select for a question
    ///
    /// A question with no recorded distribution selects nothing. A distribution
    /// whose mass is all zero is treated as uniform over its counts.
    pub fn draw<R: Rng>(&self, question: usize, rng: &mut R) -> usize {
        weighted_choice(self.question(question), rng).unwrap_or(0)
    }
}
