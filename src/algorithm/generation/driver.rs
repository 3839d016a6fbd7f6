//! Synthetic row construction
//!
//! A row is built by drawing questions from a shrinking pool weighted by how
//! many strong pairs they start, sampling each drawn question, then cascading
//! to its strongly paired questions and to the questions its codes oblige.
//! Every question leaves the pool exactly once, so a row always terminates.

use rand::Rng;

use super::sampler::{AnswerSampler, SampledCodes};
use crate::algorithm::frequency::{AnswerCountDistribution, FrequencyTable};
use crate::algorithm::sampling::weighted_choice;
use crate::models::{AnswerRow, AnswerSet, ClusterAnalytics, SurveySchema, sort_row};

/// One generated row together with how it was built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedRow {
    /// Sampled codes in draw order, without the ignored codes
    pub sampled: AnswerRow,
    /// Questions in the order they left the pool
    pub resolved: Vec<usize>,
    /// Final row: sampled codes plus ignored codes, sorted
    pub row: AnswerRow,
}

/// Pool and output of the row being built
struct RowState {
    remaining: Vec<(usize, f64)>,
    sampled: AnswerRow,
    resolved: Vec<usize>,
}

impl RowState {
    fn new(remaining: Vec<(usize, f64)>) -> Self {
        let capacity = remaining.len();
        Self {
            remaining,
            sampled: Vec::with_capacity(capacity),
            resolved: Vec::with_capacity(capacity),
        }
    }

    fn contains(&self, question: usize) -> bool {
        self.remaining.iter().any(|&(q, _)| q == question)
    }

    /// Remove a question from the pool, returning false if it already left
    fn take(&mut self, question: usize) -> bool {
        match self.remaining.iter().position(|&(q, _)| q == question) {
            Some(pos) => {
                self.remaining.remove(pos);
                self.resolved.push(question);
                true
            }
            None => false,
        }
    }

    fn draw<R: Rng>(&mut self, rng: &mut R) -> Option<usize> {
        let weights: Vec<f64> = self.remaining.iter().map(|&(_, w)| w).collect();
        let pick = weighted_choice(&weights, rng)?;
        let (question, _) = self.remaining.remove(pick);
        self.resolved.push(question);
        Some(question)
    }

    fn record(&mut self, codes: &SampledCodes) {
        self.sampled.extend(codes.iter().cloned());
    }
}

/// Generates rows for one cluster from read-only tables
#[derive(Debug, Clone, Copy)]
pub struct Generator<'a> {
    schema: &'a SurveySchema,
    sampler: AnswerSampler<'a>,
    analytics: &'a ClusterAnalytics,
}

impl<'a> Generator<'a> {
    /// Create a generator over the cluster's tables
    #[must_use]
    pub const fn new(
        schema: &'a SurveySchema,
        frequencies: &'a FrequencyTable,
        counts: &'a AnswerCountDistribution,
        analytics: &'a ClusterAnalytics,
    ) -> Self {
        Self {
            schema,
            sampler: AnswerSampler::new(schema.domains(), frequencies, counts),
            analytics,
        }
    }

    /// Build one row
    pub fn generate_row<R: Rng>(&self, rng: &mut R) -> GeneratedRow {
        let pairs = &self.analytics.strong_pairs;
        let pool = (0..self.schema.domains().len())
            .map(|question| (question, (pairs.out_degree(question) + 1) as f64))
            .collect();
        let mut state = RowState::new(pool);

        while let Some(question) = state.draw(rng) {
            let codes = self.sampler.sample(question, &[], rng);
            state.record(&codes);

            let mut targets: Vec<usize> = Vec::new();
            for target in pairs.targets(question) {
                if state.contains(target) && !targets.contains(&target) {
                    targets.push(target);
                }
            }
            if targets.is_empty() {
                continue;
            }

            for code in &codes {
                let context = self.analytics.rules.context_for(code);
                for &target in &targets {
                    if !state.take(target) {
                        continue;
                    }
                    let target_codes = self.sampler.sample(target, &context, rng);
                    state.record(&target_codes);
                    self.resolve_required(&target_codes, &targets, &context, &mut state, rng);
                }
            }
        }

        let mut row = state.sampled.clone();
        row.extend(self.schema.ignored_codes().iter().cloned());
        sort_row(&mut row);

        GeneratedRow {
            sampled: state.sampled,
            resolved: state.resolved,
            row,
        }
    }

    /// Build `count` rows
    pub fn generate<R: Rng>(&self, count: usize, rng: &mut R) -> AnswerSet {
        (0..count).map(|_| self.generate_row(rng).row).collect()
    }

    /// Answer every still-pooled question obliged by `seeds`, and by what that yields
    fn resolve_required<R: Rng>(
        &self,
        seeds: &SampledCodes,
        direct_targets: &[usize],
        context: &[(String, f64)],
        state: &mut RowState,
        rng: &mut R,
    ) {
        let domains = self.schema.domains();
        let constraints = self.schema.constraints();
        let mut pending: Vec<String> = seeds.to_vec();

        while let Some(code) = pending.pop() {
            let Some(required) = constraints.required_for(&code) else {
                continue;
            };
            let obliged: Vec<usize> = domains.questions_within(required).collect();
            for question in obliged {
                if direct_targets.contains(&question) || !state.take(question) {
                    continue;
                }
                let codes = self.sampler.sample(question, context, rng);
                state.record(&codes);
                pending.extend(codes);
            }
        }
    }
}
