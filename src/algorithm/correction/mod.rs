//! Iterative correction of an answer set
//!
//! Every pass snapshots the violations and the frequency table, repairs each
//! offending row, deletes duplicates, then detects again. The loop ends when a
//! detection comes back empty or the pass limit is reached.

pub mod handlers;

use log::debug;
use rand::Rng;

use crate::algorithm::frequency::FrequencyTable;
use crate::algorithm::validation::{ViolationKind, detect_violations};
use crate::error::{Result, SurveyError};
use crate::models::{AnswerSet, SurveySchema};
use crate::utils::logging::{RepairEvent, RepairObserver};

pub use handlers::{LimitSelection, RowRepair, apply_repairs};

/// Default bound on repair passes
pub const DEFAULT_MAX_PASSES: usize = 100;

/// Answer set that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrectionOutcome {
    /// Repaired rows
    pub answers: AnswerSet,
    /// Repair passes that were needed, zero if the input was already clean
    pub passes: usize,
}

/// Runs the detect-repair loop against one schema
#[derive(Debug, Clone, Copy)]
pub struct Corrector<'a> {
    schema: &'a SurveySchema,
    static_error: f64,
    max_passes: usize,
}

impl<'a> Corrector<'a> {
    /// Create a corrector with the default pass limit
    #[must_use]
    pub const fn new(schema: &'a SurveySchema, static_error: f64) -> Self {
        Self {
            schema,
            static_error,
            max_passes: DEFAULT_MAX_PASSES,
        }
    }

    /// Override the pass limit
    #[must_use]
    pub const fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes;
        self
    }

    /// Schema rows are checked against
    #[must_use]
    pub const fn schema(&self) -> &'a SurveySchema {
        self.schema
    }

    /// Repair `answers` until no violation remains
    ///
    /// Duplicate rows are deleted at the end of the pass that found them, in
    /// ascending order of their index at detection time.
    ///
    /// # Errors
    ///
    /// Returns [`SurveyError::Convergence`] when violations remain after the
    /// configured number of passes.
    pub fn run<R: Rng>(
        &self,
        mut answers: AnswerSet,
        rng: &mut R,
        observer: &mut dyn RepairObserver,
    ) -> Result<CorrectionOutcome> {
        let domains = self.schema.domains();
        let mut passes = 0;
        let mut report = detect_violations(&answers, self.schema);

        while !report.is_empty() {
            if passes >= self.max_passes {
                return Err(SurveyError::Convergence { passes });
            }
            passes += 1;
            debug!("Correction pass {passes}: {} rows with violations", report.len());

            for record in &report {
                observer.on_event(&RepairEvent::Violations {
                    row: record.row_index,
                    messages: record.messages(),
                });
            }

            let frequencies = FrequencyTable::compute(&answers, domains, self.static_error);
            let mut duplicates = Vec::new();

            for record in &report {
                let kinds = record.kinds();
                if kinds.contains(&ViolationKind::Repeated) {
                    duplicates.push(record.row_index);
                    continue;
                }

                let row = record.row_index;
                let repair = apply_repairs(&mut answers[row], &kinds, self.schema, &frequencies, rng);
                report_repair(row, repair, observer);
            }

            for (deleted, &row) in duplicates.iter().enumerate() {
                answers.remove(row - deleted);
                observer.on_event(&RepairEvent::RowDeleted { row });
            }

            report = detect_violations(&answers, self.schema);
        }

        observer.on_event(&RepairEvent::Converged { passes });
        Ok(CorrectionOutcome { answers, passes })
    }
}

fn report_repair(row: usize, repair: RowRepair, observer: &mut dyn RepairObserver) {
    for selection in repair.selections {
        observer.on_event(&RepairEvent::LimitSelection {
            row,
            question: selection.question,
            candidates: selection.candidates,
            kept: selection.kept,
        });
    }
    if !repair.removed.is_empty() {
        observer.on_event(&RepairEvent::CodesRemoved {
            row,
            codes: repair.removed,
        });
    }
    if !repair.added.is_empty() {
        observer.on_event(&RepairEvent::CodesAdded {
            row,
            codes: repair.added,
        });
    }
}
