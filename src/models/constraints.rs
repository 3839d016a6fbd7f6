//! Declarative constraint set
//!
//! Three relations restrict what a row may contain: mutually exclusive codes,
//! codes that oblige an answer to another question, and per-question bounds
//! on the number of selected codes.

use std::fmt;

use rustc_hash::FxHashMap;

use super::code::canonical;
use super::domains::Domains;
use crate::error::{Result, SurveyError};

/// Constraints supplied alongside the questionnaire
#[derive(Debug, Clone, Default)]
pub struct ConstraintSet {
    /// Maximum number of selected codes per question
    pub max_answers: Vec<usize>,
    /// Minimum number of selected codes per question
    pub min_answers: Vec<usize>,
    /// Code to the codes that must not appear in the same row
    pub exceptions: FxHashMap<String, Vec<String>>,
    /// Code to a list containing the whole domain of each question it obliges
    pub required: FxHashMap<String, Vec<String>>,
}

impl ConstraintSet {
    /// Default conditions: exactly one answer per question and no cross-question rules
    #[must_use]
    pub fn defaults(question_count: usize) -> Self {
        Self {
            max_answers: vec![1; question_count],
            min_answers: vec![1; question_count],
            exceptions: FxHashMap::default(),
            required: FxHashMap::default(),
        }
    }

    /// Excluded partners of a code, if it has any
    #[must_use]
    pub fn exceptions_for(&self, code: &str) -> Option<&[String]> {
        self.exceptions.get(canonical(code)).map(Vec::as_slice)
    }

    /// Required list of a code, if it has one
    #[must_use]
    pub fn required_for(&self, code: &str) -> Option<&[String]> {
        self.required.get(canonical(code)).map(Vec::as_slice)
    }

    /// Check the bounds against the questionnaire
    ///
    /// Bounds must exist for every question, `min <= max`, and `min` must not
    /// exceed the domain size since no repair could ever satisfy it.
    pub fn validate_against(&self, domains: &Domains) -> Result<()> {
        let question_count = domains.len();

        if self.max_answers.len() != question_count {
            return Err(SurveyError::structural(format!(
                "Expected {question_count} maximum bounds, found {}",
                self.max_answers.len()
            )));
        }
        if self.min_answers.len() != question_count {
            return Err(SurveyError::structural(format!(
                "Expected {question_count} minimum bounds, found {}",
                self.min_answers.len()
            )));
        }

        for (question, (&min, &max)) in self.min_answers.iter().zip(&self.max_answers).enumerate() {
            if min > max {
                return Err(SurveyError::structural(format!(
                    "Question {}: minimum {min} exceeds maximum {max}",
                    question + 1
                )));
            }
            let domain_size = domains.domain(question).len();
            if min > domain_size {
                return Err(SurveyError::structural(format!(
                    "Question {}: minimum {min} exceeds the {domain_size} available answers",
                    question + 1
                )));
            }
        }

        Ok(())
    }
}

impl fmt::Display for ConstraintSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Constraint Set:")?;
        writeln!(f, "  Questions: {}", self.max_answers.len())?;
        writeln!(f, "  Exception rules: {}", self.exceptions.len())?;
        writeln!(f, "  Required rules: {}", self.required.len())
    }
}
