//! Validated bundle of everything a row is checked against

use rustc_hash::FxHashSet;

use super::code::canonical;
use super::constraints::ConstraintSet;
use super::domains::Domains;
use crate::error::Result;

/// Domains, constraints and ignored codes, checked for structural consistency
#[derive(Debug, Clone)]
pub struct SurveySchema {
    domains: Domains,
    constraints: ConstraintSet,
    /// Ignored codes in configuration order, appended verbatim to generated rows
    ignored_codes: Vec<String>,
    ignored_lookup: FxHashSet<String>,
    may_repeat: bool,
}

impl SurveySchema {
    /// Create a schema, failing fast on structural problems
    pub fn new(
        domains: Domains,
        constraints: ConstraintSet,
        ignored_codes: Vec<String>,
        may_repeat: bool,
    ) -> Result<Self> {
        constraints.validate_against(&domains)?;

        let ignored_lookup = ignored_codes
            .iter()
            .map(|code| canonical(code).to_string())
            .collect();

        Ok(Self {
            domains,
            constraints,
            ignored_codes,
            ignored_lookup,
            may_repeat,
        })
    }

    /// Question domains
    #[must_use]
    pub const fn domains(&self) -> &Domains {
        &self.domains
    }

    /// Constraint relations and bounds
    #[must_use]
    pub const fn constraints(&self) -> &ConstraintSet {
        &self.constraints
    }

    /// Ignored codes in configuration order
    #[must_use]
    pub fn ignored_codes(&self) -> &[String] {
        &self.ignored_codes
    }

    /// Whether identical rows are allowed
    #[must_use]
    pub const fn may_repeat(&self) -> bool {
        self.may_repeat
    }

    /// Check if a code is on the ignored allowlist
    #[must_use]
    pub fn is_ignored(&self, code: &str) -> bool {
        self.ignored_lookup.contains(canonical(code))
    }

    /// A code that belongs to no domain and is not ignored
    #[must_use]
    pub fn is_unnecessary(&self, code: &str) -> bool {
        !self.domains.contains(code) && !self.is_ignored(code)
    }

    /// Maximum selected codes for a question
    #[must_use]
    pub fn max_answers(&self, question: usize) -> usize {
        self.constraints.max_answers[question]
    }

    /// Minimum selected codes for a question
    #[must_use]
    pub fn min_answers(&self, question: usize) -> usize {
        self.constraints.min_answers[question]
    }
}
