//! Violation detection
//!
//! Scans an answer set against a [`SurveySchema`] and reports, per row, every
//! constraint violation with a human-readable message and a kind tag.

use std::collections::BTreeSet;
use std::fmt;

use itertools::Itertools;
use rustc_hash::FxHashMap;

use crate::models::{AnswerRow, SurveySchema, canonical};

/// Kind of constraint a row violates
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ViolationKind {
    /// Same code set as an earlier row
    Repeated,
    /// Two mutually exclusive codes are both present
    Exception,
    /// An obligation to answer another question is unmet
    Required,
    /// A code belongs to no question and is not ignored
    Unnecessary,
    /// A question has more selected codes than allowed
    MaxLimit,
    /// A question has fewer selected codes than required
    MinLimit,
}

impl ViolationKind {
    /// Stable tag for reports
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Repeated => "repeated_answer",
            Self::Exception => "exception_answer",
            Self::Required => "required_answer",
            Self::Unnecessary => "unnecessary_answer",
            Self::MaxLimit => "max_limit_answer",
            Self::MinLimit => "min_limit_answer",
        }
    }

    /// Whether the limit handler deals with this kind
    #[must_use]
    pub const fn is_limit(self) -> bool {
        matches!(self, Self::MaxLimit | Self::MinLimit)
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// One violation found in a row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Kind tag
    pub kind: ViolationKind,
    /// Human-readable description
    pub message: String,
}

/// All violations of one row, in detection order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowViolations {
    /// 0-based row index in the scanned answer set
    pub row_index: usize,
    /// Violations in the order they were found
    pub violations: Vec<Violation>,
}

impl RowViolations {
    /// Distinct violation kinds present in the row
    #[must_use]
    pub fn kinds(&self) -> BTreeSet<ViolationKind> {
        self.violations.iter().map(|v| v.kind).collect()
    }

    /// Check if the row has a violation of the given kind
    #[must_use]
    pub fn has(&self, kind: ViolationKind) -> bool {
        self.violations.iter().any(|v| v.kind == kind)
    }

    /// Messages in detection order
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(|v| v.message.clone()).collect()
    }
}

/// Check every row of an answer set
///
/// Returns one record per offending row; an empty vector means the set is
/// clean. A row repeating an earlier one is reported only as a duplicate.
#[must_use]
pub fn detect_violations(answers: &[AnswerRow], schema: &SurveySchema) -> Vec<RowViolations> {
    let mut seen_rows: FxHashMap<Vec<&str>, usize> = FxHashMap::default();
    let mut report = Vec::new();

    for (row_index, row) in answers.iter().enumerate() {
        let violations = if schema.may_repeat() {
            check_row(row, schema)
        } else {
            let key: Vec<&str> = row.iter().map(String::as_str).sorted_unstable().collect();

            match seen_rows.get(&key) {
                Some(&first) => vec![Violation {
                    kind: ViolationKind::Repeated,
                    message: format!("Row {} duplicates row {}", row_index + 1, first + 1),
                }],
                None => {
                    seen_rows.insert(key, row_index);
                    check_row(row, schema)
                }
            }
        };

        if !violations.is_empty() {
            report.push(RowViolations {
                row_index,
                violations,
            });
        }
    }

    report
}

/// Per-code and per-question checks for one row
fn check_row(row: &[String], schema: &SurveySchema) -> Vec<Violation> {
    let domains = schema.domains();
    let constraints = schema.constraints();
    let present: BTreeSet<&str> = row.iter().map(|code| canonical(code)).collect();
    let mut violations = Vec::new();

    for code in row {
        if let Some(excluded) = constraints.exceptions_for(code) {
            for partner in excluded {
                if present.contains(canonical(partner)) {
                    violations.push(Violation {
                        kind: ViolationKind::Exception,
                        message: format!("Answer {code} does not allow answer {partner}"),
                    });
                }
            }
        }

        if let Some(required) = constraints.required_for(code) {
            for question in domains.questions_within(required) {
                if !domains.is_represented(question, row) {
                    violations.push(Violation {
                        kind: ViolationKind::Required,
                        message: format!(
                            "Answer {code} requires one of: {}",
                            domains.domain(question).join(",")
                        ),
                    });
                }
            }
        }

        if schema.is_unnecessary(code) {
            violations.push(Violation {
                kind: ViolationKind::Unnecessary,
                message: format!("Answer {code} is not part of the questionnaire"),
            });
        }
    }

    for (question, count) in domains.count_per_question(row).into_iter().enumerate() {
        let max = schema.max_answers(question);
        let min = schema.min_answers(question);
        if count > max {
            violations.push(Violation {
                kind: ViolationKind::MaxLimit,
                message: format!("Question {}: too many answers, maximum {max}", question + 1),
            });
        }
        if count < min {
            violations.push(Violation {
                kind: ViolationKind::MinLimit,
                message: format!("Question {}: too few answers, minimum {min}", question + 1),
            });
        }
    }

    violations
}
