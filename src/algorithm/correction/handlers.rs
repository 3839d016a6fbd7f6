//! Repair handlers, one per violation kind
//!
//! Each handler looks at a single row and returns the codes to remove or add.
//! [`apply_repairs`] runs them in the order exception, required, unnecessary,
//! limit, each one seeing the row as left by the previous handler.

use std::collections::BTreeSet;

use rand::Rng;

use crate::algorithm::frequency::FrequencyTable;
use crate::algorithm::sampling::{normalize, weighted_choice, weighted_sample};
use crate::algorithm::validation::ViolationKind;
use crate::models::{AnswerRow, SurveySchema, canonical, sort_row};

/// Codes kept for a question that exceeded its maximum
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimitSelection {
    /// 0-based question index
    pub question: usize,
    /// Codes of the question present before the repair
    pub candidates: Vec<String>,
    /// Codes kept
    pub kept: Vec<String>,
}

/// Result of the limit handler
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LimitRepair {
    /// Codes dropped from over-full questions
    pub removed: Vec<String>,
    /// Codes added to under-filled questions
    pub added: Vec<String>,
    /// Selections made for over-full questions
    pub selections: Vec<LimitSelection>,
}

/// Every change applied to one row during a pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowRepair {
    /// Codes removed, in the order they were removed
    pub removed: Vec<String>,
    /// Codes added, in the order they were added
    pub added: Vec<String>,
    /// Selections made by the limit handler
    pub selections: Vec<LimitSelection>,
}

impl RowRepair {
    /// Check if the row was left untouched
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty()
    }
}

/// Codes to drop so that no two mutually exclusive codes remain
///
/// For a code with present excluded partners, the questions whose whole domain
/// lies in its exclusion list are counted, along with how many of them are
/// represented in the row. If that count is not exactly one and exceeds half of
/// the questions (rounded half to even), the code itself is dropped as the
/// outlier. Otherwise its present partners are dropped. Codes already dropped
/// by an earlier decision in the same row are not reconsidered.
#[must_use]
pub fn exception_removals(row: &[String], schema: &SurveySchema) -> Vec<String> {
    let domains = schema.domains();
    let constraints = schema.constraints();
    let mut dropped = vec![false; row.len()];

    for (idx, code) in row.iter().enumerate() {
        if dropped[idx] {
            continue;
        }
        let Some(excluded) = constraints.exceptions_for(code) else {
            continue;
        };
        let excluded_set: BTreeSet<&str> = excluded.iter().map(|c| canonical(c)).collect();

        let partners: Vec<usize> = row
            .iter()
            .enumerate()
            .filter(|&(other, candidate)| {
                other != idx && !dropped[other] && excluded_set.contains(canonical(candidate))
            })
            .map(|(other, _)| other)
            .collect();
        if partners.is_empty() {
            continue;
        }

        let questions: Vec<usize> = domains.questions_within(excluded).collect();
        let represented = questions
            .iter()
            .filter(|&&question| {
                row.iter()
                    .enumerate()
                    .any(|(other, c)| !dropped[other] && domains.question_of(c) == Some(question))
            })
            .count();
        let half = (questions.len() as f64 / 2.0).round_ties_even() as usize;

        if represented != 1 && represented > half {
            dropped[idx] = true;
        } else {
            for other in partners {
                dropped[other] = true;
            }
        }
    }

    row.iter()
        .zip(dropped)
        .filter(|(_, drop)| *drop)
        .map(|(code, _)| code.clone())
        .collect()
}

/// Codes to add so that every obligation of the row is met
///
/// For each obliged question without a representative, one code is drawn from
/// its domain weighted by the frequency table.
pub fn required_additions<R: Rng>(
    row: &[String],
    schema: &SurveySchema,
    frequencies: &FrequencyTable,
    rng: &mut R,
) -> Vec<String> {
    let domains = schema.domains();
    let mut working: AnswerRow = row.to_vec();
    let mut additions = Vec::new();

    for code in row {
        let Some(required) = schema.constraints().required_for(code) else {
            continue;
        };
        for question in domains.questions_within(required) {
            if domains.is_represented(question, &working) {
                continue;
            }
            if let Some(pick) = weighted_choice(frequencies.question(question), rng) {
                let added = domains.domain(question)[pick].clone();
                working.push(added.clone());
                additions.push(added);
            }
        }
    }

    additions
}

/// Codes that belong to no question and are not ignored
#[must_use]
pub fn unnecessary_removals(row: &[String], schema: &SurveySchema) -> Vec<String> {
    row.iter()
        .filter(|code| schema.is_unnecessary(code))
        .cloned()
        .collect()
}

/// Bring every question's selected count within its bounds
///
/// Over-full questions keep exactly `max` of their present codes, drawn without
/// replacement by frequency mass renormalized over those codes. Under-filled
/// questions gain absent domain codes, drawn without replacement by frequency,
/// until they reach `min`.
pub fn limit_repair<R: Rng>(
    row: &[String],
    schema: &SurveySchema,
    frequencies: &FrequencyTable,
    rng: &mut R,
) -> LimitRepair {
    let domains = schema.domains();
    let mut repair = LimitRepair::default();

    for (question, count) in domains.count_per_question(row).into_iter().enumerate() {
        let max = schema.max_answers(question);
        let min = schema.min_answers(question);

        if count > max {
            let candidates: Vec<String> = row
                .iter()
                .filter(|code| domains.question_of(code) == Some(question))
                .cloned()
                .collect();
            let mut weights: Vec<f64> = candidates
                .iter()
                .map(|code| frequencies.mass_of(domains, code))
                .collect();
            normalize(&mut weights);

            let mut keep = vec![false; candidates.len()];
            for idx in weighted_sample(&weights, max, rng) {
                keep[idx] = true;
            }

            let kept: Vec<String> = candidates
                .iter()
                .zip(&keep)
                .filter(|(_, k)| **k)
                .map(|(code, _)| code.clone())
                .collect();
            repair.removed.extend(
                candidates
                    .iter()
                    .zip(&keep)
                    .filter(|(_, k)| !**k)
                    .map(|(code, _)| code.clone()),
            );
            repair.selections.push(LimitSelection {
                question,
                candidates,
                kept,
            });
        }

        if count < min {
            let present: BTreeSet<&str> = row.iter().map(|code| canonical(code)).collect();
            let domain = domains.domain(question);
            let absent: Vec<usize> = (0..domain.len())
                .filter(|&pos| !present.contains(canonical(&domain[pos])))
                .collect();
            let distribution = frequencies.question(question);
            let weights: Vec<f64> = absent.iter().map(|&pos| distribution[pos]).collect();

            for idx in weighted_sample(&weights, min - count, rng) {
                repair.added.push(domain[absent[idx]].clone());
            }
        }
    }

    repair
}

/// Run the handlers for the given violation kinds on one row, then sort it
pub fn apply_repairs<R: Rng>(
    row: &mut AnswerRow,
    kinds: &BTreeSet<ViolationKind>,
    schema: &SurveySchema,
    frequencies: &FrequencyTable,
    rng: &mut R,
) -> RowRepair {
    let mut repair = RowRepair::default();

    if kinds.contains(&ViolationKind::Exception) {
        let removals = exception_removals(row, schema);
        remove_codes(row, &removals, &mut repair.removed);
    }

    if kinds.contains(&ViolationKind::Required) {
        let additions = required_additions(row, schema, frequencies, rng);
        row.extend(additions.iter().cloned());
        repair.added.extend(additions);
    }

    if kinds.contains(&ViolationKind::Unnecessary) {
        let removals = unnecessary_removals(row, schema);
        remove_codes(row, &removals, &mut repair.removed);
    }

    if kinds.iter().any(|kind| kind.is_limit()) {
        let limits = limit_repair(row, schema, frequencies, rng);
        remove_codes(row, &limits.removed, &mut repair.removed);
        row.extend(limits.added.iter().cloned());
        repair.added.extend(limits.added);
        repair.selections = limits.selections;
    }

    sort_row(row);
    repair
}

/// Remove one occurrence of each code, recording what was actually removed
fn remove_codes(row: &mut AnswerRow, codes: &[String], removed: &mut Vec<String>) {
    for code in codes {
        if let Some(pos) = row.iter().position(|c| c == code) {
            removed.push(row.remove(pos));
        }
    }
}
