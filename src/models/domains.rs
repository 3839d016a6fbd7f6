//! Question domains
//!
//! Each question is identified by its position and owns an ordered list of
//! canonical codes. Membership tests always use the canonical prefix of a code.

use std::collections::hash_map::Entry;

use rustc_hash::{FxHashMap, FxHashSet};

use super::code::canonical;
use crate::error::{Result, SurveyError};

/// Ordered list of valid codes for every question
#[derive(Debug, Clone, Default)]
pub struct Domains {
    /// Codes per question, in questionnaire order
    questions: Vec<Vec<String>>,
    /// Canonical code to (question index, position within domain)
    lookup: FxHashMap<String, (usize, usize)>,
}

impl Domains {
    /// Build domains from ordered code lists
    ///
    /// Fails if a question has no codes or if a code is listed under two
    /// questions. A code repeated within one question keeps its first position.
    pub fn new(questions: Vec<Vec<String>>) -> Result<Self> {
        let mut lookup = FxHashMap::default();

        for (question, codes) in questions.iter().enumerate() {
            if codes.is_empty() {
                return Err(SurveyError::structural(format!(
                    "Question {} has no answer options",
                    question + 1
                )));
            }
            for (position, code) in codes.iter().enumerate() {
                match lookup.entry(canonical(code).to_string()) {
                    Entry::Vacant(entry) => {
                        entry.insert((question, position));
                    }
                    Entry::Occupied(entry) if entry.get().0 != question => {
                        return Err(SurveyError::structural(format!(
                            "Code {} is listed under questions {} and {}",
                            entry.key(),
                            entry.get().0 + 1,
                            question + 1
                        )));
                    }
                    Entry::Occupied(_) => {}
                }
            }
        }

        Ok(Self { questions, lookup })
    }

    /// Number of questions
    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Check if there are no questions
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Codes of one question
    #[must_use]
    pub fn domain(&self, question: usize) -> &[String] {
        &self.questions[question]
    }

    /// Iterate over all domains in question order
    pub fn iter(&self) -> impl Iterator<Item = &[String]> {
        self.questions.iter().map(Vec::as_slice)
    }

    /// Question a code belongs to, if any
    #[must_use]
    pub fn question_of(&self, code: &str) -> Option<usize> {
        self.lookup.get(canonical(code)).map(|&(question, _)| question)
    }

    /// Question and position within its domain for a code, if any
    #[must_use]
    pub fn locate(&self, code: &str) -> Option<(usize, usize)> {
        self.lookup.get(canonical(code)).copied()
    }

    /// Check if a code is valid for some question
    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.lookup.contains_key(canonical(code))
    }

    /// Questions whose whole domain is contained in `codes`
    ///
    /// This is how exception and required lists refer to other questions.
    pub fn questions_within<'a>(&'a self, codes: &'a [String]) -> impl Iterator<Item = usize> + 'a {
        let listed: FxHashSet<&str> = codes.iter().map(|code| canonical(code)).collect();
        self.questions
            .iter()
            .enumerate()
            .filter(move |(_, domain)| domain.iter().all(|code| listed.contains(canonical(code))))
            .map(|(question, _)| question)
    }

    /// Count selected codes per question for one row
    #[must_use]
    pub fn count_per_question(&self, row: &[String]) -> Vec<usize> {
        let mut counts = vec![0; self.questions.len()];
        for code in row {
            if let Some(question) = self.question_of(code) {
                counts[question] += 1;
            }
        }
        counts
    }

    /// Check if any code of the row belongs to the given question
    #[must_use]
    pub fn is_represented(&self, question: usize, row: &[String]) -> bool {
        row.iter().any(|code| self.question_of(code) == Some(question))
    }
}
