//! Parsed questionnaire: question titles and their answer options

use rustc_hash::FxHashSet;

use super::code::{AnswerSet, CANONICAL_LEN, canonical};
use super::domains::Domains;
use crate::error::Result;

/// Text marking an option that expects a free-text answer
pub const OPEN_ANSWER_MARKER: &str = "укажите";

/// A questionnaire as read from its text description
#[derive(Debug, Clone, Default)]
pub struct Questionnaire {
    /// Question title lines in order
    pub titles: Vec<String>,
    /// (code, option text) per question
    pub options: Vec<Vec<(String, String)>>,
}

impl Questionnaire {
    /// Number of questions
    #[must_use]
    pub fn len(&self) -> usize {
        self.titles.len()
    }

    /// Check if the questionnaire has no questions
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    /// Ordered domains built from the option codes
    pub fn domains(&self) -> Result<Domains> {
        Domains::new(
            self.options
                .iter()
                .map(|options| options.iter().map(|(code, _)| code.clone()).collect())
                .collect(),
        )
    }

    /// Codes whose option text asks for a free-text answer
    #[must_use]
    pub fn open_codes(&self) -> FxHashSet<String> {
        self.options
            .iter()
            .flatten()
            .filter(|(_, text)| text.contains(OPEN_ANSWER_MARKER))
            .map(|(code, _)| canonical(code).to_string())
            .collect()
    }
}

/// Append `placeholder` to bare open-ended codes
///
/// Codes that already carry free text are left untouched.
pub fn suffix_open_answers(answers: &mut AnswerSet, questionnaire: &Questionnaire, placeholder: &str) {
    let open_codes = questionnaire.open_codes();
    if open_codes.is_empty() {
        return;
    }

    for code in answers.iter_mut().flatten() {
        if code.chars().count() == CANONICAL_LEN && open_codes.contains(code.as_str()) {
            code.push_str(placeholder);
        }
    }
}
