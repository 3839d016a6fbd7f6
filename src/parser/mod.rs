//! Text formats for questionnaires, answers and conditions
//!
//! The functions here work on already-decoded text. Finding and reading the
//! files lives in [`loader`].

pub mod loader;

use itertools::Itertools;
use rustc_hash::FxHashMap;

use crate::error::{Result, SurveyError};
use crate::models::{AnswerSet, ConstraintSet, Questionnaire};

pub use loader::{SurveyData, load_survey};

/// Separator between an option code and its text
const OPTION_SEPARATOR: &str = " - ";

/// Parse a questionnaire description
///
/// A line starting with a digit opens a question. The lines right after it
/// that contain `" - "` are its options, written as `CODE - text`. Anything
/// else is skipped.
pub fn parse_questionnaire(text: &str) -> Result<Questionnaire> {
    let lines: Vec<&str> = text.lines().collect();
    if lines.iter().all(|line| line.trim().is_empty()) {
        return Err(SurveyError::parse(1, "questionnaire is empty"));
    }

    let mut questionnaire = Questionnaire::default();
    let mut i = 0;
    while i < lines.len() {
        let line = lines[i].trim();
        i += 1;
        if !line.starts_with(|c: char| c.is_ascii_digit()) {
            continue;
        }

        let mut options = Vec::new();
        while let Some((code, option_text)) = lines.get(i).and_then(|l| l.split_once(OPTION_SEPARATOR)) {
            options.push((code.trim().to_string(), option_text.trim().to_string()));
            i += 1;
        }

        questionnaire.titles.push(line.to_string());
        questionnaire.options.push(options);
    }

    if questionnaire.is_empty() {
        return Err(SurveyError::parse(1, "no question lines found"));
    }
    Ok(questionnaire)
}

/// Parse answer rows, one comma-separated row per non-empty line
#[must_use]
pub fn parse_answers(text: &str) -> AnswerSet {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| line.split(',').map(|code| code.trim().to_string()).collect())
        .collect()
}

/// Parse a conditions line: `MAX#EXCEPTIONS#REQUIRED#MIN`
///
/// MAX and MIN hold one `.`-separated bound per question. EXCEPTIONS and
/// REQUIRED hold `/`-separated `code:c1,c2` groups; a key listed twice gets
/// both lists.
pub fn parse_conditions(text: &str, question_count: usize) -> Result<ConstraintSet> {
    let first = text
        .lines()
        .next()
        .filter(|line| !line.trim().is_empty())
        .ok_or_else(|| SurveyError::parse(1, "conditions are empty"))?;

    let Some((max, exceptions, required, min)) = first.trim().split('#').collect_tuple() else {
        return Err(SurveyError::parse(1, "expected four `#`-separated sections"));
    };

    let constraints = ConstraintSet {
        max_answers: parse_bounds(max, question_count, "maximum")?,
        min_answers: parse_bounds(min, question_count, "minimum")?,
        exceptions: parse_code_groups(exceptions)?,
        required: parse_code_groups(required)?,
    };
    Ok(constraints)
}

fn parse_bounds(section: &str, question_count: usize, label: &str) -> Result<Vec<usize>> {
    let bounds = section
        .trim()
        .split('.')
        .map(|value| {
            value
                .trim()
                .parse::<usize>()
                .map_err(|e| SurveyError::parse(1, format!("invalid {label} bound {value:?}: {e}")))
        })
        .collect::<Result<Vec<_>>>()?;

    if bounds.len() != question_count {
        return Err(SurveyError::structural(format!(
            "{} {label} bounds for {question_count} questions",
            bounds.len()
        )));
    }
    Ok(bounds)
}

fn parse_code_groups(section: &str) -> Result<FxHashMap<String, Vec<String>>> {
    let mut groups: FxHashMap<String, Vec<String>> = FxHashMap::default();

    for group in section.split('/').map(str::trim).filter(|g| !g.is_empty()) {
        let (key, codes) = group
            .split_once(':')
            .ok_or_else(|| SurveyError::parse(1, format!("group {group:?} lacks `code:` prefix")))?;
        groups.entry(key.trim().to_string()).or_default().extend(
            codes
                .split(',')
                .map(str::trim)
                .filter(|code| !code.is_empty())
                .map(str::to_string),
        );
    }

    Ok(groups)
}
