//! Locating and reading survey files in the data directory

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{info, warn};

use super::{parse_answers, parse_conditions, parse_questionnaire};
use crate::config::AnalyzerConfig;
use crate::error::{Result, SurveyError};
use crate::models::{AnswerSet, ConstraintSet, Questionnaire};

/// Everything read from the data directory
#[derive(Debug, Clone)]
pub struct SurveyData {
    /// Questions and their options
    pub questionnaire: Questionnaire,
    /// Raw answer rows from every answer file
    pub answers: AnswerSet,
    /// Conditions, or the defaults when no conditions file exists
    pub constraints: ConstraintSet,
}

/// Files in `dir` whose name ends with `extension`, sorted by path
pub fn find_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| SurveyError::io("Failed to read directory", dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| SurveyError::io("Failed to read directory entry in", dir, e))?
            .path();
        if path.is_file()
            && path
                .file_name()
                .is_some_and(|name| name.to_string_lossy().ends_with(extension))
        {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// The one file with `extension`, or the first of several with a warning
pub fn find_single_file(dir: &Path, extension: &str) -> Result<Option<PathBuf>> {
    let mut files = find_files(dir, extension)?;
    if files.len() > 1 {
        warn!(
            "Found {} files with extension {extension}, using {}",
            files.len(),
            files[0].display()
        );
    }
    Ok(if files.is_empty() { None } else { Some(files.swap_remove(0)) })
}

/// Read a text file, replacing invalid UTF-8 sequences
pub fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| SurveyError::io("Failed to read", path, e))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Read the questionnaire file
pub fn load_questionnaire(dir: &Path, extension: &str) -> Result<Questionnaire> {
    let path = find_single_file(dir, extension)?.ok_or_else(|| missing(dir, extension))?;
    let questionnaire = parse_questionnaire(&read_text(&path)?)?;
    info!("Questionnaire loaded: {} questions", questionnaire.len());
    Ok(questionnaire)
}

/// Read and concatenate every answer file, extension by extension
pub fn load_answers(dir: &Path, extensions: &[String]) -> Result<AnswerSet> {
    let mut answers = AnswerSet::new();
    for extension in extensions {
        for path in find_files(dir, extension)? {
            answers.extend(parse_answers(&read_text(&path)?));
        }
    }

    if answers.is_empty() {
        return Err(missing(dir, &extensions.join(", ")));
    }
    info!("Answers loaded: {} rows", answers.len());
    Ok(answers)
}

/// Read the conditions file, falling back to defaults when there is none
pub fn load_conditions(dir: &Path, extension: &str, question_count: usize) -> Result<ConstraintSet> {
    match find_single_file(dir, extension)? {
        Some(path) => {
            let constraints = parse_conditions(&read_text(&path)?, question_count)?;
            info!("Conditions loaded from {}", path.display());
            Ok(constraints)
        }
        None => {
            warn!("No conditions file with extension {extension}, using default conditions");
            Ok(ConstraintSet::defaults(question_count))
        }
    }
}

/// Read questionnaire, answers and conditions as configured
pub fn load_survey(config: &AnalyzerConfig) -> Result<SurveyData> {
    let dir = config.data_dir.as_path();
    let questionnaire = load_questionnaire(dir, &config.question_data_ext)?;
    let answers = load_answers(dir, &config.answer_data_ext)?;
    let constraints = load_conditions(dir, &config.conditions_ext, questionnaire.len())?;

    Ok(SurveyData {
        questionnaire,
        answers,
        constraints,
    })
}

fn missing(dir: &Path, extension: &str) -> SurveyError {
    SurveyError::io(
        &format!("No non-empty {extension} file in"),
        dir,
        io::Error::from(io::ErrorKind::NotFound),
    )
}
