//! Tests for reading survey files and preparing the final answer set

use std::fs;
use std::path::PathBuf;

use survey_synth::models::suffix_open_answers;
use survey_synth::{AnalyzerConfig, Corrector, RecordingObserver, SurveySchema, load_survey};

use crate::utils::{row, seeded};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("survey-synth-it-{name}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

const QUESTIONNAIRE: &str = "\
1. Where do you live?
001 - city
002 - village
003 - другое (укажите)
2. Do you own a car?
011 - yes
012 - no
";

#[test]
fn test_files_to_corrected_and_suffixed_answers() {
    let dir = scratch_dir("files");
    fs::write(dir.join("survey.anc"), QUESTIONNAIRE).unwrap();
    fs::write(dir.join("answers.opr"), "001,011\n003,012\n003Moscow region,011\n002,001,012\n").unwrap();
    fs::write(dir.join("survey.cnf"), "1.1#003:011##1.1\n").unwrap();

    let config = AnalyzerConfig::builder().data_dir(&dir).random_seed(3).build();
    let data = load_survey(&config).unwrap();
    let schema = SurveySchema::new(
        data.questionnaire.domains().unwrap(),
        data.constraints,
        config.ignored_codes.clone(),
        config.may_repeat,
    )
    .unwrap();

    let outcome = Corrector::new(&schema, config.static_error)
        .run(data.answers, &mut seeded(3), &mut RecordingObserver::new())
        .unwrap();
    let mut answers = outcome.answers;
    assert_eq!(answers.len(), 4);
    assert_eq!(answers[0], row(&["001", "011"]));
    assert_eq!(answers[1], row(&["003", "012"]));

    suffix_open_answers(&mut answers, &data.questionnaire, &config.open_answer_placeholder);
    assert_eq!(answers[1][0], format!("003{}", config.open_answer_placeholder));
    assert_eq!(answers[0], row(&["001", "011"]));

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_missing_config_file_is_created_with_defaults() {
    let dir = scratch_dir("config");
    let path = dir.join("config.json");

    let config = AnalyzerConfig::load(&path).unwrap();
    assert_eq!(config, AnalyzerConfig::default());
    assert!(path.exists());

    let reloaded = AnalyzerConfig::load(&path).unwrap();
    assert_eq!(reloaded, config);

    fs::remove_dir_all(&dir).unwrap();
}
