use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;
use survey_synth::models::suffix_open_answers;
use survey_synth::{
    AnalyzerConfig, ClusterAnalytics, Corrector, LogObserver, Pipeline, StaticAnalytics, StrongPairTable,
    SurveySchema, load_survey,
};

/// Analytics tables looked up in the data directory
const ANALYTICS_FILE: &str = "analytics.json";

fn main() -> Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = std::env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from("config.json"), PathBuf::from);
    let config = AnalyzerConfig::load(&config_path)
        .with_context(|| format!("Failed to load configuration from {}", config_path.display()))?;
    info!("{config}");

    let data = load_survey(&config).context("Failed to read survey data")?;
    let domains = data.questionnaire.domains()?;
    let schema = SurveySchema::new(
        domains,
        data.constraints,
        config.ignored_codes.clone(),
        config.may_repeat,
    )
    .context("Conditions do not match the questionnaire")?;

    let mut observer = LogObserver;
    let analytics_path = config.data_dir.join(ANALYTICS_FILE);

    let mut answers = if analytics_path.exists() {
        let content = fs::read_to_string(&analytics_path)
            .with_context(|| format!("Failed to read {}", analytics_path.display()))?;
        let tables: ClusterAnalytics = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", analytics_path.display()))?;
        let strong_pairs = StrongPairTable::from_pairs(
            tables
                .strong_pairs
                .pairs()
                .iter()
                .filter(|pair| pair.score > config.strong_pairs_coefficient)
                .cloned()
                .collect(),
        );
        let analytics = StaticAnalytics::new(ClusterAnalytics {
            strong_pairs,
            rules: tables.rules,
        });

        let report = Pipeline::new(&schema, &config).run(data.answers, &analytics, &mut observer)?;
        for cluster in &report.cluster_diagnostics {
            info!("{cluster}");
        }
        info!(
            "Generated {} questionnaires, {} in total",
            report.generated_count,
            report.answers.len()
        );
        report.answers
    } else {
        info!("No {ANALYTICS_FILE} in {}, skipping generation", config.data_dir.display());
        let mut rng = match config.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let outcome = Corrector::new(&schema, config.static_error)
            .with_max_passes(config.max_correction_passes)
            .run(data.answers, &mut rng, &mut observer)?;
        info!("Questionnaires after validation: {}", outcome.answers.len());
        outcome.answers
    };

    suffix_open_answers(&mut answers, &data.questionnaire, &config.open_answer_placeholder);

    let mut out = BufWriter::new(io::stdout().lock());
    for row in &answers {
        writeln!(out, "{}", row.join(","))?;
    }
    out.flush()?;

    Ok(())
}
