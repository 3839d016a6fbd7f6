//! End-to-end tests for correction followed by generation

use survey_synth::{
    AnalyticsProvider, AnalyzerConfig, AnswerRow, AnswerSet, ClusterAnalytics, Clusters, ConstraintSet, Domains,
    Pipeline, RecordingObserver, Result, StaticAnalytics, StrongPair, StrongPairTable, SurveyError, SurveySchema,
    detect_violations,
};

use crate::utils::row;

fn grid_schema() -> SurveySchema {
    let domains = Domains::new(vec![
        row(&["001", "002", "003"]),
        row(&["011", "012", "013"]),
        row(&["021", "022", "023"]),
        row(&["031", "032", "033"]),
    ])
    .unwrap();
    SurveySchema::new(domains, ConstraintSet::defaults(4), Vec::new(), false).unwrap()
}

fn grid_answers() -> AnswerSet {
    vec![
        row(&["001", "011", "021", "031"]),
        row(&["002", "012", "022", "032"]),
        row(&["003", "013", "023", "033"]),
        row(&["001", "012", "023", "031"]),
        row(&["002", "013", "021", "033"]),
    ]
}

fn config(needed: usize) -> AnalyzerConfig {
    AnalyzerConfig::builder()
        .needed_answers_count(needed)
        .static_error(0.3)
        .random_seed(7)
        .build()
}

fn chained_pairs() -> ClusterAnalytics {
    ClusterAnalytics {
        strong_pairs: StrongPairTable::from_pairs(vec![
            StrongPair {
                source: 0,
                target: 1,
                score: 0.8,
            },
            StrongPair {
                source: 2,
                target: 3,
                score: 0.7,
            },
        ]),
        ..ClusterAnalytics::default()
    }
}

/// Splits rows by index parity
struct ParityClusters;

impl AnalyticsProvider for ParityClusters {
    fn partition(&self, answers: &[AnswerRow]) -> Clusters {
        let (even, odd): (Vec<usize>, Vec<usize>) = (0..answers.len()).partition(|idx| idx % 2 == 0);
        Clusters::new(vec![even, odd])
    }

    fn analytics(&self, _cluster: usize, rows: &[AnswerRow], _domains: &Domains) -> Result<ClusterAnalytics> {
        assert!(!rows.is_empty());
        Ok(ClusterAnalytics::default())
    }
}

#[test]
fn test_pipeline_reaches_target_size() {
    let schema = grid_schema();
    let config = config(30);
    let report = Pipeline::new(&schema, &config)
        .run(grid_answers(), &StaticAnalytics::new(chained_pairs()), &mut RecordingObserver::new())
        .unwrap();

    assert_eq!(report.answers.len(), 30);
    assert_eq!(report.generated_count, 25);
    assert_eq!(&report.answers[..5], grid_answers().as_slice());
    assert!(detect_violations(&report.answers, &schema).is_empty());

    assert_eq!(report.cluster_diagnostics.len(), 1);
    assert_eq!(report.cluster_diagnostics[0].size, 5);
    assert_eq!(report.cluster_diagnostics[0].strong_pairs.len(), 2);
    assert!(report.cluster_diagnostics[0].generated >= 25);
}

#[test]
fn test_pipeline_skips_generation_when_enough_rows() {
    let schema = grid_schema();
    let config = config(3);
    let report = Pipeline::new(&schema, &config)
        .run(grid_answers(), &StaticAnalytics::default(), &mut RecordingObserver::new())
        .unwrap();

    assert_eq!(report.answers.len(), 5);
    assert_eq!(report.generated_count, 0);
    assert!(report.cluster_diagnostics.is_empty());
}

#[test]
fn test_pipeline_generates_per_cluster() {
    let schema = grid_schema();
    let config = config(25);
    let report = Pipeline::new(&schema, &config)
        .run(grid_answers(), &ParityClusters, &mut RecordingObserver::new())
        .unwrap();

    assert_eq!(report.answers.len(), 25);
    let sizes: Vec<usize> = report.cluster_diagnostics.iter().map(|d| d.size).collect();
    assert_eq!(sizes, vec![3, 2]);
    let generated: usize = report.cluster_diagnostics.iter().map(|d| d.generated).sum();
    assert!(generated >= 20);
    assert!(report.cluster_diagnostics.iter().all(|d| d.generated > 0));
}

#[test]
fn test_pipeline_is_reproducible_with_seed() {
    let schema = grid_schema();
    let config = config(20);
    let first = Pipeline::new(&schema, &config)
        .run(grid_answers(), &StaticAnalytics::new(chained_pairs()), &mut RecordingObserver::new())
        .unwrap();
    let second = Pipeline::new(&schema, &config)
        .run(grid_answers(), &StaticAnalytics::new(chained_pairs()), &mut RecordingObserver::new())
        .unwrap();

    assert_eq!(first.answers, second.answers);
}

#[test]
fn test_pipeline_stalls_when_target_is_unreachable() {
    let domains = Domains::new(vec![row(&["001", "002"])]).unwrap();
    let schema = SurveySchema::new(domains, ConstraintSet::defaults(1), Vec::new(), false).unwrap();
    let config = AnalyzerConfig::builder()
        .needed_answers_count(5)
        .max_generation_rounds(3)
        .random_seed(1)
        .build();

    let result = Pipeline::new(&schema, &config).run(
        vec![row(&["001"])],
        &StaticAnalytics::default(),
        &mut RecordingObserver::new(),
    );

    assert!(matches!(result, Err(SurveyError::GenerationStalled { rounds: 3 })));
}
