//! Tests for the detect-repair loop

use survey_synth::{
    ConstraintSet, Corrector, Domains, RecordingObserver, RepairEvent, SurveyError, SurveySchema,
    ViolationKind, detect_violations,
};
use survey_synth::algorithm::correction::DEFAULT_MAX_PASSES;

use crate::utils::{demo_schema, messy_answers, row, seeded, two_question_schema};

#[test]
fn test_correction_reaches_fixed_point() {
    let schema = demo_schema();

    for seed in 0..10 {
        let answers = messy_answers(seed, 60);
        let mut observer = RecordingObserver::new();
        let outcome = Corrector::new(&schema, 0.005)
            .run(answers, &mut seeded(seed), &mut observer)
            .unwrap();

        assert!(detect_violations(&outcome.answers, &schema).is_empty());
        assert!(matches!(
            observer.events().last(),
            Some(RepairEvent::Converged { passes }) if *passes == outcome.passes
        ));
    }
}

#[test]
fn test_counts_within_bounds_after_correction() {
    let schema = demo_schema();
    let outcome = Corrector::new(&schema, 0.005)
        .run(messy_answers(99, 80), &mut seeded(99), &mut RecordingObserver::new())
        .unwrap();

    for answer in &outcome.answers {
        let counts = schema.domains().count_per_question(answer);
        for (question, count) in counts.into_iter().enumerate() {
            assert!(count >= schema.min_answers(question));
            assert!(count <= schema.max_answers(question));
        }
        assert!(!answer.contains(&"555".to_string()));
    }
}

#[test]
fn test_exception_conflict_keeps_at_most_one_side() {
    let schema = demo_schema();
    let outcome = Corrector::new(&schema, 0.005)
        .run(
            vec![row(&["002", "011", "014", "031"])],
            &mut seeded(4),
            &mut RecordingObserver::new(),
        )
        .unwrap();

    let repaired = &outcome.answers[0];
    let has_011 = repaired.contains(&"011".to_string());
    let has_014 = repaired.contains(&"014".to_string());
    assert!(!(has_011 && has_014));
    assert_eq!(repaired, &row(&["002", "014", "031"]));
}

#[test]
fn test_required_answer_added() {
    let schema = demo_schema();
    let outcome = Corrector::new(&schema, 0.005)
        .run(
            vec![row(&["001", "012", "031"])],
            &mut seeded(8),
            &mut RecordingObserver::new(),
        )
        .unwrap();

    let repaired = &outcome.answers[0];
    assert_eq!(repaired.len(), 4);
    assert!(repaired.contains(&"021".to_string()) || repaired.contains(&"022".to_string()));
}

#[test]
fn test_max_limit_keeps_one_code() {
    let schema = two_question_schema(false);
    let outcome = Corrector::new(&schema, 0.005)
        .run(vec![row(&["001", "002"])], &mut seeded(1), &mut RecordingObserver::new())
        .unwrap();

    let repaired = &outcome.answers[0];
    let q0: Vec<&String> = repaired.iter().filter(|c| c.starts_with("00")).collect();
    assert_eq!(q0.len(), 1);

    let report = detect_violations(&outcome.answers, &schema);
    assert!(report.iter().all(|r| !r.has(ViolationKind::MaxLimit)));
    assert!(report.is_empty());
}

#[test]
fn test_max_limit_choice_follows_frequency() {
    // 001 appears in every row, 002 in one: masses 1.0 and 0.25
    let schema = two_question_schema(true);
    let answers = vec![
        row(&["001", "002", "011"]),
        row(&["001", "011"]),
        row(&["001", "011"]),
        row(&["001", "011"]),
    ];

    let trials = 2000;
    let kept_001 = (0..trials)
        .filter(|&seed| {
            let outcome = Corrector::new(&schema, 0.0)
                .run(answers.clone(), &mut seeded(seed), &mut RecordingObserver::new())
                .unwrap();
            outcome.answers[0].contains(&"001".to_string())
        })
        .count();

    let share = kept_001 as f64 / trials as f64;
    assert!((0.7..0.9).contains(&share), "001 kept in {share} of trials");
}

#[test]
fn test_duplicates_are_order_insensitive() {
    let schema = two_question_schema(false);
    let mut observer = RecordingObserver::new();
    let outcome = Corrector::new(&schema, 0.005)
        .run(
            vec![row(&["001", "011"]), row(&["011", "001"]), row(&["002", "012"])],
            &mut seeded(0),
            &mut observer,
        )
        .unwrap();

    assert_eq!(outcome.answers, vec![row(&["001", "011"]), row(&["002", "012"])]);
    assert!(observer.events().contains(&RepairEvent::RowDeleted { row: 1 }));

    let repeating = two_question_schema(true);
    let kept = Corrector::new(&repeating, 0.005)
        .run(
            vec![row(&["001", "011"]), row(&["011", "001"])],
            &mut seeded(0),
            &mut RecordingObserver::new(),
        )
        .unwrap();
    assert_eq!(kept.answers.len(), 2);
    assert_eq!(kept.passes, 0);
}

#[test]
fn test_every_repair_is_audited() {
    let schema = demo_schema();
    let mut observer = RecordingObserver::new();
    Corrector::new(&schema, 0.005)
        .run(vec![row(&["002", "012", "031", "555"])], &mut seeded(2), &mut observer)
        .unwrap();

    let events = observer.into_events();
    assert!(events.contains(&RepairEvent::CodesRemoved {
        row: 0,
        codes: row(&["555"]),
    }));
    assert!(matches!(events.first(), Some(RepairEvent::Violations { row: 0, .. })));
}

#[test]
fn test_oscillating_constraints_exhaust_pass_budget() {
    // 001 excludes all of Q1, yet Q1 needs exactly one answer
    let domains = Domains::new(vec![row(&["001"]), row(&["011", "012"])]).unwrap();
    let mut constraints = ConstraintSet::defaults(2);
    constraints
        .exceptions
        .insert("001".to_string(), row(&["011", "012"]));
    let schema = SurveySchema::new(domains, constraints, Vec::new(), false).unwrap();

    let mut observer = RecordingObserver::new();
    let result = Corrector::new(&schema, 0.005).with_max_passes(5).run(
        vec![row(&["001", "011"])],
        &mut seeded(3),
        &mut observer,
    );

    assert!(matches!(result, Err(SurveyError::Convergence { passes: 5 })));
    let passes_run = observer
        .events()
        .iter()
        .filter(|event| matches!(event, RepairEvent::Violations { row: 0, .. }))
        .count();
    assert_eq!(passes_run, 5);
    assert!(
        !observer
            .events()
            .iter()
            .any(|event| matches!(event, RepairEvent::Converged { .. }))
    );

    let default_bound = Corrector::new(&schema, 0.005).run(
        vec![row(&["001", "012"])],
        &mut seeded(4),
        &mut RecordingObserver::new(),
    );
    assert!(matches!(
        default_bound,
        Err(SurveyError::Convergence { passes }) if passes == DEFAULT_MAX_PASSES
    ));
}
