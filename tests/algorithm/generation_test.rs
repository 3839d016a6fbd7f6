//! Tests for synthetic row generation

use survey_synth::{
    AnswerCountDistribution, AssociationRule, AssociationRules, ClusterAnalytics, Corrector, FrequencyTable,
    Generator, RecordingObserver, StrongPair, StrongPairTable, detect_violations,
};

use crate::utils::{demo_schema, messy_answers, row, seeded, two_question_schema};

fn pair(source: usize, target: usize, score: f64) -> StrongPair {
    StrongPair { source, target, score }
}

#[test]
fn test_single_row_scenario_is_deterministic() {
    let schema = two_question_schema(false);
    let existing = vec![row(&["001", "011"])];
    let frequencies = FrequencyTable::compute(&existing, schema.domains(), 0.0);
    let counts =
        AnswerCountDistribution::from_answers(&existing, schema.domains(), &schema.constraints().max_answers);
    let analytics = ClusterAnalytics {
        strong_pairs: StrongPairTable::from_pairs(vec![pair(0, 1, 0.9)]),
        rules: AssociationRules::from_rules(vec![AssociationRule {
            antecedent: "001".to_string(),
            consequent: "011".to_string(),
            confidence: 1.0,
        }]),
    };
    let generator = Generator::new(&schema, &frequencies, &counts, &analytics);

    for seed in [0, 1, 42] {
        let rows = generator.generate(1, &mut seeded(seed));
        assert_eq!(rows, vec![row(&["001", "011"])]);
    }
}

#[test]
fn test_single_choice_questions_get_at_most_one_code() {
    let schema = demo_schema();
    let existing = Corrector::new(&schema, 0.005)
        .run(messy_answers(5, 40), &mut seeded(5), &mut RecordingObserver::new())
        .unwrap()
        .answers;
    let frequencies = FrequencyTable::compute(&existing, schema.domains(), 0.005);
    let counts =
        AnswerCountDistribution::from_answers(&existing, schema.domains(), &schema.constraints().max_answers);
    let analytics = ClusterAnalytics {
        strong_pairs: StrongPairTable::from_pairs(vec![pair(0, 2, 0.7), pair(1, 3, 0.6), pair(3, 0, 0.55)]),
        rules: AssociationRules::default(),
    };
    let generator = Generator::new(&schema, &frequencies, &counts, &analytics);
    let mut rng = seeded(11);

    for _ in 0..200 {
        let generated = generator.generate_row(&mut rng);

        let mut resolved = generated.resolved.clone();
        resolved.sort_unstable();
        assert_eq!(resolved, vec![0, 1, 2, 3]);

        let per_question = schema.domains().count_per_question(&generated.sampled);
        for (question, count) in per_question.into_iter().enumerate() {
            if schema.max_answers(question) == 1 {
                assert!(count <= 1);
            }
        }
        assert!(generated.row.contains(&"999".to_string()));
        assert!(generated.row.windows(2).all(|w| w[0] <= w[1]));
    }
}

#[test]
fn test_generated_rows_can_be_corrected() {
    let schema = demo_schema();
    let existing = Corrector::new(&schema, 0.005)
        .run(messy_answers(6, 40), &mut seeded(6), &mut RecordingObserver::new())
        .unwrap()
        .answers;
    let frequencies = FrequencyTable::compute(&existing, schema.domains(), 0.005);
    let counts =
        AnswerCountDistribution::from_answers(&existing, schema.domains(), &schema.constraints().max_answers);
    let analytics = ClusterAnalytics {
        strong_pairs: StrongPairTable::from_correlations(
            &[
                vec![1.0, 0.2, 0.8, 0.1],
                vec![0.2, 1.0, 0.3, 0.6],
                vec![0.8, 0.3, 1.0, 0.0],
                vec![0.1, 0.6, 0.0, 1.0],
            ],
            0.5,
        ),
        rules: AssociationRules::cross_question(
            vec![
                AssociationRule {
                    antecedent: "001".to_string(),
                    consequent: "021".to_string(),
                    confidence: 0.9,
                },
                AssociationRule {
                    antecedent: "011".to_string(),
                    consequent: "012".to_string(),
                    confidence: 0.5,
                },
            ],
            schema.domains(),
        ),
    };
    assert_eq!(analytics.strong_pairs.len(), 4);
    assert_eq!(analytics.rules.len(), 1);

    let generator = Generator::new(&schema, &frequencies, &counts, &analytics);
    let mut answers = existing;
    answers.extend(generator.generate(50, &mut seeded(12)));

    let outcome = Corrector::new(&schema, 0.005)
        .run(answers, &mut seeded(13), &mut RecordingObserver::new())
        .unwrap();
    assert!(detect_violations(&outcome.answers, &schema).is_empty());
}
