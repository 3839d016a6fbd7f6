//! Shared fixtures for integration tests

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use survey_synth::{AnswerRow, AnswerSet, ConstraintSet, Domains, SurveySchema};

/// Build a row from string literals
#[must_use]
pub fn row(codes: &[&str]) -> AnswerRow {
    codes.iter().map(|s| (*s).to_string()).collect()
}

/// Seeded random source
#[must_use]
pub fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Two single-choice questions: Q0 {001, 002} and Q1 {011, 012}
#[must_use]
pub fn two_question_schema(may_repeat: bool) -> SurveySchema {
    let domains = Domains::new(vec![row(&["001", "002"]), row(&["011", "012"])]).unwrap();
    SurveySchema::new(domains, ConstraintSet::defaults(2), Vec::new(), may_repeat).unwrap()
}

/// Domains of the demo questionnaire
#[must_use]
pub fn demo_domains() -> Domains {
    Domains::new(vec![
        row(&["001", "002", "003"]),
        row(&["011", "012", "013", "014"]),
        row(&["021", "022"]),
        row(&["031", "032", "033"]),
    ])
    .unwrap()
}

/// Four questions with every kind of constraint
///
/// - Q1 allows two answers, Q2 is optional
/// - 014 excludes every other Q1 answer
/// - 001 obliges an answer to Q2
#[must_use]
pub fn demo_schema() -> SurveySchema {
    let mut constraints = ConstraintSet::defaults(4);
    constraints.max_answers = vec![1, 2, 1, 1];
    constraints.min_answers = vec![1, 1, 0, 1];
    constraints
        .exceptions
        .insert("014".to_string(), row(&["011", "012", "013"]));
    constraints
        .required
        .insert("001".to_string(), row(&["021", "022"]));
    SurveySchema::new(demo_domains(), constraints, row(&["999"]), false).unwrap()
}

/// Rows with random violations of every kind
#[must_use]
pub fn messy_answers(seed: u64, count: usize) -> AnswerSet {
    let domains = demo_domains();
    let mut rng = seeded(seed);

    (0..count)
        .map(|_| {
            let mut answer = AnswerRow::new();
            for domain in domains.iter() {
                let picks = rng.random_range(0..=3);
                for _ in 0..picks {
                    answer.push(domain[rng.random_range(0..domain.len())].clone());
                }
            }
            if rng.random_bool(0.2) {
                answer.push("555".to_string());
            }
            if rng.random_bool(0.2) {
                answer.push("999".to_string());
            }
            answer
        })
        .collect()
}
