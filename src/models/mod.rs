//! Domain models for survey repair and generation
//!
//! This module contains the in-memory tables the correction loop and the
//! generator operate on: answer codes, question domains, constraint sets,
//! parsed questionnaires and the statistical tables supplied by analytics.

pub mod analytics;
pub mod code;
pub mod constraints;
pub mod domains;
pub mod questionnaire;
pub mod schema;

// Re-export commonly used types
pub use analytics::{AssociationRule, AssociationRules, ClusterAnalytics, StrongPair, StrongPairTable};
pub use code::{AnswerRow, AnswerSet, CANONICAL_LEN, Code, canonical, sort_row};
pub use constraints::ConstraintSet;
pub use domains::Domains;
pub use questionnaire::{OPEN_ANSWER_MARKER, Questionnaire, suffix_open_answers};
pub use schema::SurveySchema;
