//! A Rust library for repairing multi-select survey responses against a
//! declarative constraint set and generating plausible synthetic responses.

pub mod algorithm;
pub mod config;
pub mod error;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod utils;

// Re-export the most common types for easier use
// Core types
pub use config::{AnalyzerConfig, AnalyzerConfigBuilder};
pub use error::{Result, SurveyError};
pub use models::{
    AnswerRow, AnswerSet, AssociationRule, AssociationRules, ClusterAnalytics, ConstraintSet, Domains,
    Questionnaire, StrongPair, StrongPairTable, SurveySchema,
};

// Correction and generation
pub use algorithm::{
    AnswerCountDistribution, AnswerSampler, CorrectionOutcome, Corrector, FrequencyTable, GeneratedRow,
    Generator, RowViolations, ViolationKind, detect_violations,
};
pub use pipeline::{AnalyticsProvider, Clusters, Pipeline, PipelineReport, StaticAnalytics};

// Audit trail
pub use utils::logging::{LogObserver, RecordingObserver, RepairEvent, RepairObserver};

// Input files
pub use parser::{SurveyData, load_survey};
