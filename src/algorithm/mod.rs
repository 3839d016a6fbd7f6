//! Algorithm implementations for survey repair and generation
//!
//! This module contains the frequency estimation, violation detection,
//! iterative correction and synthetic row generation that operate on the
//! tables in [`crate::models`].

pub mod correction;
pub mod frequency;
pub mod generation;
pub mod sampling;
pub mod validation;

pub use correction::{CorrectionOutcome, Corrector};
pub use frequency::{AnswerCountDistribution, FrequencyTable};
pub use generation::{AnswerSampler, GeneratedRow, Generator};
pub use validation::{RowViolations, Violation, ViolationKind, detect_violations};
