//! Synthetic questionnaire generation
//!
//! [`AnswerSampler`] draws the answer to a single question and [`Generator`]
//! assembles whole rows from it.

pub mod driver;
pub mod sampler;

pub use driver::{GeneratedRow, Generator};
pub use sampler::{AnswerSampler, SampledCodes};
