//! Logging utilities for audit output and progress tracking
//!
//! This module provides the repair observer sink and the progress bars used
//! during generation.

pub mod observer;
pub mod progress;

// Re-export commonly used items for convenience
pub use observer::{LogObserver, RecordingObserver, RepairEvent, RepairObserver};
pub use progress::{
    add_group_progress_bar, create_main_progress_bar, create_multi_progress, finish_progress_bar,
};
