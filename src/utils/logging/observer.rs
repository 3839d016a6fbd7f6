//! Repair audit trail
//!
//! The correction loop reports every violation, repair, deletion and
//! convergence through a caller-supplied [`RepairObserver`] instead of
//! owning any logging state itself.

use std::fmt;

/// One auditable step of the correction loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepairEvent {
    /// Violations found in a row at the start of a pass
    Violations {
        /// 0-based row index
        row: usize,
        /// Human-readable violation messages
        messages: Vec<String>,
    },
    /// Codes removed from a row
    CodesRemoved {
        /// 0-based row index
        row: usize,
        /// Removed codes
        codes: Vec<String>,
    },
    /// Codes added to a row
    CodesAdded {
        /// 0-based row index
        row: usize,
        /// Added codes
        codes: Vec<String>,
    },
    /// Codes kept when a question exceeded its maximum
    LimitSelection {
        /// 0-based row index
        row: usize,
        /// 0-based question index
        question: usize,
        /// Codes present before the repair
        candidates: Vec<String>,
        /// Codes kept
        kept: Vec<String>,
    },
    /// Duplicate row deleted
    RowDeleted {
        /// 0-based index of the row before deletion
        row: usize,
    },
    /// No violations remain
    Converged {
        /// Number of repair passes that were needed
        passes: usize,
    },
}

impl fmt::Display for RepairEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Violations { row, messages } => {
                write!(f, "Row {}: {}", row + 1, messages.join("; "))
            }
            Self::CodesRemoved { row, codes } => {
                write!(f, "Removed from row {}: {}", row + 1, codes.join(","))
            }
            Self::CodesAdded { row, codes } => {
                write!(f, "Added to row {}: {}", row + 1, codes.join(","))
            }
            Self::LimitSelection {
                row,
                question,
                candidates,
                kept,
            } => write!(
                f,
                "Row {}, question {}: kept {} of {}",
                row + 1,
                question + 1,
                kept.join(","),
                candidates.join(",")
            ),
            Self::RowDeleted { row } => write!(f, "Row {} deleted as a duplicate", row + 1),
            Self::Converged { passes } => {
                write!(f, "Questionnaires passed validation after {passes} repair passes")
            }
        }
    }
}

/// Sink for correction loop events
pub trait RepairObserver {
    /// Receive one event
    fn on_event(&mut self, event: &RepairEvent);
}

/// Forwards every event to the `log` facade at info level
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl RepairObserver for LogObserver {
    fn on_event(&mut self, event: &RepairEvent) {
        log::info!("{event}");
    }
}

/// Keeps every event in memory
#[derive(Debug, Default, Clone)]
pub struct RecordingObserver {
    events: Vec<RepairEvent>,
}

impl RecordingObserver {
    /// Create an empty recorder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Events in the order they were reported
    #[must_use]
    pub fn events(&self) -> &[RepairEvent] {
        &self.events
    }

    /// Consume the recorder and return its events
    #[must_use]
    pub fn into_events(self) -> Vec<RepairEvent> {
        self.events
    }
}

impl RepairObserver for RecordingObserver {
    fn on_event(&mut self, event: &RepairEvent) {
        self.events.push(event.clone());
    }
}
