//! Progress reporting port for UI integration.

use crate::domain::GradingResult;

/// Events emitted while grading a batch of sheets.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Grading started for a sheet.
    Started {
        /// Path to the image.
        path: String,
        /// Index in the batch (0-based).
        index: usize,
        /// Total images in batch, if known.
        total: Option<usize>,
    },
    /// A sheet was graded.
    Graded {
        /// The grading result.
        result: GradingResult,
    },
    /// A sheet was skipped because it could not be loaded or graded.
    Skipped {
        /// Path to the image.
        path: String,
        /// Reason for skipping.
        reason: String,
    },
    /// All sheets have been processed.
    Finished {
        /// Sheets graded successfully.
        processed: usize,
        /// Sheets skipped.
        skipped: usize,
    },
}

/// Port for receiving progress events.
pub trait ProgressSink: Send + Sync {
    /// Called when a progress event occurs.
    fn on_event(&self, event: ProgressEvent);
}
