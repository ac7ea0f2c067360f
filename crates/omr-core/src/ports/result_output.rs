//! Result output port, the hand-off to persistence.

use crate::domain::GradingResult;

/// Port for writing grading results.
pub trait ResultOutput: Send + Sync {
    /// Writes a single grading result.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write(&self, result: &GradingResult) -> anyhow::Result<()>;

    /// Flushes any buffered output.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing fails.
    fn flush(&self) -> anyhow::Result<()>;
}
