//! Error types for the grading engine.

use thiserror::Error;

/// Errors raised by the grading engine.
///
/// An unmarked or ambiguous bubble is not an error; it is reported as an
/// undetected [`DetectedAnswer`](crate::DetectedAnswer).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OmrError {
    /// The raster has zero width or height.
    #[error("invalid image: {width}x{height} has no pixels")]
    InvalidImage {
        /// Raster width in pixels.
        width: u32,
        /// Raster height in pixels.
        height: u32,
    },

    /// The exam has no questions, so no percentage can be computed.
    #[error("exam has no questions")]
    EmptyExam,

    /// A sampling rectangle lies entirely outside the binary field.
    #[error("region at ({x}, {y}) is outside the {width}x{height} field")]
    OutOfBounds {
        /// Region left edge.
        x: u32,
        /// Region top edge.
        y: u32,
        /// Field width.
        width: u32,
        /// Field height.
        height: u32,
    },

    /// The exam definition violates a question or layout invariant.
    #[error("invalid exam: {0}")]
    InvalidExam(String),
}

/// Result alias for engine operations.
pub type Result<T> = std::result::Result<T, OmrError>;
