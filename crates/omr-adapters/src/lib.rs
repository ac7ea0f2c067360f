//! OMR Adapters - filesystem adapters for the bubble-sheet grader.
//!
//! This crate provides adapters for:
//! - Loading scanned sheets from files and directories
//! - Reading exam definitions
//! - Persisting grading results as JSON Lines

pub mod exam;
pub mod fs;
pub mod store;

pub use exam::load_exam;
pub use fs::{load_image, FsImageSource};
pub use store::JsonlResultStore;
