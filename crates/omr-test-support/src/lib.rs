//! Test support utilities for the OMR grader.
//!
//! Provides mocks, synthetic answer sheets and sample exams for testing
//! the grading pipeline.
//!
//! # Example
//!
//! ```
//! use omr_test_support::{sample_exam, MockImageSource, SyntheticSheetBuilder};
//!
//! let exam = sample_exam();
//! let perfect = SyntheticSheetBuilder::new(&exam).answer_key().build().unwrap();
//! let blank = SyntheticSheetBuilder::new(&exam).build().unwrap();
//!
//! let source = MockImageSource::new(vec![perfect, blank]);
//! ```

mod builders;
mod mocks;

pub use builders::{
    answer_key_exam, blank_image, dense_exam, filled_rects, sample_exam, zero_area_image,
    SyntheticSheetBuilder,
};
pub use mocks::{MockImageSource, MockProgressSink, MockResultOutput};
