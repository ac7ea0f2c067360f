//! OMR Core - bubble-sheet layout geometry and grading engine
//!
//! Converts a photographed or scanned answer sheet into detected answers and
//! a score. The pipeline is:
//!
//! 1. [`binarize()`] the raster with a fixed luminance threshold
//! 2. [`layout::resolve_layout`] every bubble from the exam's [`LayoutConfig`]
//! 3. sample the dark-pixel [`density()`] of each bubble window
//! 4. [`decision::decide`] the marked bubble per question
//! 5. [`score()`] the detections against the answer key
//!
//! [`Grader`] runs the whole pipeline. [`render::render_sheet`] draws the
//! printable sheet from the same layout geometry.

pub mod binarize;
pub mod decision;
pub mod density;
pub mod domain;
pub mod error;
pub mod grader;
pub mod layout;
pub mod ports;
pub mod render;
pub mod score;

pub use binarize::{binarize, BinaryField};
pub use density::density;
pub use domain::{
    BubbleSize, BubbleSpacing, DetectedAnswer, Exam, GradingResult, ImageDimensions, ImageInfo,
    LayoutConfig, Question, QuestionType,
};
pub use error::{OmrError, Result};
pub use grader::{Grader, GraderConfig};
pub use layout::{resolve_layout, BubbleRegion, PageSize, PixelRect, QuestionLayout};
pub use ports::{ImageSource, ProgressEvent, ProgressSink, ResultOutput};
pub use score::{score, Score};
