//! Core domain types for bubble-sheet grading.

mod exam;
mod result;

pub use exam::{
    BubbleSize, BubbleSpacing, Exam, LayoutConfig, Question, QuestionType, DEFAULT_OPTION_COUNT,
    LETTERS, TRUE_FALSE_LABELS,
};
pub use result::{DetectedAnswer, GradingResult, ImageDimensions, ImageInfo};
