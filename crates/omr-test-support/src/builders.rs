//! Synthetic answer sheets and exams for testing.

use std::collections::BTreeMap;

use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use omr_core::domain::{BubbleSize, Exam, ImageInfo, LayoutConfig, Question};
use omr_core::layout::{PageSize, PixelRect};
use omr_core::render::{render_sheet, DEFAULT_PAGE};

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

/// Builder for rendered answer sheets, optionally filled in.
///
/// ```
/// use omr_test_support::{sample_exam, SyntheticSheetBuilder};
///
/// let exam = sample_exam();
/// let sheet = SyntheticSheetBuilder::new(&exam)
///     .mark(1, "B")
///     .mark(2, "T")
///     .build()
///     .unwrap();
/// assert_eq!(sheet.dimensions().width, 1240);
/// ```
pub struct SyntheticSheetBuilder<'a> {
    exam: &'a Exam,
    page: PageSize,
    marks: BTreeMap<u32, String>,
    path: String,
}

impl<'a> SyntheticSheetBuilder<'a> {
    /// Starts a blank A4 sheet for `exam`.
    #[must_use]
    pub fn new(exam: &'a Exam) -> Self {
        Self {
            exam,
            page: DEFAULT_PAGE,
            marks: BTreeMap::new(),
            path: "synthetic://sheet".to_string(),
        }
    }

    /// Sets the page size in pixels.
    #[must_use]
    pub const fn page(mut self, width: u32, height: u32) -> Self {
        self.page = PageSize::new(width, height);
        self
    }

    /// Fills in `label` for question `number`.
    #[must_use]
    pub fn mark(mut self, number: u32, label: &str) -> Self {
        self.marks.insert(number, label.to_string());
        self
    }

    /// Fills in the correct answer for every question.
    #[must_use]
    pub fn answer_key(mut self) -> Self {
        for question in &self.exam.questions {
            self.marks
                .insert(question.number, question.correct_answer.clone());
        }
        self
    }

    /// Sets the path reported by the built image.
    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Renders the sheet.
    ///
    /// # Errors
    ///
    /// Returns an error if a mark names a question or label not on the sheet,
    /// or if the page has zero area.
    pub fn build(self) -> omr_core::Result<ImageInfo> {
        let sheet = render_sheet(self.exam, self.page, &self.marks)?;
        Ok(ImageInfo::new(self.path, DynamicImage::ImageRgb8(sheet)))
    }
}

/// A white image.
#[must_use]
pub fn blank_image(width: u32, height: u32) -> ImageInfo {
    ImageInfo::new(
        "synthetic://blank",
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, WHITE)),
    )
}

/// A white image with the given rectangles filled black.
///
/// Filling a bubble's sampling window exactly gives it density 1.
#[must_use]
#[allow(clippy::cast_possible_wrap)]
pub fn filled_rects(width: u32, height: u32, rects: &[PixelRect]) -> ImageInfo {
    let mut img = RgbImage::from_pixel(width, height, WHITE);
    for rect in rects.iter().filter(|r| r.width > 0 && r.height > 0) {
        draw_filled_rect_mut(
            &mut img,
            Rect::at(rect.x as i32, rect.y as i32).of_size(rect.width, rect.height),
            BLACK,
        );
    }
    ImageInfo::new("synthetic://filled", DynamicImage::ImageRgb8(img))
}

/// An image with no pixels.
#[must_use]
pub fn zero_area_image() -> ImageInfo {
    ImageInfo::new("synthetic://empty", DynamicImage::new_rgb8(0, 0))
}

/// Single-choice exam with one question per answer key entry.
#[must_use]
pub fn answer_key_exam(keys: &[&str]) -> Exam {
    let questions = keys
        .iter()
        .zip(1..)
        .map(|(key, n)| Question::single_choice(n, *key))
        .collect();
    Exam::new("exam-synthetic", questions, LayoutConfig::default())
}

/// Mixed exam: two single-choice, two true/false, one five-option matching.
///
/// Answer key: `1=B 2=T 3=D 4=F 5=E`.
#[must_use]
pub fn sample_exam() -> Exam {
    Exam::new(
        "exam-sample",
        vec![
            Question::single_choice(1, "B"),
            Question::true_false(2, "T"),
            Question::single_choice(3, "D"),
            Question::true_false(4, "F"),
            Question::matching(5, 5, "E"),
        ],
        LayoutConfig::default(),
    )
}

/// Forty single-choice questions over three columns of large bubbles.
#[must_use]
pub fn dense_exam() -> Exam {
    let keys = ["A", "B", "C", "D"];
    let questions = (1..=40)
        .map(|n| Question::single_choice(n, keys[(n as usize) % keys.len()]))
        .collect();
    let layout = LayoutConfig {
        column_count: 3,
        bubble_size: BubbleSize::Large,
        ..LayoutConfig::default()
    };
    Exam::new("exam-dense", questions, layout)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use omr_core::Grader;

    #[test]
    fn test_blank_image_is_white() {
        let img = blank_image(20, 10);
        assert_eq!(img.dimensions().width, 20);
        assert!(img.image.to_rgb8().pixels().all(|p| *p == WHITE));
    }

    #[test]
    fn test_filled_rects() {
        let img = filled_rects(10, 10, &[PixelRect::new(2, 2, 3, 3)])
            .image
            .to_rgb8();
        assert_eq!(*img.get_pixel(2, 2), BLACK);
        assert_eq!(*img.get_pixel(4, 4), BLACK);
        assert_eq!(*img.get_pixel(5, 5), WHITE);
    }

    #[test]
    fn test_sample_exam_is_valid() {
        assert!(sample_exam().validate().is_ok());
        assert!(dense_exam().validate().is_ok());
        assert!(answer_key_exam(&["A", "C"]).validate().is_ok());
    }

    #[test]
    fn test_answer_key_sheet_scores_full_marks() {
        let exam = sample_exam();
        let sheet = SyntheticSheetBuilder::new(&exam)
            .answer_key()
            .build()
            .unwrap();

        let result = Grader::default().grade(&exam, &sheet, "t0").unwrap();
        assert_eq!(result.score, result.max_score);
    }

    #[test]
    fn test_invalid_mark_fails_to_build() {
        let exam = sample_exam();
        assert!(SyntheticSheetBuilder::new(&exam).mark(2, "A").build().is_err());
    }
}
