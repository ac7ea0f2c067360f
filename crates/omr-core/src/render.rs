//! Answer-sheet rasterization.
//!
//! Draws the printable sheet from the same geometry the grader samples, so a
//! rendered sheet scaled to any page size lines up with
//! [`resolve_layout`](crate::layout::resolve_layout) at that size.
//!
//! The four corner squares are printed for the person holding the camera;
//! the grader never looks for them and assumes the photo is already framed.
//!
//! Above the answer grid the header carries a rule and a five-digit student ID
//! grid (one column of `0`-`9` bubbles per digit), drawn as outlines in a box.
//! Nothing reads the ID grid back. Text (school, title, bubble letters and
//! question numbers) is not rasterized.

use std::collections::BTreeMap;

use image::{Rgb, RgbImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_filled_rect_mut, draw_hollow_circle_mut, draw_hollow_rect_mut,
};
use imageproc::rect::Rect;
use tracing::debug;

use crate::domain::Exam;
use crate::error::{OmrError, Result};
use crate::layout::{resolve_layout, PageSize, PixelRect, MARGIN_X};

/// A4 at 150 dpi.
pub const DEFAULT_PAGE: PageSize = PageSize::new(1240, 1754);

/// Corner marker inset from the page edge, fraction of page width.
const CORNER_INSET: f64 = 0.038;
/// Corner marker side, fraction of page width.
const CORNER_SIZE: f64 = 0.025;

/// Header rule position, fraction of page height.
const HEADER_RULE_Y: f64 = 0.09;
/// Top of the student ID grid, fraction of page height.
const ID_TOP: f64 = 0.11;
/// Digit columns in the student ID grid.
const ID_DIGITS: u32 = 5;
/// ID bubble pitch caps, fractions of page width and height. Ten rows at the
/// height cap end at 31% of the page, above the answer grid.
const ID_PITCH_X: f64 = 0.03;
const ID_PITCH_Y: f64 = 0.02;

const PAPER: Rgb<u8> = Rgb([255, 255, 255]);
const INK: Rgb<u8> = Rgb([0, 0, 0]);

/// Renders an answer sheet.
///
/// `marks` maps question numbers to the label to fill in, simulating a
/// completed sheet; pass an empty map for a blank form.
///
/// # Errors
///
/// Returns [`OmrError::InvalidImage`] for a zero-area page and
/// [`OmrError::InvalidExam`] if a mark names a question or label that is not
/// on the sheet.
pub fn render_sheet(
    exam: &Exam,
    page: PageSize,
    marks: &BTreeMap<u32, String>,
) -> Result<RgbImage> {
    if page.width == 0 || page.height == 0 {
        return Err(OmrError::InvalidImage {
            width: page.width,
            height: page.height,
        });
    }

    for (number, label) in marks {
        let question = exam.question(*number).ok_or_else(|| {
            OmrError::InvalidExam(format!("mark for unknown question {number}"))
        })?;
        if !question.labels().contains(&label.as_str()) {
            return Err(OmrError::InvalidExam(format!(
                "question {number} has no option '{label}'"
            )));
        }
    }

    let mut sheet = RgbImage::from_pixel(page.width, page.height, PAPER);
    draw_corner_markers(&mut sheet, page);
    draw_header(&mut sheet, page);

    let resolved = resolve_layout(&exam.questions, &exam.layout, page);
    let mut drawn = 0usize;
    for question in &resolved {
        let marked = marks.get(&question.question_number).map(String::as_str);
        for bubble in &question.bubbles {
            if !bubble.rect.fits(page) {
                continue;
            }
            let (center, radius) = inscribed_circle(&bubble.rect);
            if marked == Some(bubble.label) {
                draw_filled_circle_mut(&mut sheet, center, radius, INK);
            } else {
                draw_hollow_circle_mut(&mut sheet, center, radius, INK);
            }
            drawn += 1;
        }
    }

    debug!(
        "Rendered {} bubbles for {} questions on {}x{}",
        drawn,
        resolved.len(),
        page.width,
        page.height
    );

    Ok(sheet)
}

/// Center and radius of the largest circle inside a sampling window, less a
/// one-pixel border.
#[allow(clippy::cast_possible_wrap)]
fn inscribed_circle(rect: &PixelRect) -> ((i32, i32), i32) {
    let radius = (rect.width.min(rect.height) / 2).saturating_sub(1) as i32;
    let cx = (rect.x + rect.width / 2) as i32;
    let cy = (rect.y + rect.height / 2) as i32;
    ((cx, cy), radius)
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap
)]
fn draw_corner_markers(sheet: &mut RgbImage, page: PageSize) {
    let width = f64::from(page.width);
    let inset = (width * CORNER_INSET).floor() as u32;
    let size = ((width * CORNER_SIZE).floor() as u32).max(1);

    if inset + size >= page.width || inset + size >= page.height {
        return;
    }

    let far_x = page.width - inset - size;
    let far_y = page.height - inset - size;
    for (x, y) in [(inset, inset), (far_x, inset), (inset, far_y), (far_x, far_y)] {
        draw_filled_rect_mut(
            sheet,
            Rect::at(x as i32, y as i32).of_size(size, size),
            INK,
        );
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap
)]
fn draw_header(sheet: &mut RgbImage, page: PageSize) {
    let (width, height) = (f64::from(page.width), f64::from(page.height));
    let left = (width * MARGIN_X).floor() as u32;
    let rule_width = page.width.saturating_sub(2 * left);
    let thickness = (page.height / 600).max(1);
    if rule_width > 0 {
        draw_filled_rect_mut(
            sheet,
            Rect::at(left as i32, (height * HEADER_RULE_Y).floor() as i32)
                .of_size(rule_width, thickness),
            INK,
        );
    }

    let bubbles = student_id_bubbles(page);
    let (Some(&(first, _)), Some(&(last, _))) = (bubbles.first(), bubbles.last()) else {
        return;
    };
    let pad = id_pitch(page) / 2 + 1;
    let box_w = (last.0 - first.0 + 2 * pad) as u32;
    let box_h = (last.1 - first.1 + 2 * pad) as u32;
    draw_hollow_rect_mut(
        sheet,
        Rect::at(first.0 - pad, first.1 - pad).of_size(box_w, box_h),
        INK,
    );
    for (center, r) in bubbles {
        draw_hollow_circle_mut(sheet, center, r, INK);
    }
}

#[allow(clippy::cast_possible_truncation)]
fn id_pitch(page: PageSize) -> i32 {
    let (width, height) = (f64::from(page.width), f64::from(page.height));
    (width * ID_PITCH_X).min(height * ID_PITCH_Y).floor() as i32
}

/// Centers and radii of the student ID bubbles, digit column by digit column,
/// `0` at the top. Empty when the page is too small to print them.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap
)]
fn student_id_bubbles(page: PageSize) -> Vec<((i32, i32), i32)> {
    let (width, height) = (f64::from(page.width), f64::from(page.height));
    let pitch = id_pitch(page);
    let radius = pitch * 2 / 5;
    if radius < 2 {
        return Vec::new();
    }

    let x0 = (width * MARGIN_X).floor() as i32 + pitch;
    let y0 = (height * ID_TOP).floor() as i32 + pitch / 2;
    (0..ID_DIGITS as i32)
        .flat_map(|col| (0..10).map(move |digit| ((x0 + col * pitch, y0 + digit * pitch), radius)))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::cast_sign_loss)]
mod tests {
    use super::*;
    use crate::domain::{ImageInfo, LayoutConfig, Question};
    use crate::grader::Grader;
    use image::DynamicImage;

    fn exam() -> Exam {
        Exam::new(
            "render",
            vec![
                Question::single_choice(1, "C"),
                Question::true_false(2, "F"),
                Question::matching(3, 5, "E"),
            ],
            LayoutConfig::default(),
        )
    }

    fn marks(pairs: &[(u32, &str)]) -> BTreeMap<u32, String> {
        pairs.iter().map(|(n, l)| (*n, (*l).to_string())).collect()
    }

    #[test]
    fn test_blank_sheet_grades_undetected() {
        let exam = exam();
        let sheet = render_sheet(&exam, DEFAULT_PAGE, &BTreeMap::new()).unwrap();
        let info = ImageInfo::new("blank", DynamicImage::ImageRgb8(sheet));

        let answers = Grader::default()
            .detect(&exam.questions, &exam.layout, &info)
            .unwrap();
        for answer in &answers {
            assert!(answer.detected.is_none(), "{answer:?}");
            assert!(answer.confidence > 0.0, "outline should be sampled");
            assert!(answer.confidence < 0.2);
        }
    }

    #[test]
    fn test_marked_sheet_round_trips() {
        let exam = exam();
        let marks = marks(&[(1, "C"), (2, "T"), (3, "E")]);
        let sheet = render_sheet(&exam, DEFAULT_PAGE, &marks).unwrap();
        let info = ImageInfo::new("marked", DynamicImage::ImageRgb8(sheet));

        let result = Grader::default().grade(&exam, &info, "t0").unwrap();
        assert_eq!(result.answers, marks);
        assert_eq!(result.score, 2);
    }

    #[test]
    fn test_corner_markers_are_drawn() {
        let sheet = render_sheet(&exam(), DEFAULT_PAGE, &BTreeMap::new()).unwrap();
        // Inset 47px, size 31px at 1240 wide
        assert_eq!(*sheet.get_pixel(50, 50), INK);
        assert_eq!(*sheet.get_pixel(1240 - 50, 1754 - 50), INK);
        assert_eq!(*sheet.get_pixel(5, 5), PAPER);
    }

    #[test]
    fn test_student_id_grid_sits_above_answers() {
        let bubbles = student_id_bubbles(DEFAULT_PAGE);
        assert_eq!(bubbles.len(), 50);

        let grid_top = f64::from(DEFAULT_PAGE.height) * crate::layout::START_Y;
        let ((x, y), r) = bubbles[bubbles.len() - 1];
        assert!(f64::from(y + r) < grid_top);

        let sheet = render_sheet(&exam(), DEFAULT_PAGE, &BTreeMap::new()).unwrap();
        let ((cx, cy), r) = bubbles[0];
        assert_eq!(*sheet.get_pixel(cx as u32, (cy - r) as u32), INK);
        assert_eq!(*sheet.get_pixel(cx as u32, cy as u32), PAPER);
        assert_eq!(*sheet.get_pixel(x as u32, y as u32), PAPER);
    }

    #[test]
    fn test_small_page_skips_student_id_grid() {
        assert!(student_id_bubbles(PageSize::new(60, 80)).is_empty());
        assert!(render_sheet(&exam(), PageSize::new(60, 80), &BTreeMap::new()).is_ok());
    }

    #[test]
    fn test_unknown_mark_rejected() {
        let exam = exam();
        assert!(render_sheet(&exam, DEFAULT_PAGE, &marks(&[(9, "A")])).is_err());
        assert!(render_sheet(&exam, DEFAULT_PAGE, &marks(&[(2, "A")])).is_err());
    }

    #[test]
    fn test_zero_page_rejected() {
        let err = render_sheet(&exam(), PageSize::new(0, 100), &BTreeMap::new()).unwrap_err();
        assert!(matches!(err, OmrError::InvalidImage { .. }));
    }
}
