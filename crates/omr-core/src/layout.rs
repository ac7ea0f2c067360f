//! Answer-sheet layout geometry.
//!
//! Maps every `(question, option)` pair to a pixel rectangle on a page of a
//! given size. Both the sheet rasterizer and the grader call
//! [`resolve_layout`]; any divergence between the two would silently shift
//! every sampling window, so there is exactly one implementation.
//!
//! All positions are fractions of the full page dimensions:
//! - 10% side margins, the remaining width split into equal column bands
//! - grid starts at 34% of page height, one row per question
//! - first bubble 4% of page width right of the column edge, then 5.5% apart
//! - sampling window 3.5% of page width by 75% of the row height

use std::ops::Range;

use serde::Serialize;

use crate::domain::{BubbleSize, ImageDimensions, LayoutConfig, Question};

/// Side margin as a fraction of page width (applied left and right).
pub const MARGIN_X: f64 = 0.10;
/// Top of the answer grid as a fraction of page height.
pub const START_Y: f64 = 0.34;
/// Clearance for the printed question number, fraction of page width.
pub const QUESTION_NUMBER_OFFSET: f64 = 0.04;
/// Horizontal distance between consecutive bubbles, fraction of page width.
pub const BUBBLE_PITCH: f64 = 0.055;
/// Sampling window width, fraction of page width.
pub const BUBBLE_WIDTH: f64 = 0.035;
/// Sampling window height, fraction of row height.
pub const SAMPLE_HEIGHT: f64 = 0.75;

/// Target raster size the layout is resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PageSize {
    /// Creates a page size.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl From<ImageDimensions> for PageSize {
    fn from(d: ImageDimensions) -> Self {
        Self::new(d.width, d.height)
    }
}

/// Axis-aligned pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PixelRect {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PixelRect {
    /// Creates a rectangle.
    #[must_use]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Number of pixels covered.
    #[must_use]
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Whether the rectangle can be sampled on a page of this size.
    ///
    /// The right and bottom edges must stay strictly inside the page; a
    /// window that does not fit is skipped by the grader rather than clamped.
    #[must_use]
    pub const fn fits(&self, page: PageSize) -> bool {
        let right = self.x as u64 + self.width as u64;
        let bottom = self.y as u64 + self.height as u64;
        right < page.width as u64 && bottom < page.height as u64
    }
}

/// Sampling window of one option bubble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BubbleRegion {
    /// Question the bubble belongs to.
    pub question_number: u32,
    /// Option label printed in the bubble.
    pub label: &'static str,
    /// Pixel rectangle on the page.
    #[serde(flatten)]
    pub rect: PixelRect,
}

/// Resolved position of one question and its bubbles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionLayout {
    /// Question sequence number.
    pub question_number: u32,
    /// 0-based column index.
    pub column: usize,
    /// 0-based row index within the column.
    pub row: usize,
    /// Bubbles in label order.
    pub bubbles: Vec<BubbleRegion>,
}

/// Number of questions placed in each full column.
#[must_use]
pub fn questions_per_column(question_count: usize, column_count: u8) -> usize {
    question_count.div_ceil(usize::from(column_count.max(1)))
}

/// Index ranges of the questions placed in each column.
///
/// Always returns `column_count` ranges; trailing columns may be empty.
#[must_use]
pub fn column_blocks(question_count: usize, column_count: u8) -> Vec<Range<usize>> {
    let per_column = questions_per_column(question_count, column_count);
    (0..usize::from(column_count.max(1)))
        .map(|column| {
            let start = (column * per_column).min(question_count);
            let end = ((column + 1) * per_column).min(question_count);
            start..end
        })
        .collect()
}

/// Row height in pixels (unfloored) for a bubble size class.
#[must_use]
pub fn row_height(page: PageSize, bubble_size: BubbleSize) -> f64 {
    f64::from(page.height) * bubble_size.row_fraction()
}

/// Resolves the bubble rectangles for every question on a page.
///
/// Returns one [`QuestionLayout`] per question, in input order. Rectangles
/// are returned whether or not they fit on the page; callers check
/// [`PixelRect::fits`].
#[must_use]
pub fn resolve_layout(
    questions: &[Question],
    config: &LayoutConfig,
    page: PageSize,
) -> Vec<QuestionLayout> {
    let width = f64::from(page.width);
    let height = f64::from(page.height);

    let start_y = height * START_Y;
    let row_h = row_height(page, config.bubble_size);

    let usable_width = width * (1.0 - MARGIN_X - MARGIN_X);
    let column_width = usable_width / f64::from(config.column_count.max(1));

    let number_offset = width * QUESTION_NUMBER_OFFSET;
    let pitch = width * BUBBLE_PITCH;

    let bubble_w = floor_px(width * BUBBLE_WIDTH);
    let bubble_h = floor_px(row_h * SAMPLE_HEIGHT);

    let per_column = questions_per_column(questions.len(), config.column_count);

    questions
        .iter()
        .enumerate()
        .map(|(index, question)| {
            let column = index / per_column;
            let row = index % per_column;

            #[allow(clippy::cast_precision_loss)]
            let column_x = (width * MARGIN_X) + (column as f64 * column_width) + number_offset;
            #[allow(clippy::cast_precision_loss)]
            let y = start_y + (row as f64 * row_h);

            let bubbles = question
                .labels()
                .iter()
                .enumerate()
                .map(|(option, &label)| {
                    #[allow(clippy::cast_precision_loss)]
                    let x = column_x + (option as f64 * pitch);
                    BubbleRegion {
                        question_number: question.number,
                        label,
                        rect: PixelRect::new(floor_px(x), floor_px(y), bubble_w, bubble_h),
                    }
                })
                .collect();

            QuestionLayout {
                question_number: question.number,
                column,
                row,
                bubbles,
            }
        })
        .collect()
}

/// Floors a non-negative page coordinate to whole pixels.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn floor_px(value: f64) -> u32 {
    value.floor().max(0.0) as u32
}
