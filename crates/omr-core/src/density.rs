//! Dark-pixel density of bubble sampling windows.

use crate::binarize::BinaryField;
use crate::error::{OmrError, Result};
use crate::layout::PixelRect;

/// Fraction of dark pixels inside `rect`, in `[0, 1]`.
///
/// Pixels of `rect` that fall outside the field count as light, so a window
/// hanging off the edge is diluted rather than renormalized. A zero-area
/// window has density 0.
///
/// # Errors
///
/// Returns [`OmrError::OutOfBounds`] if `rect` lies entirely outside the field.
#[allow(clippy::cast_precision_loss)]
pub fn density(field: &BinaryField, rect: &PixelRect) -> Result<f64> {
    if rect.x >= field.width() || rect.y >= field.height() {
        return Err(OmrError::OutOfBounds {
            x: rect.x,
            y: rect.y,
            width: field.width(),
            height: field.height(),
        });
    }

    let area = rect.area();
    if area == 0 {
        return Ok(0.0);
    }

    let x_end = rect.x.saturating_add(rect.width).min(field.width());
    let y_end = rect.y.saturating_add(rect.height).min(field.height());

    let dark: u64 = (rect.y..y_end)
        .map(|y| field.count_dark_in_row(y, rect.x, x_end))
        .sum();

    Ok(dark as f64 / area as f64)
}
