//! Luminance thresholding of scanned sheets.

use crate::error::{OmrError, Result};

/// Luminance below which a pixel counts as a mark (0-255 scale).
pub const DEFAULT_LUMINANCE_THRESHOLD: u8 = 120;

/// Per-pixel dark/light classification of a raster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryField {
    width: u32,
    height: u32,
    dark: Vec<bool>,
}

impl BinaryField {
    /// Field width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Field height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Whether the pixel at `(x, y)` is dark. Out-of-field pixels are light.
    #[must_use]
    pub fn is_dark(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.dark[self.index(x, y)]
    }

    /// Number of dark pixels in row `y` between columns `x0..x1`.
    pub(crate) fn count_dark_in_row(&self, y: u32, x0: u32, x1: u32) -> u64 {
        let start = self.index(x0, y);
        let end = self.index(x1, y);
        self.dark[start..end].iter().filter(|&&d| d).count() as u64
    }

    /// Total number of dark pixels.
    #[must_use]
    pub fn dark_count(&self) -> usize {
        self.dark.iter().filter(|&&d| d).count()
    }

    #[allow(clippy::cast_possible_truncation)]
    const fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

/// Weighted luma of an RGB sample (ITU-R BT.601 weights).
#[must_use]
pub fn luma(r: u8, g: u8, b: u8) -> f64 {
    0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b)
}

/// Classifies each pixel as dark when its luma is below `threshold`.
///
/// Grayscale and alpha images are expanded to RGB first; alpha is ignored.
///
/// # Errors
///
/// Returns [`OmrError::InvalidImage`] if the image has no pixels.
pub fn binarize(image: &image::DynamicImage, threshold: u8) -> Result<BinaryField> {
    let (width, height) = (image.width(), image.height());
    if width == 0 || height == 0 {
        return Err(OmrError::InvalidImage { width, height });
    }

    let limit = f64::from(threshold);
    let rgb = image.to_rgb8();
    let dark = rgb
        .pixels()
        .map(|p| luma(p.0[0], p.0[1], p.0[2]) < limit)
        .collect();

    Ok(BinaryField {
        width,
        height,
        dark,
    })
}
