//! Grading input and output types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Outcome of the bubble decision for one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedAnswer {
    /// Question sequence number.
    pub question_number: u32,
    /// Winning label, or `None` when no bubble cleared the fill threshold.
    pub detected: Option<String>,
    /// Dark-pixel fraction of the best region (0.0 to 1.0).
    pub confidence: f64,
}

impl DetectedAnswer {
    /// Returns true if a mark was found for this question.
    #[must_use]
    pub const fn is_detected(&self) -> bool {
        self.detected.is_some()
    }
}

/// Graded sheet, handed to the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingResult {
    /// Exam the sheet was graded against.
    pub exam_id: String,
    /// Path or URI of the graded image.
    pub source: String,
    /// Timestamp of grading (RFC 3339), supplied by the caller.
    pub timestamp: String,
    /// Image dimensions.
    pub dimensions: ImageDimensions,
    /// Count of correct answers.
    pub score: u32,
    /// Number of questions.
    pub max_score: u32,
    /// `score / max_score * 100`.
    pub percentage: f64,
    /// Question number to detected label. Undetected questions are absent.
    pub answers: BTreeMap<u32, String>,
    /// Question number to correctness.
    pub correctness: BTreeMap<u32, bool>,
    /// Per-question detections with confidence, in question order.
    pub detections: Vec<DetectedAnswer>,
}

impl GradingResult {
    /// Number of questions with no detected mark.
    #[must_use]
    pub fn undetected_count(&self) -> usize {
        self.detections.iter().filter(|d| !d.is_detected()).count()
    }
}

/// Image dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl ImageDimensions {
    /// Creates new dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// A decoded scan or photograph of an answer sheet.
#[derive(Debug, Clone)]
pub struct ImageInfo {
    /// Path to the image file.
    pub path: String,
    /// Decoded image data.
    pub image: image::DynamicImage,
}

impl ImageInfo {
    /// Wraps a decoded image.
    #[must_use]
    pub fn new(path: impl Into<String>, image: image::DynamicImage) -> Self {
        Self {
            path: path.into(),
            image,
        }
    }

    /// Returns the raster dimensions.
    #[must_use]
    pub fn dimensions(&self) -> ImageDimensions {
        ImageDimensions::new(self.image.width(), self.image.height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::DynamicImage;

    #[test]
    fn test_dimensions_follow_the_raster() {
        let mut info = ImageInfo::new("scan", DynamicImage::new_rgb8(30, 20));
        assert_eq!(info.dimensions(), ImageDimensions::new(30, 20));

        info.image = info.image.rotate90();
        assert_eq!(info.dimensions(), ImageDimensions::new(20, 30));
    }
}
