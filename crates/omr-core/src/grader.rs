//! Sheet grading: binarize, sample every bubble, decide, score.

use tracing::{debug, info};

use crate::binarize::{binarize, BinaryField, DEFAULT_LUMINANCE_THRESHOLD};
use crate::decision::{decide, DEFAULT_FILL_THRESHOLD};
use crate::density::density;
use crate::domain::{DetectedAnswer, Exam, GradingResult, ImageInfo, LayoutConfig, Question};
use crate::error::{OmrError, Result};
use crate::layout::{resolve_layout, PageSize};
use crate::score::score;

/// Thresholds used while grading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraderConfig {
    /// Pixels with luma below this (0-255) are dark.
    pub luminance_threshold: u8,
    /// Bubbles with a dark fraction above this (0.0-1.0) are marked.
    pub fill_threshold: f64,
}

impl Default for GraderConfig {
    fn default() -> Self {
        Self {
            luminance_threshold: DEFAULT_LUMINANCE_THRESHOLD,
            fill_threshold: DEFAULT_FILL_THRESHOLD,
        }
    }
}

/// Stateless bubble-sheet grader.
///
/// Holds only its thresholds, so one instance can grade many sheets, including
/// from several threads at once.
#[derive(Debug, Clone, Default)]
pub struct Grader {
    config: GraderConfig,
}

impl Grader {
    /// Creates a grader with the given thresholds.
    #[must_use]
    pub const fn new(config: GraderConfig) -> Self {
        Self { config }
    }

    /// Returns the grader thresholds.
    #[must_use]
    pub const fn config(&self) -> &GraderConfig {
        &self.config
    }

    /// Detects the marked bubble of every question.
    ///
    /// Returns one [`DetectedAnswer`] per question, in question order.
    /// Bubbles whose sampling window does not fit on the image are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`OmrError::InvalidImage`] if the image has no pixels.
    pub fn detect(
        &self,
        questions: &[Question],
        layout: &LayoutConfig,
        image: &ImageInfo,
    ) -> Result<Vec<DetectedAnswer>> {
        let field = binarize(&image.image, self.config.luminance_threshold)?;
        self.detect_in_field(questions, layout, &field)
    }

    /// Grades a sheet against an exam.
    ///
    /// `timestamp` is recorded verbatim in the result; grading the same image
    /// against the same exam with the same timestamp always yields an equal
    /// result.
    ///
    /// # Errors
    ///
    /// Returns [`OmrError::EmptyExam`] before any sampling if the exam has no
    /// questions, [`OmrError::InvalidExam`] if its numbering, option counts or
    /// answer key are inconsistent, and [`OmrError::InvalidImage`] if the
    /// image has no pixels.
    pub fn grade(
        &self,
        exam: &Exam,
        image: &ImageInfo,
        timestamp: impl Into<String>,
    ) -> Result<GradingResult> {
        if exam.questions.is_empty() {
            return Err(OmrError::EmptyExam);
        }
        exam.validate()?;

        let detections = self.detect(&exam.questions, &exam.layout, image)?;
        let score = score(&exam.questions, &detections)?;

        let answers = detections
            .iter()
            .filter_map(|d| d.detected.clone().map(|label| (d.question_number, label)))
            .collect();

        info!(
            "Graded {} against {}: {}/{} ({:.1}%)",
            image.path, exam.id, score.raw, score.max, score.percentage
        );

        Ok(GradingResult {
            exam_id: exam.id.clone(),
            source: image.path.clone(),
            timestamp: timestamp.into(),
            dimensions: image.dimensions(),
            score: score.raw,
            max_score: score.max,
            percentage: score.percentage,
            answers,
            correctness: score.correctness,
            detections,
        })
    }

    fn detect_in_field(
        &self,
        questions: &[Question],
        layout: &LayoutConfig,
        field: &BinaryField,
    ) -> Result<Vec<DetectedAnswer>> {
        let page = PageSize::new(field.width(), field.height());
        let resolved = resolve_layout(questions, layout, page);

        let mut answers = Vec::with_capacity(resolved.len());
        for question in &resolved {
            let mut candidates = Vec::with_capacity(question.bubbles.len());
            for bubble in &question.bubbles {
                if !bubble.rect.fits(page) {
                    debug!(
                        "Question {} option {} falls outside the {}x{} image, skipped",
                        question.question_number, bubble.label, page.width, page.height
                    );
                    continue;
                }
                candidates.push((bubble.label, density(field, &bubble.rect)?));
            }

            let answer = decide(
                question.question_number,
                candidates,
                self.config.fill_threshold,
            );
            debug!(
                "Question {}: {:?} ({:.3})",
                answer.question_number, answer.detected, answer.confidence
            );
            answers.push(answer);
        }

        Ok(answers)
    }
}
