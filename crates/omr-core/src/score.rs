//! Comparison of detected answers against the answer key.

use std::collections::BTreeMap;

use crate::domain::{DetectedAnswer, Question};
use crate::error::{OmrError, Result};

/// Aggregate score of one graded sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct Score {
    /// Count of correct answers.
    pub raw: u32,
    /// Number of questions.
    pub max: u32,
    /// `raw / max * 100`.
    pub percentage: f64,
    /// Question number to correctness.
    pub correctness: BTreeMap<u32, bool>,
}

/// Scores detections against each question's correct answer.
///
/// Labels are compared with exact, case-sensitive string equality. A question
/// without a detection, or with an undetected answer, is incorrect.
///
/// # Errors
///
/// Returns [`OmrError::EmptyExam`] if `questions` is empty.
#[allow(clippy::cast_possible_truncation)]
pub fn score(questions: &[Question], detections: &[DetectedAnswer]) -> Result<Score> {
    if questions.is_empty() {
        return Err(OmrError::EmptyExam);
    }

    let detected: BTreeMap<u32, &str> = detections
        .iter()
        .filter_map(|d| d.detected.as_deref().map(|label| (d.question_number, label)))
        .collect();

    let is_correct = |q: &Question| {
        detected
            .get(&q.number)
            .is_some_and(|&label| label == q.correct_answer)
    };

    let correctness: BTreeMap<u32, bool> =
        questions.iter().map(|q| (q.number, is_correct(q))).collect();

    // Counted per question so raw and max agree even if numbers repeat
    let raw = questions.iter().filter(|&q| is_correct(q)).count() as u32;
    let max = questions.len() as u32;

    Ok(Score {
        raw,
        max,
        percentage: f64::from(raw) / f64::from(max) * 100.0,
        correctness,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn detection(number: u32, label: Option<&str>) -> DetectedAnswer {
        DetectedAnswer {
            question_number: number,
            detected: label.map(str::to_string),
            confidence: if label.is_some() { 0.9 } else { 0.0 },
        }
    }

    #[test]
    fn test_three_of_four() {
        let questions: Vec<_> = ["A", "B", "C", "D"]
            .iter()
            .zip(1..)
            .map(|(key, n)| Question::single_choice(n, *key))
            .collect();
        let detections = vec![
            detection(1, Some("A")),
            detection(2, Some("B")),
            detection(3, Some("C")),
            detection(4, None),
        ];

        let score = score(&questions, &detections).unwrap();
        assert_eq!(score.raw, 3);
        assert_eq!(score.max, 4);
        assert!((score.percentage - 75.0).abs() < f64::EPSILON);
        assert_eq!(score.correctness.get(&4), Some(&false));
        assert_eq!(score.correctness.get(&1), Some(&true));
    }

    #[test]
    fn test_true_false_exact_match() {
        let questions = vec![Question::true_false(1, "T"), Question::true_false(2, "F")];
        let detections = vec![detection(1, Some("T")), detection(2, Some("T"))];

        let score = score(&questions, &detections).unwrap();
        assert_eq!(score.raw, 1);
        assert!((score.percentage - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_case_sensitive() {
        let questions = vec![Question::single_choice(1, "A")];
        let score = score(&questions, &[detection(1, Some("a"))]).unwrap();
        assert_eq!(score.raw, 0);
    }

    #[test]
    fn test_missing_detection_is_incorrect() {
        let questions = vec![Question::single_choice(1, "A"), Question::single_choice(2, "B")];
        let score = score(&questions, &[detection(1, Some("A"))]).unwrap();
        assert_eq!(score.raw, 1);
        assert_eq!(score.correctness.get(&2), Some(&false));
    }

    #[test]
    fn test_repeated_numbers_count_every_question() {
        let questions = vec![Question::single_choice(1, "A"), Question::single_choice(1, "A")];
        let detections = vec![detection(1, Some("A")), detection(1, Some("A"))];

        let score = score(&questions, &detections).unwrap();
        assert_eq!((score.raw, score.max), (2, 2));
        assert!((score.percentage - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_exam() {
        assert_eq!(score(&[], &[]), Err(OmrError::EmptyExam));
    }
}
