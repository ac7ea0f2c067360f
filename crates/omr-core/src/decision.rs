//! Per-question bubble selection.

use crate::domain::DetectedAnswer;

/// Minimum density for a bubble to count as marked.
pub const DEFAULT_FILL_THRESHOLD: f64 = 0.35;

/// Picks the marked bubble of one question.
///
/// `candidates` yields `(label, density)` for every in-bounds bubble in label
/// order. The densest candidate wins; on equal density the earlier label is
/// kept. The winner is reported only if its density exceeds
/// `fill_threshold`, otherwise the answer is undetected with the best
/// sub-threshold density as confidence.
///
/// Two solidly filled bubbles are not flagged: the first one in label order
/// wins.
pub fn decide<'a, I>(question_number: u32, candidates: I, fill_threshold: f64) -> DetectedAnswer
where
    I: IntoIterator<Item = (&'a str, f64)>,
{
    let mut best: Option<(&str, f64)> = None;

    for (label, density) in candidates {
        match best {
            Some((_, max)) if density <= max => {}
            _ => best = Some((label, density)),
        }
    }

    match best {
        Some((label, density)) if density > fill_threshold => DetectedAnswer {
            question_number,
            detected: Some(label.to_string()),
            confidence: density,
        },
        Some((_, density)) => DetectedAnswer {
            question_number,
            detected: None,
            confidence: density,
        },
        None => DetectedAnswer {
            question_number,
            detected: None,
            confidence: 0.0,
        },
    }
}
