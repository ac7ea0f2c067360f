//! Exam definition loader.

use std::path::Path;

use anyhow::{Context, Result};
use omr_core::Exam;
use tracing::debug;

/// Reads and validates an exam definition from a JSON file.
///
/// Accepts the authoring tool's export format (`layoutConfig`,
/// `optionsCount`, `MCQ`, `sm`/`md`/`lg`).
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not valid JSON, or
/// violates an exam invariant.
pub fn load_exam(path: &Path) -> Result<Exam> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read exam: {}", path.display()))?;

    let exam: Exam = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse exam: {}", path.display()))?;

    exam.validate()
        .with_context(|| format!("Invalid exam: {}", path.display()))?;

    debug!(
        "Loaded exam {} with {} questions ({} columns, {:?} bubbles)",
        exam.id,
        exam.question_count(),
        exam.layout.column_count,
        exam.layout.bubble_size
    );

    Ok(exam)
}
