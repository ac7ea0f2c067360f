//! Integration tests for the exam loader and the JSON Lines result store.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;

use omr_adapters::{load_exam, JsonlResultStore};
use omr_core::{BubbleSize, Grader, QuestionType, ResultOutput};
use omr_test_support::{sample_exam, SyntheticSheetBuilder};

#[test]
fn test_load_exam_round_trip() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("exam.json");
    let exam = sample_exam();
    fs::write(&path, serde_json::to_string_pretty(&exam).unwrap()).unwrap();

    assert_eq!(load_exam(&path).unwrap(), exam);
}

#[test]
fn test_load_authored_exam() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("exam.json");
    fs::write(
        &path,
        r#"{
            "id": "exam-7",
            "title": "Weekly",
            "questions": [
                {"id": "x", "number": 1, "type": "MCQ", "correctAnswer": "D"},
                {"id": "y", "number": 2, "type": "TRUE_FALSE", "correctAnswer": "F"}
            ],
            "layoutConfig": {"columnCount": 1, "bubbleSize": "sm", "bubbleSpacing": "compact"}
        }"#,
    )
    .unwrap();

    let exam = load_exam(&path).unwrap();
    assert_eq!(exam.title, "Weekly");
    assert_eq!(exam.questions[0].question_type, QuestionType::SingleChoice);
    assert_eq!(exam.layout.bubble_size, BubbleSize::Small);
}

#[test]
fn test_load_exam_errors_name_the_file() {
    let temp_dir = tempfile::tempdir().unwrap();

    let missing = temp_dir.path().join("missing.json");
    let err = load_exam(&missing).unwrap_err();
    assert!(format!("{err:#}").contains("missing.json"));

    let garbage = temp_dir.path().join("garbage.json");
    fs::write(&garbage, "{ not json").unwrap();
    let err = load_exam(&garbage).unwrap_err();
    assert!(format!("{err:#}").contains("Failed to parse exam"));

    let gap = temp_dir.path().join("gap.json");
    fs::write(
        &gap,
        r#"{"id": "g", "questions": [
            {"id": "a", "number": 1, "type": "MCQ", "correctAnswer": "A"},
            {"id": "b", "number": 3, "type": "MCQ", "correctAnswer": "A"}
        ]}"#,
    )
    .unwrap();
    let err = load_exam(&gap).unwrap_err();
    assert!(format!("{err:#}").contains("contiguous"));
}

#[test]
fn test_store_appends_and_filters_by_exam() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("nested").join("grades.jsonl");

    let exam = sample_exam();
    let sheet = SyntheticSheetBuilder::new(&exam)
        .answer_key()
        .build()
        .unwrap();
    let result = Grader::default().grade(&exam, &sheet, "2024-05-01T08:00:00Z").unwrap();
    let mut other = result.clone();
    other.exam_id = "exam-other".to_string();

    {
        let store = JsonlResultStore::open(&path).unwrap();
        store.write(&result).unwrap();
        store.write(&other).unwrap();
        store.flush().unwrap();
    }
    {
        // Reopening appends rather than truncating
        let store = JsonlResultStore::open(&path).unwrap();
        store.write(&result).unwrap();
        store.flush().unwrap();
    }

    let stored = JsonlResultStore::results_for_exam(&path, "exam-sample").unwrap();
    assert_eq!(stored, vec![result.clone(), result]);
    assert_eq!(
        JsonlResultStore::results_for_exam(&path, "exam-other")
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn test_store_skips_malformed_lines() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("grades.jsonl");

    let exam = sample_exam();
    let sheet = SyntheticSheetBuilder::new(&exam).build().unwrap();
    let result = Grader::default().grade(&exam, &sheet, "t0").unwrap();

    fs::write(
        &path,
        format!(
            "garbage\n\n{}\n",
            serde_json::to_string(&result).unwrap()
        ),
    )
    .unwrap();

    let stored = JsonlResultStore::results_for_exam(&path, "exam-sample").unwrap();
    assert_eq!(stored.len(), 1);
}

#[test]
fn test_missing_store_reads_empty() {
    let temp_dir = tempfile::tempdir().unwrap();
    let stored =
        JsonlResultStore::results_for_exam(temp_dir.path().join("none.jsonl"), "x").unwrap();
    assert!(stored.is_empty());
}
