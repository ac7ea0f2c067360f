//! Exam definition types supplied by the authoring side.

use serde::{Deserialize, Serialize};

use crate::error::{OmrError, Result};

/// Option labels for choice-style questions, in rendering order.
pub const LETTERS: [&str; 10] = ["A", "B", "C", "D", "E", "F", "G", "H", "I", "J"];

/// Bubble order for true/false questions. Not alphabetical.
pub const TRUE_FALSE_LABELS: [&str; 2] = ["F", "T"];

/// Option count used when a choice-style question does not specify one.
pub const DEFAULT_OPTION_COUNT: u8 = 4;

/// Kind of question. Every kind resolves to "pick exactly one labeled bubble".
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionType {
    /// Multiple choice, labels `A`, `B`, ...
    #[serde(alias = "MCQ")]
    SingleChoice,
    /// True/false, bubbles `F` then `T`.
    TrueFalse,
    /// Matching, rendered like multiple choice.
    Matching,
}

/// A single question on the answer sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Stable identifier assigned by the authoring collaborator.
    pub id: String,
    /// 1-based sequence number printed next to the bubbles.
    pub number: u32,
    /// Question kind.
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    /// Number of options for choice-style questions. Absent or zero means
    /// [`DEFAULT_OPTION_COUNT`].
    #[serde(
        default,
        rename = "optionsCount",
        alias = "optionCount",
        skip_serializing_if = "Option::is_none"
    )]
    pub option_count: Option<u8>,
    /// Correct label (`A`.. for choice-style, `T`/`F` for true/false).
    pub correct_answer: String,
}

impl Question {
    /// Creates a multiple-choice question with the default option count.
    #[must_use]
    pub fn single_choice(number: u32, correct_answer: impl Into<String>) -> Self {
        Self {
            id: format!("q{number}"),
            number,
            question_type: QuestionType::SingleChoice,
            option_count: None,
            correct_answer: correct_answer.into(),
        }
    }

    /// Creates a true/false question.
    #[must_use]
    pub fn true_false(number: u32, correct_answer: impl Into<String>) -> Self {
        Self {
            id: format!("q{number}"),
            number,
            question_type: QuestionType::TrueFalse,
            option_count: None,
            correct_answer: correct_answer.into(),
        }
    }

    /// Creates a matching question.
    #[must_use]
    pub fn matching(number: u32, option_count: u8, correct_answer: impl Into<String>) -> Self {
        Self {
            id: format!("q{number}"),
            number,
            question_type: QuestionType::Matching,
            option_count: Some(option_count),
            correct_answer: correct_answer.into(),
        }
    }

    /// Sets an explicit option count.
    #[must_use]
    pub const fn with_option_count(mut self, option_count: u8) -> Self {
        self.option_count = Some(option_count);
        self
    }

    /// Number of bubbles rendered for this question.
    #[must_use]
    pub fn bubble_count(&self) -> usize {
        match self.question_type {
            QuestionType::TrueFalse => TRUE_FALSE_LABELS.len(),
            QuestionType::SingleChoice | QuestionType::Matching => {
                match self.option_count {
                    None | Some(0) => usize::from(DEFAULT_OPTION_COUNT),
                    Some(count) => usize::from(count),
                }
            }
        }
    }

    /// Bubble labels in left-to-right rendering order.
    ///
    /// Choice-style option counts beyond the label alphabet are truncated;
    /// [`Question::validate`] rejects them.
    #[must_use]
    pub fn labels(&self) -> &'static [&'static str] {
        match self.question_type {
            QuestionType::TrueFalse => &TRUE_FALSE_LABELS,
            QuestionType::SingleChoice | QuestionType::Matching => {
                &LETTERS[..self.bubble_count().min(LETTERS.len())]
            }
        }
    }

    /// Checks the option count and the answer key against the rendered labels.
    ///
    /// # Errors
    ///
    /// Returns [`OmrError::InvalidExam`] when the option count is outside
    /// `2..=10` or the correct answer is not one of the question's labels.
    pub fn validate(&self) -> Result<()> {
        let count = self.bubble_count();
        if !(2..=LETTERS.len()).contains(&count) {
            return Err(OmrError::InvalidExam(format!(
                "question {}: option count must be 2-{}, got {count}",
                self.number,
                LETTERS.len()
            )));
        }
        if !self.labels().contains(&self.correct_answer.as_str()) {
            return Err(OmrError::InvalidExam(format!(
                "question {}: correct answer '{}' is not one of {:?}",
                self.number,
                self.correct_answer,
                self.labels()
            )));
        }
        Ok(())
    }
}

/// Printed bubble size. Selects the row height of the answer grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BubbleSize {
    /// 2.8% of page height per row.
    #[serde(alias = "sm")]
    Small,
    /// 3.3% of page height per row.
    #[default]
    #[serde(alias = "md")]
    Medium,
    /// 4.0% of page height per row.
    #[serde(alias = "lg")]
    Large,
}

impl BubbleSize {
    /// Row height as a fraction of page height.
    #[must_use]
    pub const fn row_fraction(self) -> f64 {
        match self {
            Self::Small => 0.028,
            Self::Medium => 0.033,
            Self::Large => 0.040,
        }
    }
}

/// Printed spacing between bubbles. Carried with the layout for the
/// rendering side; sampling positions do not depend on it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BubbleSpacing {
    /// Tight spacing.
    Compact,
    /// Default spacing.
    #[default]
    Normal,
    /// Loose spacing.
    Wide,
}

/// Geometric configuration stored with the exam at sheet-generation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Number of question columns (1-3).
    pub column_count: u8,
    /// Bubble size class.
    #[serde(default)]
    pub bubble_size: BubbleSize,
    /// Bubble spacing class.
    #[serde(default)]
    pub bubble_spacing: BubbleSpacing,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            column_count: 2,
            bubble_size: BubbleSize::default(),
            bubble_spacing: BubbleSpacing::default(),
        }
    }
}

impl LayoutConfig {
    /// Creates a layout with the given column count and bubble size.
    ///
    /// # Errors
    ///
    /// Returns [`OmrError::InvalidExam`] if `column_count` is not 1-3.
    pub fn new(column_count: u8, bubble_size: BubbleSize) -> Result<Self> {
        let config = Self {
            column_count,
            bubble_size,
            bubble_spacing: BubbleSpacing::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Sets the spacing class.
    #[must_use]
    pub const fn with_spacing(mut self, bubble_spacing: BubbleSpacing) -> Self {
        self.bubble_spacing = bubble_spacing;
        self
    }

    /// Checks the column count.
    ///
    /// # Errors
    ///
    /// Returns [`OmrError::InvalidExam`] if `column_count` is not 1-3.
    pub fn validate(&self) -> Result<()> {
        if (1..=3).contains(&self.column_count) {
            Ok(())
        } else {
            Err(OmrError::InvalidExam(format!(
                "column count must be 1-3, got {}",
                self.column_count
            )))
        }
    }
}

/// An exam as handed over by the authoring collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exam {
    /// Exam identifier.
    pub id: String,
    /// Exam title printed in the sheet header.
    #[serde(default)]
    pub title: String,
    /// Subject printed in the sheet header.
    #[serde(default)]
    pub subject: String,
    /// Grade level printed in the sheet header.
    #[serde(default)]
    pub grade_level: String,
    /// School name printed in the sheet header.
    #[serde(default)]
    pub school_name: String,
    /// Questions in sheet order.
    pub questions: Vec<Question>,
    /// Creation time in milliseconds since the Unix epoch.
    #[serde(default)]
    pub created_at: u64,
    /// Layout used when the sheet was generated.
    #[serde(default, rename = "layoutConfig", alias = "layout")]
    pub layout: LayoutConfig,
}

impl Exam {
    /// Creates an exam with empty header fields.
    #[must_use]
    pub fn new(id: impl Into<String>, questions: Vec<Question>, layout: LayoutConfig) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            subject: String::new(),
            grade_level: String::new(),
            school_name: String::new(),
            questions,
            created_at: 0,
            layout,
        }
    }

    /// Number of questions, which is also the maximum score.
    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// Finds a question by its sequence number.
    #[must_use]
    pub fn question(&self, number: u32) -> Option<&Question> {
        self.questions.iter().find(|q| q.number == number)
    }

    /// Validates layout, numbering and every question.
    ///
    /// An exam without questions is valid here; grading rejects it with
    /// [`OmrError::EmptyExam`].
    ///
    /// # Errors
    ///
    /// Returns [`OmrError::InvalidExam`] describing the first violation.
    pub fn validate(&self) -> Result<()> {
        self.layout.validate()?;
        for (index, question) in self.questions.iter().enumerate() {
            let expected = u32::try_from(index + 1)
                .map_err(|_| OmrError::InvalidExam("too many questions".into()))?;
            if question.number != expected {
                return Err(OmrError::InvalidExam(format!(
                    "question numbers must be contiguous from 1: expected {expected}, got {}",
                    question.number
                )));
            }
            question.validate()?;
        }
        Ok(())
    }
}
