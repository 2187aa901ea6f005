use core::fmt;

use serde::{Deserialize, Serialize};

/// The fixed set of focus areas an assessment can cover.
#[derive(Debug, Serialize, Deserialize, Hash, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    SoilHealth,
    PestManagement,
    Irrigation,
    CropRotation,
    PrecisionAgriculture,
}

impl Topic {
    pub fn as_str(&self) -> &str {
        match self {
            Topic::SoilHealth => "Soil Health & Nutrition",
            Topic::PestManagement => "Integrated Pest Management",
            Topic::Irrigation => "Sustainable Irrigation",
            Topic::CropRotation => "Crop Rotation & Biodiversity",
            Topic::PrecisionAgriculture => "Precision Agriculture & Tech",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize, Hash, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(&self) -> &str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single validated multiple-choice question. Built only through
/// [`Question::new`], immutable afterwards.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Question {
    text: String,
    options: Vec<String>,
    answer: String,
    hint: String,
}

pub const OPTIONS_PER_QUESTION: usize = 4;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum QuestionError {
    #[error("Question text is empty")]
    EmptyText,

    #[error("Expected {OPTIONS_PER_QUESTION} options, got {0}")]
    WrongOptionCount(usize),

    #[error("Option '{0}' is empty or duplicated")]
    BadOption(String),

    #[error("Answer '{0}' does not match any option")]
    UnknownAnswer(String),

    #[error("Hint is empty")]
    EmptyHint,
}

impl Question {
    pub fn new(
        text: String,
        options: Vec<String>,
        answer: String,
        hint: String,
    ) -> Result<Self, QuestionError> {
        if text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }
        if options.len() != OPTIONS_PER_QUESTION {
            return Err(QuestionError::WrongOptionCount(options.len()));
        }
        for (i, option) in options.iter().enumerate() {
            if option.trim().is_empty() || options[..i].contains(option) {
                return Err(QuestionError::BadOption(option.clone()));
            }
        }
        if !options.contains(&answer) {
            return Err(QuestionError::UnknownAnswer(answer));
        }
        if hint.trim().is_empty() {
            return Err(QuestionError::EmptyHint);
        }

        Ok(Self {
            text,
            options,
            answer,
            hint,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn hint(&self) -> &str {
        &self.hint
    }
}

/// Client-facing shape of a live question. Deliberately carries no answer
/// field so the correct option never reaches the client mid-assessment.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct QuestionView {
    pub number: usize,
    pub total: usize,
    pub text: String,
    pub options: Vec<String>,
    pub hint: String,
}

impl QuestionView {
    pub fn from_question(question: &Question, index: usize, total: usize) -> Self {
        Self {
            number: index + 1,
            total,
            text: question.text().to_string(),
            options: question.options().to_vec(),
            hint: question.hint().to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Scorecard {
    pub correct: usize,
    pub total: usize,
    pub percentage: f64,
}

impl Scorecard {
    pub fn new(correct: usize, total: usize) -> Self {
        Self {
            correct,
            total,
            percentage: (correct as f64 / total as f64) * 100.0,
        }
    }
}

/// One line of the post-assessment review.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ReviewEntry {
    pub question: String,
    pub user_answer: String,
    pub correct_answer: String,
    pub correct: bool,
}
