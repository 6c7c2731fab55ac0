//! Trivia question supply.
//!
//! The bank is loaded once at process start from a JSON file of the shape
//! `{"questionBank": [{"question", "options", "correct"}, ...]}` and
//! validated fail-fast; drawing a question afterwards has no error path.

use derive_getters::Getters;
use derive_more::{Display, Error};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// One trivia question.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct Question {
    /// Question text shown to both players.
    #[serde(rename = "question")]
    prompt: String,
    /// Answer options, in display order.
    options: Vec<String>,
    /// The correct option. Never serialized to clients.
    correct: String,
}

impl Question {
    /// Creates a question.
    pub fn new(
        prompt: impl Into<String>,
        options: impl IntoIterator<Item = impl Into<String>>,
        correct: impl Into<String>,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            options: options.into_iter().map(Into::into).collect(),
            correct: correct.into(),
        }
    }

    /// Checks a submitted answer against the correct option.
    pub fn is_correct(&self, answer: &str) -> bool {
        self.correct == answer
    }
}

/// Errors raised while loading the question bank. All are startup-fatal.
#[derive(Debug, Clone, Display, Error)]
pub enum BankError {
    /// The bank file could not be read.
    #[display("failed to read question bank: {message}")]
    Io {
        /// Underlying I/O error text.
        message: String,
    },
    /// The bank file is not valid JSON in the expected shape.
    #[display("failed to parse question bank: {message}")]
    Parse {
        /// Underlying parse error text.
        message: String,
    },
    /// The bank holds no questions.
    #[display("question bank is empty")]
    Empty,
    /// A question offers fewer than two options.
    #[display("question {index} needs at least two options")]
    TooFewOptions {
        /// Zero-based index of the offending question.
        index: usize,
    },
    /// A question's correct answer is not one of its options.
    #[display("question {index} lists a correct answer that is not among its options")]
    CorrectNotAnOption {
        /// Zero-based index of the offending question.
        index: usize,
    },
}

/// On-disk bank file shape.
#[derive(Debug, Deserialize)]
struct BankFile {
    #[serde(rename = "questionBank")]
    question_bank: Vec<Question>,
}

/// Fixed, validated question bank.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Builds a bank from pre-assembled questions, validating every entry.
    ///
    /// # Errors
    ///
    /// Returns a [`BankError`] when the bank is empty, a question has fewer
    /// than two options, or a correct answer is not among its options.
    pub fn new(questions: Vec<Question>) -> Result<Self, BankError> {
        if questions.is_empty() {
            return Err(BankError::Empty);
        }
        for (index, question) in questions.iter().enumerate() {
            if question.options.len() < 2 {
                return Err(BankError::TooFewOptions { index });
            }
            if !question.options.contains(&question.correct) {
                return Err(BankError::CorrectNotAnOption { index });
            }
        }
        Ok(Self { questions })
    }

    /// Loads and validates the bank from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns a [`BankError`] when the file is unreadable, malformed, or
    /// fails validation.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, BankError> {
        debug!("Loading question bank");
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| BankError::Io {
            message: e.to_string(),
        })?;
        let file: BankFile = serde_json::from_str(&content).map_err(|e| BankError::Parse {
            message: e.to_string(),
        })?;
        let bank = Self::new(file.question_bank)?;
        info!(questions = bank.question_count(), "Question bank loaded");
        Ok(bank)
    }

    /// Number of questions in the bank.
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// Draws one question uniformly at random.
    pub fn draw(&self) -> &Question {
        let index = rand::thread_rng().gen_range(0..self.questions.len());
        &self.questions[index]
    }
}
