use crate::errors::{TutorError, TutorResult};
use crate::types::Language;
use rand::Rng;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::info;

/// One arithmetic problem from the bank
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    pub text: String,
    pub text_en: Option<String>,
    pub answer: String,
    pub equation: String,
}

impl Question {
    /// Question text for the given language. English falls back to the
    /// primary text when no translation exists.
    pub fn text_for(&self, language: Language) -> &str {
        match language {
            Language::Chinese => &self.text,
            Language::English => self.text_en.as_deref().unwrap_or(&self.text),
        }
    }
}

/// Record layout of the ape210k export
#[derive(Deserialize)]
struct QuestionRecord {
    original_text: String,
    #[serde(default)]
    original_text_en: Option<String>,
    #[serde(deserialize_with = "answer_as_string")]
    ans: String,
    #[serde(default)]
    equation: String,
}

impl From<QuestionRecord> for Question {
    fn from(record: QuestionRecord) -> Self {
        Self {
            text: record.original_text,
            text_en: record.original_text_en.filter(|t| !t.trim().is_empty()),
            answer: record.ans,
            equation: record.equation,
        }
    }
}

/// Answers are usually strings but some exports store plain numbers
fn answer_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number for answer, got {}",
            other
        ))),
    }
}

/// Read-only collection of questions, loaded once at startup
#[derive(Debug, Clone)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Builds a bank from questions already in memory. An empty bank is rejected.
    pub fn from_questions(questions: Vec<Question>) -> TutorResult<Self> {
        if questions.is_empty() {
            return Err(TutorError::QuestionBankError(
                "Question bank contains no questions".to_string(),
            ));
        }
        Ok(Self { questions })
    }

    /// Loads the bank from a JSON array file
    pub fn load(path: &Path) -> TutorResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            TutorError::QuestionBankError(format!(
                "Failed to read question bank {}: {}",
                path.display(),
                e
            ))
        })?;

        let bank = Self::from_json(&content)?;
        info!(
            count = bank.len(),
            path = %path.display(),
            "Loaded question bank"
        );
        Ok(bank)
    }

    pub fn from_json(content: &str) -> TutorResult<Self> {
        let records: Vec<QuestionRecord> = serde_json::from_str(content).map_err(|e| {
            TutorError::QuestionBankError(format!("Failed to parse question bank: {}", e))
        })?;

        Self::from_questions(records.into_iter().map(Question::from).collect())
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Picks a question uniformly at random, with replacement
    pub fn pick(&self) -> &Question {
        self.pick_with(&mut rand::thread_rng())
    }

    pub fn pick_with<R: Rng + ?Sized>(&self, rng: &mut R) -> &Question {
        // Non-empty by construction
        &self.questions[rng.gen_range(0..self.questions.len())]
    }
}
