//! Fake completers for handler and coordinator tests

use async_trait::async_trait;
use std::sync::Mutex;
use tutor_core::{ChatCompleter, Message, TutorError, TutorResult, DEFAULT_MODEL};

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub messages: Vec<Message>,
    pub model: Option<String>,
}

/// Returns a canned reply and remembers every request
pub struct RecordingCompleter {
    reply: String,
    calls: Mutex<Vec<RecordedCall>>,
}

impl RecordingCompleter {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatCompleter for RecordingCompleter {
    async fn complete(&self, messages: &[Message], model: Option<&str>) -> TutorResult<String> {
        self.calls.lock().unwrap().push(RecordedCall {
            messages: messages.to_vec(),
            model: model.map(str::to_string),
        });
        Ok(self.reply.clone())
    }

    fn default_model(&self) -> &str {
        DEFAULT_MODEL
    }
}

/// Always fails the way an upstream outage does
pub struct FailingCompleter;

#[async_trait]
impl ChatCompleter for FailingCompleter {
    async fn complete(&self, _messages: &[Message], _model: Option<&str>) -> TutorResult<String> {
        Err(TutorError::HttpError {
            status_code: 500,
            message: "API request failed: upstream unavailable".to_string(),
        })
    }

    fn default_model(&self) -> &str {
        DEFAULT_MODEL
    }
}
