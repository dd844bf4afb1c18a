use thiserror::Error;

/// Tutor errors
#[derive(Error, Debug)]
pub enum TutorError {
    #[error("Configuration Error: {0}")]
    ConfigError(String),

    #[error("Question Bank Error: {0}")]
    QuestionBankError(String),

    #[error("Request Error: {0}")]
    RequestError(String),

    #[error("Response Error: {0}")]
    ResponseError(String),

    #[error("HTTP Error: {status_code} - {message}")]
    HttpError { status_code: u16, message: String },
}

/// Result type for tutor operations
pub type TutorResult<T> = Result<T, TutorError>;
