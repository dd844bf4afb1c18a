// Core tutoring functionality:
// - Question bank loading and selection
// - Conversation history codec
// - Prompt templates per language
// - Chat-completion gateway client
// - Configuration loading
// - Shared error types

// Export types module - Messages, roles, languages and wire structures
pub mod types;
pub use types::*;

// Export errors module - Shared error types
pub mod errors;
pub use errors::*;

// Export config module - Configuration loading
pub mod config;
pub use config::*;

// Export client module - Chat-completion gateway
pub mod client;
pub use client::{ChatCompleter, OpenRouterClient};

// Question bank loader and selector
pub mod questions;
pub use questions::{Question, QuestionBank};

// Conversation state carried in the hidden form field
pub mod history;

// Grading and follow-up prompt templates
pub mod prompts;
pub use prompts::GradingPrompt;
