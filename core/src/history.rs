//! Conversation state carried between requests in a hidden form field.
//!
//! The client owns the transcript. The server decodes whatever it is sent,
//! appends to it, and hands back a freshly encoded string.

use crate::types::Message;
use tracing::warn;

/// Value of the hidden field for a conversation that has not started
pub const EMPTY_HISTORY: &str = "[]";

/// Serializes a conversation to the JSON array carried in the form
pub fn encode(history: &[Message]) -> String {
    // Serializing plain strings and unit enum variants cannot fail
    serde_json::to_string(history).unwrap_or_else(|_| EMPTY_HISTORY.to_string())
}

/// Parses a submitted conversation.
///
/// Never fails: a blank field, malformed JSON, or a message with an unknown
/// role all yield an empty conversation.
pub fn decode(encoded: &str) -> Vec<Message> {
    let encoded = encoded.trim();
    if encoded.is_empty() {
        return Vec::new();
    }

    match serde_json::from_str::<Vec<Message>>(encoded) {
        Ok(history) => history,
        Err(e) => {
            warn!(error = %e, len = encoded.len(), "Discarding malformed conversation history");
            Vec::new()
        }
    }
}
