use serde::{Deserialize, Serialize};

/// Speaker of a chat message.
///
/// Only these three tags are accepted; anything else fails to deserialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single role-tagged chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Language mode for question text and prompt templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    /// Traditional Chinese, the primary mode
    #[default]
    Chinese,
    English,
}

impl Language {
    /// Parses a request tag. Only `en` selects English; every other value
    /// falls back to the primary language.
    pub fn from_tag(tag: &str) -> Self {
        if tag.trim().eq_ignore_ascii_case("en") {
            Language::English
        } else {
            Language::Chinese
        }
    }

    /// Canonical tag used in links and hidden form fields
    pub fn tag(&self) -> &'static str {
        match self {
            Language::Chinese => "zh",
            Language::English => "en",
        }
    }
}

/// Request body for an OpenAI-compatible chat-completion endpoint
#[derive(Serialize, Debug)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [Message],
    pub temperature: f32,
}

/// Response from the chat-completion endpoint
#[derive(Deserialize, Debug)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Deserialize, Debug)]
pub struct Choice {
    pub message: Option<ChoiceMessage>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Message part of a choice; only the text is used
#[derive(Deserialize, Debug)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

/// Error envelope returned by OpenRouter and OpenAI on failure
#[derive(Deserialize, Debug)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Deserialize, Debug)]
pub struct ApiErrorBody {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_from_tag() {
        assert_eq!(Language::from_tag("en"), Language::English);
        assert_eq!(Language::from_tag(" EN "), Language::English);
        assert_eq!(Language::from_tag("zh"), Language::Chinese);
        assert_eq!(Language::from_tag(""), Language::Chinese);
        assert_eq!(Language::from_tag("fr"), Language::Chinese);
        assert_eq!(Language::from_tag(Language::English.tag()), Language::English);
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&Message::assistant("hi")).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"hi"}"#);
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let result: Result<Message, _> =
            serde_json::from_str(r#"{"role":"tool","content":"x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_response_extra_fields_ignored() {
        let error: ApiErrorResponse =
            serde_json::from_str(r#"{"error":{"message":"No auth credentials found","code":401}}"#)
                .unwrap();
        assert_eq!(error.error.message, "No auth credentials found");

        let response: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"ok"},"index":0}]}"#,
        )
        .unwrap();
        let content = response.choices[0].message.as_ref().and_then(|m| m.content.as_deref());
        assert_eq!(content, Some("ok"));
    }

    #[test]
    fn test_request_body_shape() {
        let messages = vec![Message::system("s"), Message::user("u")];
        let request = ChatCompletionRequest {
            model: "m",
            messages: &messages,
            temperature: 0.5,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "m");
        assert_eq!(value["temperature"], 0.5);
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "u");
    }
}
