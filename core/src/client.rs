use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Client;
use tracing::{debug, warn};

use crate::config::GatewayConfig;
use crate::errors::{TutorError, TutorResult};
use crate::types::*;

/// Anything that can turn a message sequence into a reply
#[async_trait]
pub trait ChatCompleter: Send + Sync {
    /// Sends the messages and returns the text of the first choice.
    /// `None` or a blank model selects the configured default.
    async fn complete(&self, messages: &[Message], model: Option<&str>) -> TutorResult<String>;

    /// Model used when the caller does not choose one
    fn default_model(&self) -> &str;
}

/// Client for an OpenAI-compatible chat-completion endpoint (OpenRouter by default)
#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    client: Client,
    config: GatewayConfig,
}

impl OpenRouterClient {
    /// Create a new client. A missing API key is not an error here; the
    /// endpoint will reject the request instead.
    pub fn new(config: GatewayConfig) -> TutorResult<Self> {
        let mut headers = HeaderMap::new();
        match config.api_key.as_deref().filter(|key| !key.is_empty()) {
            Some(api_key) => {
                let mut value = HeaderValue::from_str(&format!("Bearer {}", api_key))
                    .map_err(|e| TutorError::ConfigError(format!("Invalid API key format: {}", e)))?;
                value.set_sensitive(true);
                headers.insert(AUTHORIZATION, value);
            }
            None => warn!("No API key configured; chat-completion requests will be unauthenticated"),
        }

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| TutorError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn resolve_model<'a>(&'a self, model: Option<&'a str>) -> &'a str {
        model
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(self.config.default_model.as_str())
    }

    /// Helper method to extract the reply text from a response
    pub fn extract_text_from_response(response: ChatCompletionResponse) -> TutorResult<String> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| TutorError::ResponseError("No choices in response".to_string()))?;

        if let Some(reason) = choice.finish_reason.as_deref() {
            if reason != "stop" {
                warn!("Chat completion finish reason: {}", reason);
            }
        }

        choice
            .message
            .and_then(|message| message.content)
            .ok_or_else(|| TutorError::ResponseError("No message content in first choice".to_string()))
    }
}

#[async_trait]
impl ChatCompleter for OpenRouterClient {
    async fn complete(&self, messages: &[Message], model: Option<&str>) -> TutorResult<String> {
        let model = self.resolve_model(model);
        debug!(model, messages = messages.len(), "Sending chat completion request");

        let request = ChatCompletionRequest {
            model,
            messages,
            temperature: self.config.temperature,
        };

        let response = self
            .client
            .post(&self.config.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| TutorError::RequestError(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.map_err(|e| {
                TutorError::ResponseError(format!("Failed to read error response: {}", e))
            })?;

            let message = match serde_json::from_str::<ApiErrorResponse>(&error_body) {
                Ok(parsed) => format!("API request failed: {}", parsed.error.message),
                Err(_) => format!("API request failed: {}", error_body),
            };

            return Err(TutorError::HttpError {
                status_code: status.as_u16(),
                message,
            });
        }

        let response_body = response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|e| TutorError::ResponseError(format!("Failed to parse response: {}", e)))?;

        Self::extract_text_from_response(response_body)
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(json: &str) -> ChatCompletionResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_extract_first_choice() {
        let body = response(
            r#"{"id":"gen-1","choices":[
                {"message":{"role":"assistant","content":"Great job!"},"finish_reason":"stop"},
                {"message":{"role":"assistant","content":"ignored"}}
            ]}"#,
        );
        assert_eq!(
            OpenRouterClient::extract_text_from_response(body).unwrap(),
            "Great job!"
        );
    }

    #[test]
    fn test_extract_missing_fields() {
        for json in [
            r#"{}"#,
            r#"{"choices":[]}"#,
            r#"{"choices":[{}]}"#,
            r#"{"choices":[{"message":{"role":"assistant"}}]}"#,
        ] {
            let result = OpenRouterClient::extract_text_from_response(response(json));
            assert!(
                matches!(result, Err(TutorError::ResponseError(_))),
                "{} should be a response error",
                json
            );
        }
    }

    #[test]
    fn test_resolve_model() {
        let client = OpenRouterClient::new(GatewayConfig::default()).unwrap();
        assert_eq!(client.resolve_model(None), crate::config::DEFAULT_MODEL);
        assert_eq!(client.resolve_model(Some("  ")), crate::config::DEFAULT_MODEL);
        assert_eq!(client.resolve_model(Some("openai/gpt-4o-mini")), "openai/gpt-4o-mini");
        assert_eq!(client.default_model(), crate::config::DEFAULT_MODEL);
    }

    #[test]
    fn test_invalid_api_key_is_config_error() {
        let config = GatewayConfig {
            api_key: Some("bad\nkey".to_string()),
            ..GatewayConfig::default()
        };
        assert!(matches!(
            OpenRouterClient::new(config),
            Err(TutorError::ConfigError(_))
        ));
    }
}
