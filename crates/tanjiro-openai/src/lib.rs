// SPDX-FileCopyrightText: 2026 Tanjiro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI-compatible chat completion provider for Tanjiro.
//!
//! This crate implements [`ProviderAdapter`] on top of the Chat Completions
//! API. Any server speaking the same wire format (a local proxy, a
//! self-hosted gateway) works by changing `openai.base_url`.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use tanjiro_config::model::OpenAiConfig;
use tanjiro_core::error::TanjiroError;
use tanjiro_core::traits::{PluginAdapter, ProviderAdapter};
use tanjiro_core::types::{
    AdapterType, HealthStatus, ProviderRequest, ProviderResponse, Speaker, TokenUsage,
};
use tracing::{debug, info};

use crate::client::OpenAiClient;
use crate::types::{ChatCompletionRequest, ChatMessage, ResponseFormat};

/// Environment variable consulted when `openai.api_key` is unset.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Chat Completions provider implementing [`ProviderAdapter`].
///
/// API key resolution order: config -> `OPENAI_API_KEY` env var -> error.
pub struct OpenAiProvider {
    client: OpenAiClient,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiProvider {
    /// Creates a provider from the `[openai]` configuration section.
    pub fn new(config: &OpenAiConfig) -> Result<Self, TanjiroError> {
        let api_key = resolve_api_key(&config.api_key)?;
        let client = OpenAiClient::new(
            &api_key,
            &config.base_url,
            config.model.clone(),
            Duration::from_secs(config.timeout_secs),
        )?;

        info!(
            model = %config.model,
            endpoint = client.endpoint(),
            "OpenAI provider initialized"
        );

        Ok(Self {
            client,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    /// Converts a [`ProviderRequest`] into the wire request.
    ///
    /// The persona prompt goes first as the `system` message.
    fn to_completion_request(&self, request: &ProviderRequest) -> ChatCompletionRequest {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        if !request.system_prompt.is_empty() {
            messages.push(ChatMessage::new("system", request.system_prompt.as_str()));
        }
        messages.extend(
            request
                .messages
                .iter()
                .map(|m| ChatMessage::new(role_name(m.role), m.content.as_str())),
        );

        ChatCompletionRequest {
            model: self.client.model().to_string(),
            messages,
            temperature: request.temperature.unwrap_or(self.temperature),
            max_tokens: request.max_tokens.unwrap_or(self.max_tokens),
            response_format: request.json_output.then(ResponseFormat::json_object),
        }
    }
}

fn role_name(speaker: Speaker) -> &'static str {
    match speaker {
        Speaker::User => "user",
        Speaker::Assistant => "assistant",
    }
}

#[async_trait]
impl PluginAdapter for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, TanjiroError> {
        // A health check does not send a request, so it spends no tokens.
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiProvider {
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, TanjiroError> {
        let api_request = self.to_completion_request(&request);
        debug!(
            messages = api_request.messages.len(),
            max_tokens = api_request.max_tokens,
            "sending completion request"
        );
        let response = self.client.complete(&api_request).await?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| TanjiroError::provider("completion returned no choices"))?;

        let content = choice.message.content.unwrap_or_default().trim().to_string();
        if content.is_empty() {
            return Err(TanjiroError::provider("completion returned empty content"));
        }

        let usage = response.usage.unwrap_or_default();
        Ok(ProviderResponse {
            id: response.id,
            content,
            model: response.model,
            finish_reason: choice.finish_reason,
            usage: TokenUsage {
                prompt_tokens: usage.prompt_tokens,
                completion_tokens: usage.completion_tokens,
            },
        })
    }
}

/// Resolves the API key from config or the [`API_KEY_ENV`] environment variable.
fn resolve_api_key(config_key: &Option<String>) -> Result<String, TanjiroError> {
    if let Some(key) = config_key
        && !key.trim().is_empty()
    {
        return Ok(key.clone());
    }

    match std::env::var(API_KEY_ENV) {
        Ok(key) if !key.trim().is_empty() => Ok(key),
        _ => Err(TanjiroError::Config(format!(
            "OpenAI API key not found. Set openai.api_key in config or the {API_KEY_ENV} environment variable."
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tanjiro_core::types::ProviderMessage;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(base_url: &str) -> OpenAiConfig {
        OpenAiConfig {
            api_key: Some("sk-test".into()),
            base_url: base_url.to_string(),
            ..OpenAiConfig::default()
        }
    }

    fn test_request() -> ProviderRequest {
        ProviderRequest {
            system_prompt: "You are Kamado Tanjiro.".into(),
            messages: vec![
                ProviderMessage {
                    role: Speaker::User,
                    content: "Hi".into(),
                },
                ProviderMessage {
                    role: Speaker::Assistant,
                    content: "Hello, friend!".into(),
                },
                ProviderMessage {
                    role: Speaker::User,
                    content: "How is Nezuko?".into(),
                },
            ],
            ..ProviderRequest::default()
        }
    }

    #[test]
    fn config_key_wins_over_env() {
        let key = resolve_api_key(&Some("sk-from-config".into())).unwrap();
        assert_eq!(key, "sk-from-config");
    }

    #[test]
    fn provider_reports_identity() {
        let provider = OpenAiProvider::new(&test_config("http://localhost:1")).unwrap();
        assert_eq!(provider.name(), "openai");
        assert_eq!(provider.adapter_type(), AdapterType::Provider);
    }

    #[test]
    fn request_puts_system_prompt_first() {
        let provider = OpenAiProvider::new(&test_config("http://localhost:1")).unwrap();
        let req = provider.to_completion_request(&test_request());

        assert_eq!(req.messages.len(), 4);
        assert_eq!(req.messages[0].role, "system");
        assert_eq!(req.messages[1].role, "user");
        assert_eq!(req.messages[2].role, "assistant");
        assert_eq!(req.messages[3].content.as_deref(), Some("How is Nezuko?"));
        assert_eq!(req.max_tokens, 500);
        assert_eq!(req.model, "gpt-3.5-turbo");
    }

    #[test]
    fn request_max_tokens_override() {
        let provider = OpenAiProvider::new(&test_config("http://localhost:1")).unwrap();
        let mut request = test_request();
        request.max_tokens = Some(64);
        assert_eq!(provider.to_completion_request(&request).max_tokens, 64);
    }

    #[test]
    fn json_output_sets_response_format_and_temperature() {
        let provider = OpenAiProvider::new(&test_config("http://localhost:1")).unwrap();
        let plain = provider.to_completion_request(&test_request());
        assert!(plain.response_format.is_none());
        assert_eq!(plain.temperature, 0.7);

        let mut request = test_request();
        request.json_output = true;
        request.temperature = Some(0.2);
        let req = provider.to_completion_request(&request);
        assert_eq!(req.response_format, Some(ResponseFormat::json_object()));
        assert_eq!(req.temperature, 0.2);
    }

    #[tokio::test]
    async fn complete_maps_first_choice() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(serde_json::json!({
                "messages": [{"role": "system", "content": "You are Kamado Tanjiro."}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "chatcmpl-42",
                "model": "gpt-3.5-turbo-0125",
                "choices": [{
                    "index": 0,
                    "message": {"role": "assistant", "content": "  She is safe in her box.  "},
                    "finish_reason": "stop"
                }],
                "usage": {"prompt_tokens": 30, "completion_tokens": 8, "total_tokens": 38}
            })))
            .mount(&server)
            .await;

        let provider = OpenAiProvider::new(&test_config(&server.uri())).unwrap();
        let response = provider.complete(test_request()).await.unwrap();

        assert_eq!(response.id, "chatcmpl-42");
        assert_eq!(response.content, "She is safe in her box.");
        assert_eq!(response.model, "gpt-3.5-turbo-0125");
        assert_eq!(response.finish_reason.as_deref(), Some("stop"));
        assert_eq!(response.usage.prompt_tokens, 30);
        assert_eq!(response.usage.completion_tokens, 8);
    }

    #[tokio::test]
    async fn empty_choices_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "chatcmpl-0",
                "model": "gpt-3.5-turbo",
                "choices": []
            })))
            .mount(&server)
            .await;

        let provider = OpenAiProvider::new(&test_config(&server.uri())).unwrap();
        let err = provider.complete(test_request()).await.unwrap_err();
        assert!(err.to_string().contains("no choices"), "got: {err}");
    }

    #[tokio::test]
    async fn blank_content_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "chatcmpl-0",
                "model": "gpt-3.5-turbo",
                "choices": [{"message": {"role": "assistant", "content": null}}]
            })))
            .mount(&server)
            .await;

        let provider = OpenAiProvider::new(&test_config(&server.uri())).unwrap();
        let err = provider.complete(test_request()).await.unwrap_err();
        assert!(err.to_string().contains("empty content"), "got: {err}");
    }
}
