// SPDX-FileCopyrightText: 2026 Tanjiro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock LLM provider adapter for deterministic testing.
//!
//! `MockProvider` implements `ProviderAdapter` with pre-configured replies and
//! failures, and records every request it receives.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use tanjiro_core::TanjiroError;
use tanjiro_core::traits::adapter::PluginAdapter;
use tanjiro_core::traits::provider::ProviderAdapter;
use tanjiro_core::types::{
    AdapterType, HealthStatus, ProviderRequest, ProviderResponse, TokenUsage,
};

/// Text returned once the queue is empty.
pub const DEFAULT_MOCK_REPLY: &str = "mock response";

#[derive(Debug, Clone)]
enum Scripted {
    Reply(String),
    Fail(String),
}

/// A mock LLM provider that returns pre-configured outcomes.
///
/// Outcomes are popped from a FIFO queue. When the queue is empty the
/// provider either replies with [`DEFAULT_MOCK_REPLY`] or, if built with
/// [`MockProvider::failing`], fails every call.
#[derive(Default)]
pub struct MockProvider {
    script: Arc<Mutex<VecDeque<Scripted>>>,
    requests: Arc<Mutex<Vec<ProviderRequest>>>,
    always_fail: bool,
}

impl MockProvider {
    /// Create a new mock provider with an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock provider pre-loaded with the given replies.
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            script: Arc::new(Mutex::new(
                responses.into_iter().map(Scripted::Reply).collect(),
            )),
            ..Self::default()
        }
    }

    /// Create a mock provider whose every call fails.
    pub fn failing() -> Self {
        Self {
            always_fail: true,
            ..Self::default()
        }
    }

    /// Queue a successful reply.
    pub async fn add_response(&self, text: impl Into<String>) {
        self.script
            .lock()
            .await
            .push_back(Scripted::Reply(text.into()));
    }

    /// Queue a failure.
    pub async fn add_failure(&self, message: impl Into<String>) {
        self.script
            .lock()
            .await
            .push_back(Scripted::Fail(message.into()));
    }

    /// All requests received so far, oldest first.
    pub async fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().await.clone()
    }

    /// Number of `complete` calls made.
    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }

    async fn next_outcome(&self) -> Scripted {
        match self.script.lock().await.pop_front() {
            Some(outcome) => outcome,
            None if self.always_fail => Scripted::Fail("mock provider unavailable".to_string()),
            None => Scripted::Reply(DEFAULT_MOCK_REPLY.to_string()),
        }
    }
}

#[async_trait]
impl PluginAdapter for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, TanjiroError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl ProviderAdapter for MockProvider {
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, TanjiroError> {
        self.requests.lock().await.push(request);

        match self.next_outcome().await {
            Scripted::Reply(content) => Ok(ProviderResponse {
                id: format!("mock-resp-{}", uuid::Uuid::new_v4()),
                content,
                model: "mock-model".to_string(),
                finish_reason: Some("stop".to_string()),
                usage: TokenUsage {
                    prompt_tokens: 10,
                    completion_tokens: 20,
                },
            }),
            Scripted::Fail(message) => Err(TanjiroError::provider(message)),
        }
    }
}
