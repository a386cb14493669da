// SPDX-FileCopyrightText: 2026 Tanjiro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the adapters, the agent and the gateway.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Unique identifier for a browser or shell session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    /// Generates a fresh random session identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of external collaborator behind an adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Provider,
    MemeSource,
}

/// Which side of the conversation produced a turn.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Speaker {
    User,
    Assistant,
}

/// One side of a conversation exchange.
///
/// `seq` is the logical insertion order assigned by the conversation memory.
/// Turns are never edited after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub seq: u64,
    pub speaker: Speaker,
    pub text: String,
    pub at: DateTime<Utc>,
}

// --- Provider types ---

/// A single message in a provider request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderMessage {
    pub role: Speaker,
    pub content: String,
}

impl From<&Turn> for ProviderMessage {
    fn from(turn: &Turn) -> Self {
        Self {
            role: turn.speaker,
            content: turn.text.clone(),
        }
    }
}

/// A request to an LLM provider.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderRequest {
    /// Persona instructions sent as the system message.
    pub system_prompt: String,
    /// Ordered conversation window; the last entry is the current user message.
    pub messages: Vec<ProviderMessage>,
    /// Overrides the provider's configured response length.
    pub max_tokens: Option<u32>,
    /// Overrides the provider's configured sampling temperature.
    pub temperature: Option<f32>,
    /// Ask the model for a single JSON object instead of free text.
    pub json_output: bool,
}

/// Token accounting reported by the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

/// A response from an LLM provider.
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    pub id: String,
    pub content: String,
    pub model: String,
    pub finish_reason: Option<String>,
    pub usage: TokenUsage,
}

// --- Meme types ---

/// A meme image returned by a meme source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemeImage {
    pub title: String,
    /// Direct image URL; this is what the presentation layer renders.
    pub url: String,
    /// Where the meme came from (subreddit, "Demon Slayer anime", ...).
    pub source: String,
}

/// A keyword search against a meme source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemeQuery {
    pub keyword: String,
    pub limit: usize,
}
