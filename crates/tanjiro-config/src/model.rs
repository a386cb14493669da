// SPDX-FileCopyrightText: 2026 Tanjiro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Tanjiro chatbot.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Tanjiro configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TanjiroConfig {
    /// Persona identity and session settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Hosted LLM (OpenAI-compatible) settings.
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Meme search settings.
    #[serde(default)]
    pub memes: MemesConfig,

    /// Short-term conversation memory settings.
    #[serde(default)]
    pub memory: MemoryConfig,

    /// Web gateway settings.
    #[serde(default)]
    pub gateway: GatewayConfig,
}

/// Persona identity and session configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the persona.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Maximum number of live sessions the gateway keeps.
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,

    /// Seconds without a request after which a gateway session is discarded.
    #[serde(default = "default_session_idle_secs")]
    pub session_idle_secs: u64,

    /// Inline persona prompt. Overridden by `system_prompt_file` if both set.
    #[serde(default)]
    pub system_prompt: Option<String>,

    /// Path to a text file containing the persona prompt.
    /// Takes precedence over `system_prompt` if both are set.
    #[serde(default)]
    pub system_prompt_file: Option<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
            max_sessions: default_max_sessions(),
            session_idle_secs: default_session_idle_secs(),
            system_prompt: None,
            system_prompt_file: None,
        }
    }
}

fn default_agent_name() -> String {
    "Tanjiro".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_sessions() -> usize {
    64
}

fn default_session_idle_secs() -> u64 {
    1800
}

/// OpenAI-compatible chat completions configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OpenAiConfig {
    /// API key. `None` falls back to the `OPENAI_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of the API, without the `/chat/completions` suffix.
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,

    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature (0.0-2.0).
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate per reply.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// HTTP request timeout in seconds.
    #[serde(default = "default_openai_timeout")]
    pub timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_openai_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_openai_timeout(),
        }
    }
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    500
}

fn default_openai_timeout() -> u64 {
    60
}

/// Which meme backend answers `meme <keyword>` commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MemeProviderKind {
    /// Reddit search API.
    #[default]
    Reddit,
    /// Built-in offline catalog.
    Catalog,
}

/// Meme search configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MemesConfig {
    /// Backend selection.
    #[serde(default)]
    pub provider: MemeProviderKind,

    /// Base URL of the Reddit API.
    #[serde(default = "default_memes_base_url")]
    pub base_url: String,

    /// User-Agent sent to Reddit (anonymous requests without one are throttled).
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Number of images kept per search.
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Keep posts flagged as NSFW.
    #[serde(default)]
    pub allow_nsfw: bool,

    /// HTTP request timeout in seconds.
    #[serde(default = "default_memes_timeout")]
    pub timeout_secs: u64,
}

impl Default for MemesConfig {
    fn default() -> Self {
        Self {
            provider: MemeProviderKind::default(),
            base_url: default_memes_base_url(),
            user_agent: default_user_agent(),
            max_results: default_max_results(),
            allow_nsfw: false,
            timeout_secs: default_memes_timeout(),
        }
    }
}

fn default_memes_base_url() -> String {
    "https://www.reddit.com".to_string()
}

fn default_user_agent() -> String {
    concat!("tanjiro-chat/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_max_results() -> usize {
    5
}

fn default_memes_timeout() -> u64 {
    10
}

/// Short-term conversation memory configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MemoryConfig {
    /// Maximum number of turns (user and assistant sides counted separately)
    /// kept in the rolling prompt window.
    #[serde(default = "default_max_turns")]
    pub max_turns: usize,

    /// Ask the language model to analyze the user's interests. When off, or
    /// when the model call fails, topics are counted from keywords.
    #[serde(default = "default_model_analysis")]
    pub model_analysis: bool,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            max_turns: default_max_turns(),
            model_analysis: default_model_analysis(),
        }
    }
}

fn default_max_turns() -> usize {
    20
}

fn default_model_analysis() -> bool {
    true
}

/// Web gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    7866
}
