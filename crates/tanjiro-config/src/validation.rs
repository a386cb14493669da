// SPDX-FileCopyrightText: 2026 Tanjiro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as bind hosts, URL schemes, and numeric ranges.

use crate::diagnostic::ConfigError;
use crate::model::TanjiroConfig;

/// Log levels accepted by `agent.log_level`.
const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Reddit's listing endpoints cap `limit` at 100.
const MAX_MEME_RESULTS: usize = 100;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &TanjiroConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    if config.agent.name.trim().is_empty() {
        fail("agent.name must not be empty".to_string());
    }

    if !LOG_LEVELS.contains(&config.agent.log_level.as_str()) {
        fail(format!(
            "agent.log_level `{}` must be one of: {}",
            config.agent.log_level,
            LOG_LEVELS.join(", ")
        ));
    }

    if config.agent.max_sessions == 0 {
        fail("agent.max_sessions must be at least 1".to_string());
    }

    if config.agent.session_idle_secs == 0 {
        fail("agent.session_idle_secs must be at least 1".to_string());
    }

    let host = config.gateway.host.trim();
    if host.is_empty() {
        fail("gateway.host must not be empty".to_string());
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-');
        if !is_valid_ip && !is_valid_hostname {
            fail(format!(
                "gateway.host `{host}` is not a valid IP address or hostname"
            ));
        }
    }

    if !is_http_url(&config.openai.base_url) {
        fail(format!(
            "openai.base_url `{}` must start with http:// or https://",
            config.openai.base_url
        ));
    }

    if !(0.0..=2.0).contains(&config.openai.temperature) {
        fail(format!(
            "openai.temperature must be between 0.0 and 2.0, got {}",
            config.openai.temperature
        ));
    }

    if config.openai.max_tokens == 0 {
        fail("openai.max_tokens must be at least 1".to_string());
    }

    if config.openai.timeout_secs == 0 {
        fail("openai.timeout_secs must be at least 1".to_string());
    }

    if !is_http_url(&config.memes.base_url) {
        fail(format!(
            "memes.base_url `{}` must start with http:// or https://",
            config.memes.base_url
        ));
    }

    if config.memes.max_results == 0 || config.memes.max_results > MAX_MEME_RESULTS {
        fail(format!(
            "memes.max_results must be between 1 and {MAX_MEME_RESULTS}, got {}",
            config.memes.max_results
        ));
    }

    if config.memes.user_agent.trim().is_empty() {
        fail("memes.user_agent must not be empty".to_string());
    }

    if config.memes.timeout_secs == 0 {
        fail("memes.timeout_secs must be at least 1".to_string());
    }

    // One full exchange (user + assistant) must fit in the window.
    if config.memory.max_turns < 2 {
        fail(format!(
            "memory.max_turns must be at least 2, got {}",
            config.memory.max_turns
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
