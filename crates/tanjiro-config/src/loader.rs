// SPDX-FileCopyrightText: 2026 Tanjiro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./tanjiro.toml` > `~/.config/tanjiro/tanjiro.toml` > `/etc/tanjiro/tanjiro.toml`
//! with environment variable overrides via `TANJIRO_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::TanjiroConfig;

/// System-wide config file location.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/tanjiro/tanjiro.toml";

/// Local config file name, resolved against the working directory.
pub const LOCAL_CONFIG_FILE: &str = "tanjiro.toml";

/// Sections whose env var names are mapped to dotted keys.
const ENV_SECTIONS: &[&str] = &["agent", "openai", "memes", "memory", "gateway"];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/tanjiro/tanjiro.toml` (system-wide)
/// 3. `~/.config/tanjiro/tanjiro.toml` (user XDG config)
/// 4. `./tanjiro.toml` (local directory)
/// 5. `TANJIRO_*` environment variables
pub fn load_config() -> Result<TanjiroConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<TanjiroConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TanjiroConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<TanjiroConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TanjiroConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(TanjiroConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Path of the per-user config file, if the platform has a config dir.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tanjiro").join(LOCAL_CONFIG_FILE))
}

/// Create the environment variable provider.
///
/// Uses `Env::map()` rather than `Env::split("_")` so that keys containing
/// underscores survive: `TANJIRO_OPENAI_API_KEY` must become `openai.api_key`,
/// not `openai.api.key`.
fn env_provider() -> Env {
    Env::prefixed("TANJIRO_").map(|key| map_env_key(key.as_str()).into())
}

/// Maps a lowercased, prefix-stripped env var name to its dotted config key.
fn map_env_key(key: &str) -> String {
    for section in ENV_SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|r| r.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_map_to_sections() {
        assert_eq!(map_env_key("openai_api_key"), "openai.api_key");
        assert_eq!(map_env_key("memes_max_results"), "memes.max_results");
        assert_eq!(map_env_key("memory_max_turns"), "memory.max_turns");
        assert_eq!(map_env_key("gateway_port"), "gateway.port");
        assert_eq!(map_env_key("agent_log_level"), "agent.log_level");
    }

    #[test]
    fn unknown_env_section_is_left_alone() {
        assert_eq!(map_env_key("logging_level"), "logging_level");
    }

    #[test]
    fn env_override_applies_over_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("custom.toml", "[gateway]\nport = 9000\n")?;
            jail.set_env("TANJIRO_GATEWAY_PORT", "9100");
            jail.set_env("TANJIRO_OPENAI_API_KEY", "sk-from-env");

            let config = load_config_from_path(Path::new("custom.toml"))?;
            assert_eq!(config.gateway.port, 9100);
            assert_eq!(config.openai.api_key.as_deref(), Some("sk-from-env"));
            Ok(())
        });
    }
}
