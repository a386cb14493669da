// SPDX-FileCopyrightText: 2026 Tanjiro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `tanjiro serve` command implementation.
//!
//! Wires the OpenAI provider, the meme source and the turn router, then runs
//! the HTTP gateway until Ctrl-C.

use std::sync::Arc;
use std::time::Duration;

use tanjiro_agent::{RouterSettings, TurnRouter};
use tanjiro_config::TanjiroConfig;
use tanjiro_core::TanjiroError;
use tanjiro_gateway::{GatewayState, SessionStore};
use tanjiro_openai::OpenAiProvider;
use tracing::info;

/// Runs the `tanjiro serve` command.
pub async fn run_serve(config: TanjiroConfig) -> Result<(), TanjiroError> {
    init_tracing(&config.agent.log_level);

    info!(name = %config.agent.name, "starting tanjiro serve");

    let router = Arc::new(build_turn_router(&config).await?);
    let idle = Duration::from_secs(config.agent.session_idle_secs);
    let sessions = Arc::new(
        SessionStore::new(config.agent.max_sessions, config.memory.max_turns)
            .with_idle_timeout(idle),
    );
    let _sweeper = sessions.spawn_idle_sweeper(idle.min(Duration::from_secs(60)));
    info!(
        max_sessions = config.agent.max_sessions,
        max_turns = config.memory.max_turns,
        idle_secs = config.agent.session_idle_secs,
        "session store ready"
    );

    tanjiro_gateway::start_server(&config.gateway, GatewayState::new(router, sessions)).await
}

/// Builds the turn router shared by `serve` and `shell`.
pub async fn build_turn_router(config: &TanjiroConfig) -> Result<TurnRouter, TanjiroError> {
    let provider = Arc::new(OpenAiProvider::new(&config.openai).inspect_err(|_| {
        eprintln!(
            "error: OpenAI API key required. Set openai.api_key in tanjiro.toml or the {} env var",
            tanjiro_openai::API_KEY_ENV
        );
    })?);
    let memes = tanjiro_memes::build_meme_source(&config.memes)?;
    let persona = tanjiro_agent::load_persona_prompt(&config.agent).await;

    Ok(TurnRouter::new(
        provider,
        memes,
        persona,
        RouterSettings {
            persona_name: config.agent.name.clone(),
            meme_limit: config.memes.max_results,
            model_analysis: config.memory.model_analysis,
        },
    ))
}

/// Initializes the tracing subscriber with the given log level.
///
/// `RUST_LOG` takes precedence when set.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tanjiro={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}
