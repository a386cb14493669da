// SPDX-FileCopyrightText: 2026 Tanjiro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Tanjiro chatbot.
//!
//! This crate provides the trait definitions, error type, and common types
//! shared by the LLM provider, the meme sources, the turn router and the
//! gateway. Every external collaborator implements a trait defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::TanjiroError;
pub use types::{
    AdapterType, HealthStatus, MemeImage, MemeQuery, ProviderMessage, ProviderRequest,
    ProviderResponse, SessionId, Speaker, TokenUsage, Turn,
};

pub use traits::{MemeSource, PluginAdapter, ProviderAdapter};
