// SPDX-FileCopyrightText: 2026 Tanjiro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Tanjiro.
//!
//! Provides mock adapters for fast, deterministic, CI-runnable tests without
//! external services.
//!
//! # Components
//!
//! - [`MockProvider`] - Mock LLM provider with scripted replies and failures
//! - [`MockMemeSource`] - Mock meme search with keyword-mapped results

pub mod mock_memes;
pub mod mock_provider;

pub use mock_memes::{MockMemeSource, sample_images};
pub use mock_provider::{DEFAULT_MOCK_REPLY, MockProvider};
