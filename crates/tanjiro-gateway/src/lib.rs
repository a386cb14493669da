// SPDX-FileCopyrightText: 2026 Tanjiro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the Tanjiro chatbot.
//!
//! Serves the chat page and a small JSON API. Every request that touches a
//! session locks that session's state and hands it to the shared
//! [`TurnRouter`](tanjiro_agent::TurnRouter).

pub mod handlers;
pub mod page;
pub mod server;
pub mod sessions;

pub use server::{GatewayState, app, start_server};
pub use sessions::{SessionHandle, SessionStore};
