// SPDX-FileCopyrightText: 2026 Tanjiro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation engine for the Tanjiro persona.
//!
//! The [`TurnRouter`] is the central coordinator. For each user message it:
//! - Classifies the text into a [`MessageKind`]
//! - Calls the language model or meme source when the kind needs one
//! - Asks the model what the user is interested in, with a keyword fallback
//! - Updates the per-session [`SessionState`]
//! - Returns a [`TurnReply`] for the gateway or shell to render

pub mod analysis;
pub mod classifier;
pub mod interests;
pub mod memes;
pub mod memory;
pub mod persona;
pub mod router;
pub mod session;

pub use analysis::InterestAnalyzer;
pub use classifier::{Direction, MessageKind, classify};
pub use interests::{InterestInsert, InterestSet, TopicAnalysis};
pub use memes::MemeCursor;
pub use memory::ConversationMemory;
pub use persona::{DEFAULT_PERSONA_PROMPT, build_system_prompt, load_persona_prompt};
pub use router::{
    CHAT_FALLBACK, MEME_FALLBACK, NO_MEMES_LOADED, ReplyKind, RouterSettings, TurnReply,
    TurnRouter,
};
pub use session::SessionState;
