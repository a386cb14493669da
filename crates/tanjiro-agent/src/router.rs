// SPDX-FileCopyrightText: 2026 Tanjiro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The turn router: classifies a message, runs its handler against the
//! session state, and produces the reply shown to the user.
//!
//! External failures never escape the router. They are logged and turned
//! into fixed in-character replies.

use std::sync::Arc;

use serde::Serialize;
use strum::Display;
use tanjiro_core::traits::{MemeSource, ProviderAdapter};
use tanjiro_core::types::{MemeImage, MemeQuery, ProviderMessage, ProviderRequest, Speaker};
use tracing::{debug, warn};

use crate::analysis::InterestAnalyzer;
use crate::classifier::{self, Direction, MessageKind};
use crate::interests::{InterestInsert, TopicAnalysis};
use crate::persona;
use crate::session::SessionState;

/// Reply when the language model cannot be reached.
pub const CHAT_FALLBACK: &str = "I'm sorry... my senses are clouded right now and I can't find \
the right words. Please give me a moment and try again. I won't give up!";

/// Reply when the meme search fails.
pub const MEME_FALLBACK: &str = "I tried to find some memes, but the search isn't answering \
right now. Let's try again in a little while!";

/// Reply to navigation before any image has been loaded.
pub const NO_MEMES_LOADED: &str = "No memes loaded yet. Try \"meme nezuko\".";

/// Which handler produced a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ReplyKind {
    Chat,
    MemeSearch,
    Navigation,
    InterestUpdate,
    InterestReport,
    History,
    Reset,
}

/// What the presentation layer shows for one turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnReply {
    pub kind: ReplyKind,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<MemeImage>,
}

impl TurnReply {
    fn text(kind: ReplyKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            image: None,
        }
    }

    fn with_image(kind: ReplyKind, text: impl Into<String>, image: MemeImage) -> Self {
        Self {
            kind,
            text: text.into(),
            image: Some(image),
        }
    }
}

/// Tunables for the router that do not belong to a collaborator.
#[derive(Debug, Clone)]
pub struct RouterSettings {
    /// Name used for the assistant in rendered history.
    pub persona_name: String,
    /// Number of images requested per meme search.
    pub meme_limit: usize,
    /// Let the language model analyze interests for the persona context and
    /// the `interests` report. Off means keyword counting only.
    pub model_analysis: bool,
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self {
            persona_name: "Tanjiro".to_string(),
            meme_limit: 5,
            model_analysis: true,
        }
    }
}

/// Routes user turns to the language model, the meme source, or local state.
///
/// Holds only shared, immutable collaborators; all mutable state lives in
/// the [`SessionState`] passed to each call.
pub struct TurnRouter {
    provider: Arc<dyn ProviderAdapter>,
    memes: Arc<dyn MemeSource>,
    analyzer: InterestAnalyzer,
    persona: String,
    settings: RouterSettings,
}

impl TurnRouter {
    pub fn new(
        provider: Arc<dyn ProviderAdapter>,
        memes: Arc<dyn MemeSource>,
        persona: String,
        settings: RouterSettings,
    ) -> Self {
        Self {
            analyzer: InterestAnalyzer::new(provider.clone()),
            provider,
            memes,
            persona,
            settings,
        }
    }

    pub fn persona_name(&self) -> &str {
        &self.settings.persona_name
    }

    /// Handles one user message against the session.
    pub async fn handle(&self, state: &mut SessionState, input: &str) -> TurnReply {
        let kind = classifier::classify(input);
        let label: &'static str = (&kind).into();
        debug!(kind = label, "classified user message");

        match kind {
            MessageKind::PlainChat => self.chat(state, input.trim()).await,
            MessageKind::MemeSearch { keyword } => self.search_memes(state, &keyword).await,
            MessageKind::Navigation(direction) => self.navigate(state, direction),
            MessageKind::InterestUpdate { interest } => record_interest(state, &interest),
            MessageKind::InterestReport => self.interest_report(state).await,
            MessageKind::History => self.history(state),
            MessageKind::Reset => {
                state.reset();
                TurnReply::text(
                    ReplyKind::Reset,
                    "Our conversation has been cleared. Let's start fresh!",
                )
            }
        }
    }

    /// Moves the meme cursor one step and shows the image under it.
    ///
    /// At either end the cursor stays put and the reply carries a notice
    /// along with the current image.
    pub fn navigate(&self, state: &mut SessionState, direction: Direction) -> TurnReply {
        let moved = match direction {
            Direction::Next => state.memes.advance(),
            Direction::Previous => state.memes.retreat(),
        };

        let Some(image) = state.memes.current().cloned() else {
            return TurnReply::text(ReplyKind::Navigation, NO_MEMES_LOADED);
        };

        let text = if moved {
            caption(state, &image)
        } else {
            let keyword = state.memes.keyword().unwrap_or_default();
            match direction {
                Direction::Next => {
                    format!("That's the last meme for **{keyword}**. Try another search!")
                }
                Direction::Previous => format!("That's the first meme for **{keyword}**."),
            }
        };
        TurnReply::with_image(ReplyKind::Navigation, text, image)
    }

    async fn chat(&self, state: &mut SessionState, input: &str) -> TurnReply {
        // The opening message has nothing to analyze beyond itself.
        let has_history = !state.memory.is_empty();
        state.memory.append(Speaker::User, input);

        let analysis = self.analyze_topics(state, has_history).await;
        let request = ProviderRequest {
            system_prompt: persona::build_system_prompt(
                &self.persona,
                &analysis,
                &state.interests,
            ),
            messages: state.memory.window().map(ProviderMessage::from).collect(),
            ..ProviderRequest::default()
        };

        match self.provider.complete(request).await {
            Ok(response) => {
                debug!(
                    prompt_tokens = response.usage.prompt_tokens,
                    completion_tokens = response.usage.completion_tokens,
                    "provider replied"
                );
                let turn = state.memory.append(Speaker::Assistant, response.content);
                TurnReply::text(ReplyKind::Chat, turn.text.clone())
            }
            Err(e) => {
                warn!(error = %e, "provider call failed, replying with fallback");
                TurnReply::text(ReplyKind::Chat, CHAT_FALLBACK)
            }
        }
    }

    async fn search_memes(&self, state: &mut SessionState, keyword: &str) -> TurnReply {
        let query = MemeQuery {
            keyword: keyword.to_string(),
            limit: self.settings.meme_limit,
        };

        let images = match self.memes.search(&query).await {
            Ok(images) => images,
            Err(e) => {
                warn!(error = %e, keyword = %keyword, "meme search failed, replying with fallback");
                return TurnReply::text(ReplyKind::MemeSearch, MEME_FALLBACK);
            }
        };

        debug!(keyword = %keyword, results = images.len(), "meme search finished");
        state.memes.replace(keyword, images);

        match state.memes.current().cloned() {
            Some(image) => {
                let text = caption(state, &image);
                TurnReply::with_image(ReplyKind::MemeSearch, text, image)
            }
            None => TurnReply::text(
                ReplyKind::MemeSearch,
                format!("No memes found for **{keyword}**."),
            ),
        }
    }

    /// Topic analysis of the session so far. The model is asked only when
    /// `use_model` is set and model analysis is enabled.
    async fn analyze_topics(&self, state: &SessionState, use_model: bool) -> TopicAnalysis {
        let inputs: Vec<&str> = state.memory.user_inputs().collect();
        if use_model && self.settings.model_analysis {
            self.analyzer.analyze(&inputs, &state.interests).await
        } else {
            TopicAnalysis::analyze(inputs, &state.interests)
        }
    }

    async fn interest_report(&self, state: &SessionState) -> TurnReply {
        let analysis = self.analyze_topics(state, true).await;
        TurnReply::text(
            ReplyKind::InterestReport,
            analysis.render_report(&state.interests),
        )
    }

    fn history(&self, state: &SessionState) -> TurnReply {
        if state.memory.is_empty() {
            return TurnReply::text(ReplyKind::History, "No conversation history yet.");
        }

        let lines: Vec<String> = state
            .memory
            .window()
            .map(|turn| {
                let who = match turn.speaker {
                    Speaker::User => "You",
                    Speaker::Assistant => self.persona_name(),
                };
                format!("[{}] {who}: {}", turn.at.format("%H:%M:%S"), turn.text)
            })
            .collect();
        TurnReply::text(ReplyKind::History, lines.join("\n"))
    }
}

fn caption(state: &SessionState, image: &MemeImage) -> String {
    match state.memes.position() {
        Some((index, total)) => format!(
            "**{}**\nSource: {} ({}/{total})",
            image.title,
            image.source,
            index + 1
        ),
        None => format!("**{}**\nSource: {}", image.title, image.source),
    }
}

fn record_interest(state: &mut SessionState, interest: &str) -> TurnReply {
    let mut text = match state.interests.insert(interest) {
        InterestInsert::Added => {
            format!("Thank you for telling me! I'll remember that you like **{interest}**.")
        }
        InterestInsert::AlreadyKnown => {
            format!("I remember! You already told me you like **{interest}**.")
        }
        InterestInsert::Empty => "Hmm, I didn't catch what you like.".to_string(),
    };

    let recognized = state.interests.recognized();
    if !recognized.is_empty() {
        text.push_str(&format!(
            "\nI know a thing or two about: {}!",
            recognized.join(", ")
        ));
    }
    TurnReply::text(ReplyKind::InterestUpdate, text)
}
