// SPDX-FileCopyrightText: 2026 Tanjiro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rule-based classification of user input.
//!
//! Every message maps to exactly one [`MessageKind`]. Rules are checked in a
//! fixed order and the first match wins; anything unrecognized is plain chat.
//! No network, no model call.

use serde::Serialize;
use strum::{Display, IntoStaticStr};

/// Direction for meme navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    Next,
    Previous,
}

/// What a user message asks for.
#[derive(Debug, Clone, PartialEq, Eq, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum MessageKind {
    /// Free text for the persona.
    PlainChat,
    /// `meme <keyword>` or `#<keyword>`.
    MemeSearch { keyword: String },
    /// `next meme` / `previous meme`.
    Navigation(Direction),
    /// `i like <x>` and friends.
    InterestUpdate { interest: String },
    /// `interests`
    InterestReport,
    /// `history`
    History,
    /// `clear` / `reset`
    Reset,
}

const NEXT_COMMANDS: &[&str] = &["next meme"];
const PREVIOUS_COMMANDS: &[&str] = &["previous meme", "prev meme"];

const MEME_PREFIX: &str = "meme ";

/// Interest declaration prefixes. `interest:` precedes `interest ` so the
/// colon form is not read as part of the value.
const INTEREST_PREFIXES: &[&str] = &[
    "interest:",
    "interest ",
    "i'm interested in ",
    "i am interested in ",
];

/// Prefixes that also open ordinary chat ("I love you, Tanjiro"). They only
/// declare an interest when the value does not start with a [`CHAT_OBJECTS`] word.
const CASUAL_INTEREST_PREFIXES: &[&str] = &["i like ", "i love ", "i'm into "];

const CHAT_OBJECTS: &[&str] = &[
    "you", "your", "yours", "it", "its", "that", "this", "these", "those", "him", "her", "them",
    "me", "my", "us", "our", "to", "when", "how", "what", "being",
];

/// Classifies a raw user message.
pub fn classify(input: &str) -> MessageKind {
    let trimmed = input.trim();
    let normalized = trimmed
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    if NEXT_COMMANDS.contains(&normalized.as_str()) {
        return MessageKind::Navigation(Direction::Next);
    }
    if PREVIOUS_COMMANDS.contains(&normalized.as_str()) {
        return MessageKind::Navigation(Direction::Previous);
    }

    if let Some(keyword) = meme_keyword(trimmed) {
        return MessageKind::MemeSearch { keyword };
    }

    if let Some(interest) = declared_interest(trimmed) {
        return MessageKind::InterestUpdate { interest };
    }

    match normalized.as_str() {
        "interests" => MessageKind::InterestReport,
        "history" => MessageKind::History,
        "clear" | "reset" => MessageKind::Reset,
        _ => MessageKind::PlainChat,
    }
}

fn meme_keyword(trimmed: &str) -> Option<String> {
    let rest = match strip_prefix_ignore_case(trimmed, MEME_PREFIX) {
        Some(rest) => rest,
        None if trimmed.starts_with('#') => trimmed,
        None => return None,
    };
    let keyword = rest.trim().trim_start_matches('#').trim();
    (!keyword.is_empty()).then(|| keyword.to_string())
}

fn declared_interest(trimmed: &str) -> Option<String> {
    let explicit = INTEREST_PREFIXES
        .iter()
        .find_map(|prefix| strip_prefix_ignore_case(trimmed, prefix));
    let rest = match explicit {
        Some(rest) => rest,
        None => {
            let rest = CASUAL_INTEREST_PREFIXES
                .iter()
                .find_map(|prefix| strip_prefix_ignore_case(trimmed, prefix))?;
            if starts_with_chat_object(rest) {
                return None;
            }
            rest
        }
    };
    let interest = rest.trim().trim_end_matches(['.', '!']).trim_end();
    (!interest.is_empty()).then(|| interest.to_string())
}

fn starts_with_chat_object(value: &str) -> bool {
    value
        .split_whitespace()
        .next()
        .map(|word| word.trim_end_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
        .is_some_and(|word| CHAT_OBJECTS.contains(&word.as_str()))
}

/// ASCII case-insensitive `strip_prefix` that keeps the original casing of the rest.
fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &text[prefix.len()..])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meme(keyword: &str) -> MessageKind {
        MessageKind::MemeSearch {
            keyword: keyword.to_string(),
        }
    }

    fn interest(value: &str) -> MessageKind {
        MessageKind::InterestUpdate {
            interest: value.to_string(),
        }
    }

    #[test]
    fn meme_search_forms() {
        assert_eq!(classify("meme nezuko"), meme("nezuko"));
        assert_eq!(classify("#tanjiro"), meme("tanjiro"));
        assert_eq!(classify("meme #tanjiro"), meme("tanjiro"));
        assert_eq!(classify("  MEME Demon Slayer  "), meme("Demon Slayer"));
        assert_eq!(classify("##zenitsu"), meme("zenitsu"));
    }

    #[test]
    fn meme_without_keyword_is_chat() {
        assert_eq!(classify("meme"), MessageKind::PlainChat);
        assert_eq!(classify("meme   "), MessageKind::PlainChat);
        assert_eq!(classify("meme #"), MessageKind::PlainChat);
        assert_eq!(classify("#"), MessageKind::PlainChat);
        assert_eq!(classify("memes are great"), MessageKind::PlainChat);
    }

    #[test]
    fn navigation_commands() {
        assert_eq!(
            classify("next meme"),
            MessageKind::Navigation(Direction::Next)
        );
        assert_eq!(
            classify("Previous Meme"),
            MessageKind::Navigation(Direction::Previous)
        );
        assert_eq!(
            classify("  prev   meme "),
            MessageKind::Navigation(Direction::Previous)
        );
        assert_eq!(classify("next memes please"), MessageKind::PlainChat);
    }

    #[test]
    fn interest_prefixes() {
        assert_eq!(classify("interest water breathing"), interest("water breathing"));
        assert_eq!(classify("interest: Hashira"), interest("Hashira"));
        assert_eq!(classify("I like Nezuko!"), interest("Nezuko"));
        assert_eq!(classify("i love swords."), interest("swords"));
        assert_eq!(classify("I'm interested in training"), interest("training"));
        assert_eq!(classify("I am interested in Muzan"), interest("Muzan"));
        assert_eq!(classify("i'm into anime!!"), interest("anime"));
    }

    #[test]
    fn affection_and_pronouns_stay_chat() {
        for input in [
            "I love you, Tanjiro",
            "i like you",
            "I love it!",
            "I like that you never give up",
            "i love how kind you are",
            "I like to train every morning",
            "i'm into this conversation",
            "I love my sister",
        ] {
            assert_eq!(classify(input), MessageKind::PlainChat, "{input}");
        }
    }

    #[test]
    fn explicit_forms_accept_any_value() {
        assert_eq!(classify("interest: you"), interest("you"));
        assert_eq!(classify("I'm interested in this arc"), interest("this arc"));
        assert_eq!(classify("I like youkai stories"), interest("youkai stories"));
    }

    #[test]
    fn interest_without_value_is_chat() {
        assert_eq!(classify("i like !"), MessageKind::PlainChat);
        assert_eq!(classify("interest:"), MessageKind::PlainChat);
        assert_eq!(classify("I like"), MessageKind::PlainChat);
    }

    #[test]
    fn single_word_commands() {
        assert_eq!(classify("interests"), MessageKind::InterestReport);
        assert_eq!(classify("HISTORY"), MessageKind::History);
        assert_eq!(classify("clear"), MessageKind::Reset);
        assert_eq!(classify(" reset "), MessageKind::Reset);
    }

    #[test]
    fn everything_else_is_plain_chat() {
        assert_eq!(classify("Hello Tanjiro, how are you?"), MessageKind::PlainChat);
        assert_eq!(classify("Tell me about Nezuko."), MessageKind::PlainChat);
        assert_eq!(classify(""), MessageKind::PlainChat);
        assert_eq!(classify("   "), MessageKind::PlainChat);
        assert_eq!(classify("show my history please"), MessageKind::PlainChat);
    }

    #[test]
    fn non_ascii_input_does_not_panic() {
        assert_eq!(classify("é"), MessageKind::PlainChat);
        assert_eq!(classify("炭治郎"), MessageKind::PlainChat);
        assert_eq!(classify("meme 禰豆子"), meme("禰豆子"));
    }

    #[test]
    fn kind_names() {
        let name: &'static str = (&MessageKind::PlainChat).into();
        assert_eq!(name, "plain_chat");
        let name: &'static str = (&meme("x")).into();
        assert_eq!(name, "meme_search");
        assert_eq!(Direction::Previous.to_string(), "previous");
    }
}
