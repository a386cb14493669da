// SPDX-FileCopyrightText: 2026 Tanjiro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Declared interests and topic analysis.
//!
//! [`InterestSet`] records what the user said they like. [`TopicAnalysis`]
//! holds weighted topics, either counted from keywords here or produced by
//! the model (see [`crate::analysis`]), and feeds both the persona context
//! and the `interests` report.

use std::cmp::Reverse;
use std::fmt::Write;

/// Demon Slayer vocabulary recognized by the topic analysis.
pub const DEMON_SLAYER_TOPICS: &[&str] = &[
    "nezuko",
    "family",
    "demons",
    "breathing technique",
    "muzan",
    "hashira",
    "sword",
    "water breathing",
    "mission",
    "sister",
    "training",
    "final selection",
    "urokodaki",
    "hinokami",
    "dance",
    "slayer",
    "corps",
    "inosuke",
    "zenitsu",
    "fight",
];

/// General conversation vocabulary recognized by the topic analysis.
pub const GENERAL_TOPICS: &[&str] = &[
    "help", "friend", "strong", "kind", "power", "protect", "love", "hope", "mission", "goal",
    "dream", "future",
];

/// How many topics the persona context mentions.
const CONTEXT_TOPIC_COUNT: usize = 3;

/// Star glyphs are capped so a chatty session does not print a wall of them.
const MAX_STARS: u32 = 5;

/// Result of inserting into an [`InterestSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterestInsert {
    /// First time this interest was declared.
    Added,
    /// Already present under a case or spacing variant.
    AlreadyKnown,
    /// Nothing left after normalization.
    Empty,
}

/// Case-insensitively deduplicated, insertion-ordered set of interests.
///
/// The first spelling of an interest is the one kept for display.
#[derive(Debug, Clone, Default)]
pub struct InterestSet {
    entries: Vec<(String, String)>,
}

impl InterestSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an interest unless a variant of it is already present.
    pub fn insert(&mut self, raw: &str) -> InterestInsert {
        let display = collapse_whitespace(raw);
        if display.is_empty() {
            return InterestInsert::Empty;
        }
        let key = display.to_lowercase();
        if self.entries.iter().any(|(k, _)| *k == key) {
            return InterestInsert::AlreadyKnown;
        }
        self.entries.push((key, display));
        InterestInsert::Added
    }

    pub fn contains(&self, raw: &str) -> bool {
        let key = collapse_whitespace(raw).to_lowercase();
        self.entries.iter().any(|(k, _)| *k == key)
    }

    /// Interests in declaration order, with their original casing.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, display)| display.as_str())
    }

    /// Declared interests that mention a topic from the built-in vocabularies.
    pub fn recognized(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(key, _)| {
                DEMON_SLAYER_TOPICS
                    .iter()
                    .chain(GENERAL_TOPICS)
                    .any(|topic| key.contains(topic))
            })
            .map(|(_, display)| display.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// A weighted topic list entry.
pub type TopicWeight = (String, u32);

/// Topic weights derived from user messages and declared interests.
///
/// Each list is sorted by weight (descending), then by topic name.
/// Topics with zero weight are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicAnalysis {
    pub demon_slayer: Vec<TopicWeight>,
    pub general: Vec<TopicWeight>,
    /// Short description of the user's interests. Only the model writes one.
    pub summary: Option<String>,
}

impl TopicAnalysis {
    /// Builds an analysis from unsorted weights, dropping zero weights.
    pub fn from_weights(
        demon_slayer: Vec<TopicWeight>,
        general: Vec<TopicWeight>,
        summary: Option<String>,
    ) -> Self {
        let tidy = |mut weights: Vec<TopicWeight>| {
            weights.retain(|(topic, weight)| *weight > 0 && !topic.is_empty());
            sort_weights(&mut weights);
            weights
        };
        Self {
            demon_slayer: tidy(demon_slayer),
            general: tidy(general),
            summary: summary
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        }
    }

    /// Counts, per topic, the user messages mentioning it, plus one for
    /// each declared interest that mentions it.
    pub fn analyze<'a>(
        user_inputs: impl IntoIterator<Item = &'a str>,
        interests: &InterestSet,
    ) -> Self {
        let lowered: Vec<String> = user_inputs
            .into_iter()
            .map(str::to_lowercase)
            .chain(interests.entries.iter().map(|(key, _)| key.clone()))
            .collect();

        Self {
            demon_slayer: weigh(DEMON_SLAYER_TOPICS, &lowered),
            general: weigh(GENERAL_TOPICS, &lowered),
            summary: None,
        }
    }

    /// No topics and no summary.
    pub fn is_empty(&self) -> bool {
        self.demon_slayer.is_empty() && self.general.is_empty() && self.summary.is_none()
    }

    /// The heaviest topics across both lists, each named once.
    pub fn top_topics(&self, n: usize) -> Vec<&str> {
        let mut combined: Vec<(&str, u32)> = Vec::new();
        for (topic, weight) in self.demon_slayer.iter().chain(&self.general) {
            if !combined.iter().any(|(t, _)| t.eq_ignore_ascii_case(topic)) {
                combined.push((topic.as_str(), *weight));
            }
        }
        combined.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        combined.into_iter().take(n).map(|(t, _)| t).collect()
    }

    /// The sentence added to the persona prompt, if any topic was found.
    pub fn context_line(&self) -> Option<String> {
        let top = self.top_topics(CONTEXT_TOPIC_COUNT);
        (!top.is_empty()).then(|| {
            format!(
                "The user has shown interest in these topics: {}.",
                top.join(", ")
            )
        })
    }

    /// The summary line added to the persona prompt, if the model wrote one.
    pub fn summary_line(&self) -> Option<String> {
        self.summary
            .as_ref()
            .map(|summary| format!("User context: {summary}"))
    }

    /// Renders the `interests` command report.
    pub fn render_report(&self, interests: &InterestSet) -> String {
        let mut out = String::from("📚 **Tanjiro's Understanding of Your Interests**\n");

        if self.is_empty() && interests.is_empty() {
            out.push_str("\n_I haven't identified any specific topics yet._");
            return out;
        }

        if !self.demon_slayer.is_empty() {
            out.push_str("\n🔸 **Demon Slayer Topics**:\n");
            write_weights(&mut out, &self.demon_slayer);
        }
        if !self.general.is_empty() {
            out.push_str("\n🔹 **General Topics**:\n");
            write_weights(&mut out, &self.general);
        }
        if let Some(summary) = &self.summary {
            let _ = write!(out, "\n📝 **Summary**: {summary}\n");
        }
        if !interests.is_empty() {
            let declared: Vec<&str> = interests.iter().collect();
            let _ = write!(out, "\n💬 **You told me you like**: {}\n", declared.join(", "));
        }

        out.trim_end().to_string()
    }
}

fn weigh(vocabulary: &[&str], texts: &[String]) -> Vec<TopicWeight> {
    let mut weights: Vec<TopicWeight> = vocabulary
        .iter()
        .map(|&topic| {
            let count = texts.iter().filter(|text| text.contains(topic)).count();
            (topic.to_string(), u32::try_from(count).unwrap_or(u32::MAX))
        })
        .filter(|(_, count)| *count > 0)
        .collect();
    sort_weights(&mut weights);
    weights
}

fn sort_weights(weights: &mut [TopicWeight]) {
    weights.sort_by(|a, b| (Reverse(a.1), &a.0).cmp(&(Reverse(b.1), &b.0)));
}

fn write_weights(out: &mut String, weights: &[TopicWeight]) {
    for (topic, weight) in weights {
        let stars = "★".repeat((*weight).min(MAX_STARS) as usize);
        let _ = writeln!(out, "- {}: {stars} ({weight})", capitalize(topic));
    }
}

fn capitalize(topic: &str) -> String {
    let mut chars = topic.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
