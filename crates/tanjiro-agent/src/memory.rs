// SPDX-FileCopyrightText: 2026 Tanjiro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded short-term conversation memory.
//!
//! Holds the most recent turns in chronological order. Appending past the
//! capacity evicts the oldest turn.

use std::collections::VecDeque;

use chrono::Utc;
use tanjiro_core::types::{Speaker, Turn};

/// Rolling window of the most recent conversation turns.
#[derive(Debug, Clone)]
pub struct ConversationMemory {
    turns: VecDeque<Turn>,
    capacity: usize,
    next_seq: u64,
}

impl ConversationMemory {
    /// Creates an empty memory holding at most `capacity` turns (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            turns: VecDeque::with_capacity(capacity),
            capacity,
            next_seq: 0,
        }
    }

    /// Appends a turn, evicting from the front if the window is full.
    pub fn append(&mut self, speaker: Speaker, text: impl Into<String>) -> &Turn {
        if self.turns.len() == self.capacity {
            self.turns.pop_front();
        }
        let turn = Turn {
            seq: self.next_seq,
            speaker,
            text: text.into(),
            at: Utc::now(),
        };
        self.next_seq += 1;
        self.turns.push_back(turn);
        &self.turns[self.turns.len() - 1]
    }

    /// Turns in chronological order, oldest first.
    pub fn window(&self) -> impl DoubleEndedIterator<Item = &Turn> + ExactSizeIterator {
        self.turns.iter()
    }

    /// Owned copy of the window.
    pub fn turns(&self) -> Vec<Turn> {
        self.turns.iter().cloned().collect()
    }

    /// Text of every user turn still in the window.
    pub fn user_inputs(&self) -> impl Iterator<Item = &str> {
        self.turns
            .iter()
            .filter(|t| t.speaker == Speaker::User)
            .map(|t| t.text.as_str())
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.back()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drops every turn. Sequence numbers keep increasing.
    pub fn clear(&mut self) {
        self.turns.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn append_assigns_increasing_seq() {
        let mut memory = ConversationMemory::new(4);
        assert_eq!(memory.append(Speaker::User, "hi").seq, 0);
        assert_eq!(memory.append(Speaker::Assistant, "hello").seq, 1);
        assert_eq!(memory.len(), 2);
        assert_eq!(memory.last().map(|t| t.text.as_str()), Some("hello"));
    }

    #[test]
    fn oldest_turn_is_evicted() {
        let mut memory = ConversationMemory::new(2);
        memory.append(Speaker::User, "one");
        memory.append(Speaker::Assistant, "two");
        memory.append(Speaker::User, "three");

        let texts: Vec<&str> = memory.window().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["two", "three"]);
        assert_eq!(memory.window().next().map(|t| t.seq), Some(1));
    }

    #[test]
    fn user_inputs_skip_assistant_turns() {
        let mut memory = ConversationMemory::new(10);
        memory.append(Speaker::User, "tell me about nezuko");
        memory.append(Speaker::Assistant, "she is my sister");
        memory.append(Speaker::User, "and zenitsu?");

        let inputs: Vec<&str> = memory.user_inputs().collect();
        assert_eq!(inputs, vec!["tell me about nezuko", "and zenitsu?"]);
    }

    #[test]
    fn clear_empties_but_keeps_sequence() {
        let mut memory = ConversationMemory::new(3);
        memory.append(Speaker::User, "a");
        memory.clear();
        assert!(memory.is_empty());
        assert_eq!(memory.append(Speaker::User, "b").seq, 1);
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let mut memory = ConversationMemory::new(0);
        memory.append(Speaker::User, "a");
        memory.append(Speaker::User, "b");
        assert_eq!(memory.capacity(), 1);
        assert_eq!(memory.turns()[0].text, "b");
    }

    proptest! {
        #[test]
        fn window_holds_most_recent_in_order(cap in 1usize..32, count in 0usize..100) {
            let mut memory = ConversationMemory::new(cap);
            for i in 0..count {
                let speaker = if i % 2 == 0 { Speaker::User } else { Speaker::Assistant };
                memory.append(speaker, format!("turn {i}"));
            }

            prop_assert!(memory.len() <= cap);
            prop_assert_eq!(memory.len(), count.min(cap));

            let expected: Vec<String> = (count.saturating_sub(cap)..count)
                .map(|i| format!("turn {i}"))
                .collect();
            let actual: Vec<String> = memory.window().map(|t| t.text.clone()).collect();
            prop_assert_eq!(actual, expected);

            let seqs: Vec<u64> = memory.window().map(|t| t.seq).collect();
            prop_assert!(seqs.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
