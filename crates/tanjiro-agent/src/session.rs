// SPDX-FileCopyrightText: 2026 Tanjiro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-session conversational state.

use crate::interests::InterestSet;
use crate::memory::ConversationMemory;
use crate::memes::MemeCursor;

/// Everything Tanjiro remembers about one browser or shell session.
///
/// Owned by exactly one session and mutated only by the turn router.
/// Never persisted.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub memory: ConversationMemory,
    pub interests: InterestSet,
    pub memes: MemeCursor,
}

impl SessionState {
    pub fn new(max_turns: usize) -> Self {
        Self {
            memory: ConversationMemory::new(max_turns),
            interests: InterestSet::new(),
            memes: MemeCursor::new(),
        }
    }

    /// Forgets the conversation, the interests and the meme result.
    pub fn reset(&mut self) {
        self.memory.clear();
        self.interests.clear();
        self.memes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tanjiro_core::types::{MemeImage, Speaker};

    #[test]
    fn reset_clears_all_parts() {
        let mut state = SessionState::new(4);
        state.memory.append(Speaker::User, "hi");
        state.interests.insert("nezuko");
        state.memes.replace(
            "nezuko",
            vec![MemeImage {
                title: "A".into(),
                url: "https://i.redd.it/a.jpg".into(),
                source: "r/test".into(),
            }],
        );

        state.reset();

        assert!(state.memory.is_empty());
        assert!(state.interests.is_empty());
        assert!(state.memes.current().is_none());
        assert_eq!(state.memory.capacity(), 4);
    }
}
