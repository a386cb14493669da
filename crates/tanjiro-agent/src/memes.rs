// SPDX-FileCopyrightText: 2026 Tanjiro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The last meme search result and a cursor into it.

use tanjiro_core::types::MemeImage;

/// Images from the most recent search plus the one currently shown.
///
/// The cursor stays within `0..len` while images are loaded. Navigation
/// clamps at both ends; it never wraps.
#[derive(Debug, Clone, Default)]
pub struct MemeCursor {
    keyword: Option<String>,
    images: Vec<MemeImage>,
    cursor: usize,
}

impl MemeCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the result wholesale and points at the first image.
    pub fn replace(&mut self, keyword: impl Into<String>, images: Vec<MemeImage>) {
        self.keyword = Some(keyword.into());
        self.images = images;
        self.cursor = 0;
    }

    /// Moves to the next image. Returns `false` at the last image or when empty.
    pub fn advance(&mut self) -> bool {
        if self.cursor + 1 < self.images.len() {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    /// Moves to the previous image. Returns `false` at the first image or when empty.
    pub fn retreat(&mut self) -> bool {
        if self.cursor > 0 && !self.images.is_empty() {
            self.cursor -= 1;
            true
        } else {
            false
        }
    }

    /// The image under the cursor; `None` when nothing is loaded.
    pub fn current(&self) -> Option<&MemeImage> {
        self.images.get(self.cursor)
    }

    /// Keyword of the last search, even if it found nothing.
    pub fn keyword(&self) -> Option<&str> {
        self.keyword.as_deref()
    }

    /// Zero-based cursor and total count, when images are loaded.
    pub fn position(&self) -> Option<(usize, usize)> {
        (!self.images.is_empty()).then_some((self.cursor, self.images.len()))
    }

    pub fn is_active(&self) -> bool {
        !self.images.is_empty()
    }

    pub fn images(&self) -> &[MemeImage] {
        &self.images
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
