// SPDX-FileCopyrightText: 2026 Tanjiro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Meme source trait for image search backends.

use async_trait::async_trait;

use crate::error::TanjiroError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{MemeImage, MemeQuery};

/// Adapter for a keyword image search.
#[async_trait]
pub trait MemeSource: PluginAdapter {
    /// Returns images for the keyword, best match first.
    ///
    /// An empty vector means "no results" and is not an error.
    async fn search(&self, query: &MemeQuery) -> Result<Vec<MemeImage>, TanjiroError>;
}
