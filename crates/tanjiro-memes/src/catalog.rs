// SPDX-FileCopyrightText: 2026 Tanjiro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in offline meme catalog.
//!
//! A handful of Demon Slayer images keyed by topic, searchable without any
//! network access. Selected with `memes.provider = "catalog"`.

use async_trait::async_trait;
use tanjiro_core::error::TanjiroError;
use tanjiro_core::traits::{MemeSource, PluginAdapter};
use tanjiro_core::types::{AdapterType, HealthStatus, MemeImage, MemeQuery};

/// One catalog entry, filed under a topic key.
#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry {
    pub topic: &'static str,
    pub title: &'static str,
    pub source: &'static str,
    pub url: &'static str,
    pub tags: &'static [&'static str],
}

impl CatalogEntry {
    fn to_image(self) -> MemeImage {
        MemeImage {
            title: self.title.to_string(),
            url: self.url.to_string(),
            source: self.source.to_string(),
        }
    }
}

/// The default catalog. Ordered by topic, then by entry.
pub const DEFAULT_CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        topic: "tanjiro",
        title: "Confused Tanjiro",
        source: "Demon Slayer anime",
        url: "https://i.imgur.com/8jcAyUd.jpg",
        tags: &["tanjiro", "confused", "reaction"],
    },
    CatalogEntry {
        topic: "nezuko",
        title: "Nezuko Running",
        source: "Demon Slayer anime",
        url: "https://c.tenor.com/aNGz6XLt5hEAAAAd/demon-slayer-nezuko.gif",
        tags: &["nezuko", "running", "cute"],
    },
    CatalogEntry {
        topic: "nezuko",
        title: "Smol Nezuko",
        source: "Demon Slayer anime",
        url: "https://i.pinimg.com/originals/6f/da/33/6fda33eccac383df0e9e49bad6a10e6b.jpg",
        tags: &["nezuko", "cute", "small"],
    },
    CatalogEntry {
        topic: "demon slayer",
        title: "Zenitsu Sleeping vs Awake",
        source: "Demon Slayer anime",
        url: "https://pbs.twimg.com/media/EAA4WfPUcAAeN7r.jpg",
        tags: &["zenitsu", "sleeping", "thunder breathing"],
    },
    CatalogEntry {
        topic: "anime",
        title: "Anime Protagonist Hair",
        source: "Various anime",
        url: "https://i.pinimg.com/originals/b3/b3/0b/b3b30bce0ecd3f3cbfb2ad43a7ecb55f.jpg",
        tags: &["anime", "hair", "protagonist"],
    },
];

/// Meme source answering from a static catalog.
#[derive(Debug, Clone)]
pub struct CatalogSource {
    entries: &'static [CatalogEntry],
}

impl Default for CatalogSource {
    fn default() -> Self {
        Self::new(DEFAULT_CATALOG)
    }
}

impl CatalogSource {
    pub fn new(entries: &'static [CatalogEntry]) -> Self {
        Self { entries }
    }

    /// Matches in three passes: exact topic, topics containing the keyword,
    /// then tags containing the keyword. Each image appears once.
    pub fn lookup(&self, keyword: &str, limit: usize) -> Vec<MemeImage> {
        let keyword = keyword.trim().to_lowercase();
        if keyword.is_empty() {
            return Vec::new();
        }

        let exact = self.entries.iter().filter(|e| e.topic == keyword);
        let partial = self
            .entries
            .iter()
            .filter(|e| e.topic != keyword && e.topic.contains(&keyword));
        let tagged = self
            .entries
            .iter()
            .filter(|e| e.tags.iter().any(|tag| tag.contains(&keyword)));

        let mut seen = Vec::new();
        exact
            .chain(partial)
            .chain(tagged)
            .filter(|e| {
                if seen.contains(&e.url) {
                    false
                } else {
                    seen.push(e.url);
                    true
                }
            })
            .take(limit)
            .map(|e| e.to_image())
            .collect()
    }
}

#[async_trait]
impl PluginAdapter for CatalogSource {
    fn name(&self) -> &str {
        "catalog"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::MemeSource
    }

    async fn health_check(&self) -> Result<HealthStatus, TanjiroError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl MemeSource for CatalogSource {
    async fn search(&self, query: &MemeQuery) -> Result<Vec<MemeImage>, TanjiroError> {
        Ok(self.lookup(&query.keyword, query.limit))
    }
}
