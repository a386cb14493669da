// SPDX-FileCopyrightText: 2026 Tanjiro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock meme source for deterministic testing.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use tanjiro_core::TanjiroError;
use tanjiro_core::traits::{MemeSource, PluginAdapter};
use tanjiro_core::types::{AdapterType, HealthStatus, MemeImage, MemeQuery};

/// Builds images titled after `titles`, with predictable URLs.
///
/// `sample_images(&["A", "B"])` yields `A` at `https://memes.test/a.jpg`
/// and `B` at `https://memes.test/b.jpg`.
pub fn sample_images(titles: &[&str]) -> Vec<MemeImage> {
    titles
        .iter()
        .map(|title| MemeImage {
            title: (*title).to_string(),
            url: format!("https://memes.test/{}.jpg", title.to_lowercase()),
            source: "r/test".to_string(),
        })
        .collect()
}

/// A meme source answering from a keyword map.
///
/// Keywords match case-insensitively. Unknown keywords return no images.
#[derive(Default)]
pub struct MockMemeSource {
    results: HashMap<String, Vec<MemeImage>>,
    queries: Arc<Mutex<Vec<MemeQuery>>>,
    always_fail: bool,
}

impl MockMemeSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the images returned for `keyword`.
    pub fn with_results(mut self, keyword: &str, images: Vec<MemeImage>) -> Self {
        self.results.insert(keyword.to_lowercase(), images);
        self
    }

    /// A source whose every search fails.
    pub fn failing() -> Self {
        Self {
            always_fail: true,
            ..Self::default()
        }
    }

    /// All queries received so far, oldest first.
    pub async fn queries(&self) -> Vec<MemeQuery> {
        self.queries.lock().await.clone()
    }
}

#[async_trait]
impl PluginAdapter for MockMemeSource {
    fn name(&self) -> &str {
        "mock-memes"
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
impl MemeSource for MockMemeSource {
    async fn search(&self, query: &MemeQuery) -> Result<Vec<MemeImage>, TanjiroError> {
        self.queries.lock().await.push(query.clone());

        if self.always_fail {
            return Err(TanjiroError::meme_source("mock meme source unavailable"));
        }

        let mut images = self
            .results
            .get(&query.keyword.to_lowercase())
            .cloned()
            .unwrap_or_default();
        images.truncate(query.limit);
        Ok(images)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(keyword: &str, limit: usize) -> MemeQuery {
        MemeQuery {
            keyword: keyword.to_string(),
            limit,
        }
    }

    #[test]
    fn sample_images_have_predictable_urls() {
        let images = sample_images(&["A", "B"]);
        assert_eq!(images[0].url, "https://memes.test/a.jpg");
        assert_eq!(images[1].title, "B");
    }

    #[tokio::test]
    async fn returns_registered_results_case_insensitively() {
        let source = MockMemeSource::new().with_results("Nezuko", sample_images(&["A", "B", "C"]));
        let images = source.search(&query("NEZUKO", 2)).await.unwrap();
        assert_eq!(images.len(), 2);
        assert!(source.search(&query("muzan", 5)).await.unwrap().is_empty());
        assert_eq!(source.queries().await.len(), 2);
    }

    #[tokio::test]
    async fn failing_source_errors() {
        let source = MockMemeSource::failing();
        let err = source.search(&query("nezuko", 5)).await.unwrap_err();
        assert!(matches!(err, TanjiroError::MemeSource { .. }));
    }
}
