// SPDX-FileCopyrightText: 2026 Tanjiro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reddit search backend.
//!
//! Queries the public `search.json` listing, keeps image posts, normalizes
//! their links, and orders them by score.

use std::cmp::Reverse;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use tanjiro_config::model::MemesConfig;
use tanjiro_core::error::TanjiroError;
use tanjiro_core::traits::{MemeSource, PluginAdapter};
use tanjiro_core::types::{AdapterType, HealthStatus, MemeImage, MemeQuery};
use tracing::debug;

use crate::url::{clean_reddit_url, has_image_extension, is_valid_image_url};

/// Posts requested per wanted image. Many hits are videos, self posts or
/// external links, so the listing is over-fetched and then filtered.
const OVERFETCH_FACTOR: usize = 5;

/// Largest `limit` the listing endpoint honours.
const MAX_LISTING_LIMIT: usize = 100;

fn listing_limit(wanted: usize) -> usize {
    wanted
        .saturating_mul(OVERFETCH_FACTOR)
        .clamp(1, MAX_LISTING_LIMIT)
}

// --- Listing wire types ---

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Child>,
}

#[derive(Debug, Deserialize)]
struct Child {
    data: Post,
}

/// The subset of a link post Tanjiro looks at.
#[derive(Debug, Deserialize)]
struct Post {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    subreddit: Option<String>,
    #[serde(default)]
    score: i64,
    #[serde(default)]
    over_18: bool,
    #[serde(default)]
    post_hint: Option<String>,
}

/// Meme source backed by Reddit search.
#[derive(Debug, Clone)]
pub struct RedditSource {
    client: reqwest::Client,
    search_url: String,
    allow_nsfw: bool,
}

impl RedditSource {
    /// Creates a source from the `[memes]` configuration section.
    pub fn new(config: &MemesConfig) -> Result<Self, TanjiroError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent).map_err(|e| {
                TanjiroError::Config(format!("invalid memes.user_agent header value: {e}"))
            })?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TanjiroError::MemeSource {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            search_url: format!("{}/search.json", config.base_url.trim_end_matches('/')),
            allow_nsfw: config.allow_nsfw,
        })
    }

    fn search_request_url(&self, query: &MemeQuery) -> Result<Url, TanjiroError> {
        let limit = listing_limit(query.limit).to_string();
        Url::parse_with_params(
            &self.search_url,
            [
                ("q", query.keyword.as_str()),
                ("limit", limit.as_str()),
                ("sort", "relevance"),
                ("type", "link"),
            ],
        )
        .map_err(|e| TanjiroError::MemeSource {
            message: format!("invalid search URL `{}`: {e}", self.search_url),
            source: Some(Box::new(e)),
        })
    }

    /// Converts a post into an image, or `None` when it should be skipped.
    fn to_image(&self, post: Post) -> Option<MemeImage> {
        if post.over_18 && !self.allow_nsfw {
            return None;
        }
        let url = clean_reddit_url(post.url.as_deref()?);
        let is_image = post.post_hint.as_deref() == Some("image") || has_image_extension(&url);
        if !is_image || !is_valid_image_url(&url) {
            return None;
        }

        let source = post
            .subreddit
            .filter(|s| !s.is_empty())
            .map_or_else(|| "Reddit".to_string(), |s| format!("r/{s}"));

        Some(MemeImage {
            title: post.title,
            url,
            source,
        })
    }
}

#[async_trait]
impl PluginAdapter for RedditSource {
    fn name(&self) -> &str {
        "reddit"
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
impl MemeSource for RedditSource {
    async fn search(&self, query: &MemeQuery) -> Result<Vec<MemeImage>, TanjiroError> {
        let url = self.search_request_url(query)?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TanjiroError::MemeSource {
                message: format!("Reddit request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TanjiroError::meme_source(format!(
                "Reddit returned {status}: {body}"
            )));
        }

        let listing: Listing = response.json().await.map_err(|e| TanjiroError::MemeSource {
            message: format!("failed to parse Reddit listing: {e}"),
            source: Some(Box::new(e)),
        })?;

        let mut scored: Vec<(i64, MemeImage)> = listing
            .data
            .children
            .into_iter()
            .filter_map(|child| {
                let score = child.data.score;
                self.to_image(child.data).map(|image| (score, image))
            })
            .collect();

        // Stable: equal scores keep Reddit's relevance order.
        scored.sort_by_key(|(score, _)| Reverse(*score));

        let images: Vec<MemeImage> = scored
            .into_iter()
            .map(|(_, image)| image)
            .take(query.limit)
            .collect();

        debug!(
            keyword = %query.keyword,
            results = images.len(),
            "reddit meme search finished"
        );
        Ok(images)
    }
}
