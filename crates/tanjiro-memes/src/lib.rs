// SPDX-FileCopyrightText: 2026 Tanjiro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Meme image sources for Tanjiro.
//!
//! Two [`MemeSource`] backends are available: [`RedditSource`] queries Reddit
//! search, [`CatalogSource`] answers from a small built-in catalog. Use
//! [`build_meme_source`] to pick one from configuration.

pub mod catalog;
pub mod reddit;
pub mod url;

use std::sync::Arc;

use tanjiro_config::model::{MemeProviderKind, MemesConfig};
use tanjiro_core::error::TanjiroError;
use tanjiro_core::traits::{MemeSource, PluginAdapter};
use tracing::info;

pub use catalog::CatalogSource;
pub use reddit::RedditSource;

/// Builds the meme source selected by `memes.provider`.
pub fn build_meme_source(config: &MemesConfig) -> Result<Arc<dyn MemeSource>, TanjiroError> {
    let source: Arc<dyn MemeSource> = match config.provider {
        MemeProviderKind::Reddit => Arc::new(RedditSource::new(config)?),
        MemeProviderKind::Catalog => Arc::new(CatalogSource::default()),
    };
    info!(
        source = source.name(),
        max_results = config.max_results,
        "meme source initialized"
    );
    Ok(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_reddit_by_default() {
        let source = build_meme_source(&MemesConfig::default()).unwrap();
        assert_eq!(source.name(), "reddit");
    }

    #[test]
    fn builds_catalog_when_selected() {
        let config = MemesConfig {
            provider: MemeProviderKind::Catalog,
            ..MemesConfig::default()
        };
        let source = build_meme_source(&config).unwrap();
        assert_eq!(source.name(), "catalog");
    }
}
