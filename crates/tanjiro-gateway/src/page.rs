// SPDX-FileCopyrightText: 2026 Tanjiro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The single-page chat UI served at `/`.

/// Chat column, meme panel with Previous/Next, Clear button and command help.
pub const INDEX_HTML: &str = include_str!("page.html");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_talks_to_the_api() {
        assert!(INDEX_HTML.contains("/v1/sessions"));
        assert!(INDEX_HTML.contains("/v1/messages"));
        assert!(INDEX_HTML.contains("memes/next"));
        assert!(INDEX_HTML.contains("memes/previous"));
    }

    #[test]
    fn page_ends_its_session_on_unload() {
        assert!(INDEX_HTML.contains("\"pagehide\""));
        assert!(INDEX_HTML.contains("method: \"DELETE\", keepalive: true"));
    }
}
