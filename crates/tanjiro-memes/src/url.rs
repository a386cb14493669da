// SPDX-FileCopyrightText: 2026 Tanjiro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Image URL normalization for Reddit-hosted media.

use reqwest::Url;

/// File extensions treated as directly renderable images.
pub const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif"];

/// Reddit's resized preview host. Links on it carry signed query strings.
const PREVIEW_HOST: &str = "preview.redd.it";

/// Host serving the original upload behind a preview link.
const DIRECT_HOST: &str = "i.redd.it";

/// Proxy hosts for third-party media; their links expire and refuse hotlinking.
const REJECTED_HOSTS: &[&str] = &["external-preview.redd.it", "external-i.redd.it"];

/// Returns true when the URL path ends in a known image extension.
///
/// The query string and fragment are ignored; matching is case-insensitive.
pub fn has_image_extension(url: &str) -> bool {
    let path = match Url::parse(url) {
        Ok(parsed) => parsed.path().to_ascii_lowercase(),
        Err(_) => url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase(),
    };
    IMAGE_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

/// Rewrites a `preview.redd.it` link to the direct `i.redd.it` upload.
///
/// The query string is dropped and `.jpg` is appended when the path has no
/// image extension. Any other URL is returned unchanged.
pub fn clean_reddit_url(url: &str) -> String {
    let Ok(mut parsed) = Url::parse(url) else {
        return url.to_string();
    };
    if parsed.host_str() != Some(PREVIEW_HOST) {
        return url.to_string();
    }
    if parsed.set_host(Some(DIRECT_HOST)).is_err() {
        return url.to_string();
    }
    parsed.set_query(None);
    parsed.set_fragment(None);

    let path = parsed.path().to_string();
    let lower = path.to_ascii_lowercase();
    if !IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
        parsed.set_path(&format!("{path}.jpg"));
    }
    parsed.to_string()
}

/// Returns true when the URL can be shown to the user as an image link.
///
/// Requires an http(s) URL whose host is not one of Reddit's external media proxies.
pub fn is_valid_image_url(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    if !matches!(parsed.scheme(), "http" | "https") {
        return false;
    }
    match parsed.host_str() {
        Some(host) => !REJECTED_HOSTS.contains(&host),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn preview_link_becomes_direct_upload() {
        let url = "https://preview.redd.it/abc123.png?width=640&crop=smart&auto=webp&s=deadbeef";
        assert_eq!(clean_reddit_url(url), "https://i.redd.it/abc123.png");
    }

    #[test]
    fn preview_link_without_extension_gets_jpg() {
        let url = "https://preview.redd.it/abc123?width=640&s=deadbeef";
        assert_eq!(clean_reddit_url(url), "https://i.redd.it/abc123.jpg");
    }

    #[test]
    fn other_hosts_are_untouched() {
        let url = "https://i.imgur.com/8jcAyUd.jpg?x=1";
        assert_eq!(clean_reddit_url(url), url);
        assert_eq!(clean_reddit_url("not a url"), "not a url");
    }

    #[test]
    fn external_preview_is_not_rewritten_and_is_rejected() {
        let url = "https://external-preview.redd.it/xyz.jpg?auto=webp";
        assert_eq!(clean_reddit_url(url), url);
        assert!(!is_valid_image_url(url));
        assert!(!is_valid_image_url("https://external-i.redd.it/xyz.png"));
    }

    #[test]
    fn valid_image_urls() {
        assert!(is_valid_image_url("https://i.redd.it/abc.jpg"));
        assert!(is_valid_image_url("http://c.tenor.com/aNGz6XLt5hEAAAAd/nezuko.gif"));
        assert!(!is_valid_image_url("ftp://i.redd.it/abc.jpg"));
        assert!(!is_valid_image_url("/r/memes/comments/abc"));
    }

    #[test]
    fn extension_check_ignores_query_and_case() {
        assert!(has_image_extension("https://i.redd.it/abc.JPG"));
        assert!(has_image_extension("https://i.imgur.com/a.png?size=large"));
        assert!(has_image_extension("https://c.tenor.com/x/demon-slayer.gif"));
        assert!(!has_image_extension("https://v.redd.it/abc123"));
        assert!(!has_image_extension("https://www.reddit.com/gallery/abc"));
    }

    proptest! {
        #[test]
        fn cleaned_preview_links_are_direct_images(
            id in "[a-z0-9]{4,16}",
            ext in prop::sample::select(vec!["", ".png", ".jpg", ".gif", ".jpeg"]),
            query in "[a-z0-9=&]{0,24}",
        ) {
            let url = format!("https://preview.redd.it/{id}{ext}?{query}");
            let cleaned = clean_reddit_url(&url);
            prop_assert!(cleaned.starts_with("https://i.redd.it/"));
            prop_assert!(!cleaned.contains('?'));
            prop_assert!(has_image_extension(&cleaned));
            prop_assert!(is_valid_image_url(&cleaned));
            prop_assert_eq!(clean_reddit_url(&cleaned), cleaned.clone());
        }
    }
}
