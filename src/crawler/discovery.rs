//! Same-site page discovery from the seed page
//!
//! Discovery is a simple, deterministic policy: document order, first
//! `max_pages` distinct URLs, seed first. It is not an importance ranking.

use crate::crawler::parser::PageDocument;
use crate::url::{is_same_site, resolve_link};
use std::collections::HashSet;
use url::Url;

/// File extensions that never lead to an HTML document
const NON_DOCUMENT_EXTENSIONS: &[&str] = &[
    // images
    "jpg", "jpeg", "png", "gif", "svg", "webp", "bmp", "ico",
    // archives and documents
    "zip", "gz", "tgz", "rar", "7z", "tar", "pdf",
    // stylesheets and scripts
    "css", "js", "mjs", "map",
    // media
    "mp3", "mp4", "mov", "avi", "webm",
];

/// Discovers the pages to analyze for a site
///
/// # Arguments
///
/// * `seed_url` - URL of the seed page (after redirects)
/// * `seed_body` - HTML of the seed page
/// * `max_pages` - Upper bound on the result, seed included
///
/// # Returns
///
/// Absolute same-scheme, same-host URLs in document order, seed first,
/// deduplicated and truncated to `max_pages`.
///
/// # Example
///
/// ```
/// use sumi_scout::crawler::discover;
/// use url::Url;
///
/// let seed = Url::parse("https://clinic.example/").unwrap();
/// let html = r#"<a href="/about">About</a><a href="https://elsewhere.example/">x</a>"#;
/// let pages = discover(&seed, html, 10);
/// assert_eq!(pages.len(), 2);
/// assert_eq!(pages[1].as_str(), "https://clinic.example/about");
/// ```
pub fn discover(seed_url: &Url, seed_body: &str, max_pages: usize) -> Vec<Url> {
    if max_pages == 0 {
        return Vec::new();
    }

    let mut seed = seed_url.clone();
    seed.set_fragment(None);

    let mut seen = HashSet::new();
    seen.insert(seed.as_str().to_string());
    let mut pages = vec![seed.clone()];

    let document = PageDocument::parse(seed_body);
    for anchor in document.anchors() {
        if pages.len() >= max_pages {
            break;
        }

        let Some(url) = resolve_link(&anchor.href, &seed) else {
            continue;
        };

        if !is_same_site(&seed, &url) || is_non_document(&url) {
            continue;
        }

        if seen.insert(url.as_str().to_string()) {
            pages.push(url);
        }
    }

    tracing::debug!("Discovered {} page(s) from {}", pages.len(), seed);
    pages
}

/// True if the URL path ends in an extension from the non-document list
fn is_non_document(url: &Url) -> bool {
    let last_segment = url.path().rsplit('/').next().unwrap_or_default();
    match last_segment.rsplit_once('.') {
        Some((_, ext)) => NON_DOCUMENT_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()),
        None => false,
    }
}
