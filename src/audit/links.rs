//! Broken-link verification

use crate::audit::issue::BrokenLinkRecord;
use crate::crawler::{check_link, Anchor, LinkStatus};
use crate::url::resolve_link;
use futures::stream::{self, StreamExt};
use reqwest::Client;
use std::collections::HashSet;
use std::time::Duration;
use url::Url;

/// Link checks running at once for a single page
const LINK_CHECK_CONCURRENCY: usize = 4;

/// A link selected for verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundLink {
    pub url: Url,
    pub anchor_text: Option<String>,
}

/// Picks the links of a page that will be verified
///
/// Mailto, tel, javascript and fragment-only links are skipped. The first
/// `limit` distinct targets in document order are kept.
pub fn select_links(anchors: &[Anchor], page_url: &Url, limit: usize) -> Vec<OutboundLink> {
    let mut seen = HashSet::new();
    anchors
        .iter()
        .filter_map(|anchor| {
            let url = resolve_link(&anchor.href, page_url)?;
            seen.insert(url.as_str().to_string()).then(|| OutboundLink {
                url,
                anchor_text: Some(anchor.text.clone()).filter(|t| !t.is_empty()),
            })
        })
        .take(limit)
        .collect()
}

/// Checks each link and returns the broken ones, in link order
///
/// A link is broken when it answers with status 400 or above or cannot be
/// reached at all. Checks that merely time out are logged and dropped.
pub async fn verify_links(
    client: &Client,
    page_url: &Url,
    page_title: Option<&str>,
    links: Vec<OutboundLink>,
    timeout: Duration,
) -> Vec<BrokenLinkRecord> {
    let results: Vec<(OutboundLink, LinkStatus)> = stream::iter(links)
        .map(|link| async move {
            let status = check_link(client, &link.url, timeout).await;
            (link, status)
        })
        .buffered(LINK_CHECK_CONCURRENCY)
        .collect()
        .await;

    results
        .into_iter()
        .filter_map(|(link, status)| match status {
            LinkStatus::Reachable(_) => None,
            LinkStatus::Inconclusive(reason) => {
                tracing::debug!("Link check for {} inconclusive: {}", link.url, reason);
                None
            }
            LinkStatus::Broken { status, reason } => {
                tracing::debug!("Broken link {} on {}", link.url, page_url);
                Some(BrokenLinkRecord {
                    broken_url: link.url.to_string(),
                    found_on_page_url: page_url.to_string(),
                    found_on_page_title: page_title.map(str::to_string),
                    status_code: status,
                    error_reason: reason,
                    anchor_text: link.anchor_text,
                })
            }
        })
        .collect()
}
