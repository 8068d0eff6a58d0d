use crate::UrlError;
use url::Url;

/// Schemes that never point at a fetchable document
const NON_FETCHABLE_PREFIXES: &[&str] = &["javascript:", "mailto:", "tel:", "data:"];

/// Parses an analysis target into an absolute HTTP(S) URL
///
/// # Arguments
///
/// * `target` - The URL string supplied by the caller
///
/// # Returns
///
/// * `Ok(Url)` - Parsed URL with the fragment removed
/// * `Err(UrlError)` - Not a URL, not HTTP(S), or missing a host
///
/// # Examples
///
/// ```
/// use sumi_scout::url::parse_target_url;
///
/// let url = parse_target_url(" https://Clinic.example/#top ").unwrap();
/// assert_eq!(url.as_str(), "https://clinic.example/");
/// assert!(parse_target_url("ftp://clinic.example/").is_err());
/// ```
pub fn parse_target_url(target: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(target.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    url.set_fragment(None);
    Ok(url)
}

/// Resolves a link href against the page it was found on
///
/// Returns None if the link should be excluded:
/// - empty and fragment-only hrefs (`#section`)
/// - javascript:, mailto:, tel: schemes and data: URIs
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
///
/// The fragment of the resolved URL is dropped so `/about#team` and `/about`
/// name the same document.
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if NON_FETCHABLE_PREFIXES
        .iter()
        .any(|prefix| lowered.starts_with(prefix))
    {
        return None;
    }

    let mut resolved = base_url.join(href).ok()?;
    if resolved.scheme() != "http" && resolved.scheme() != "https" {
        return None;
    }

    resolved.set_fragment(None);
    Some(resolved)
}
