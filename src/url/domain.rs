use url::Url;

/// Extracts the domain from a URL
///
/// This function retrieves the host portion of a URL and converts it to lowercase.
/// The port is not part of the domain, so politeness is shared by every port on a host.
///
/// # Arguments
///
/// * `url` - The URL to extract the domain from
///
/// # Returns
///
/// * `Some(String)` - The lowercase domain/host
/// * `None` - If the URL has no host
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sumi_scout::url::extract_domain;
///
/// let url = Url::parse("https://CLINIC.example:8443/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("clinic.example".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns true if both URLs share scheme, host and port
///
/// Page discovery only follows links for which this holds against the seed.
pub fn is_same_site(a: &Url, b: &Url) -> bool {
    a.scheme() == b.scheme()
        && extract_domain(a) == extract_domain(b)
        && a.port_or_known_default() == b.port_or_known_default()
}

/// Returns the `scheme://host[:port]` origin of a URL, without a trailing slash
pub fn origin_of(url: &Url) -> String {
    url.origin().ascii_serialization()
}
