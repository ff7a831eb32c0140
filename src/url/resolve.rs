use crate::ResourceError;
use url::Url;

/// Parses a resource URL, accepting only absolute http(s) URLs
///
/// # Examples
///
/// ```
/// use roadmap_scout::url::parse_resource_url;
///
/// assert!(parse_resource_url("https://doc.rust-lang.org/book/").is_ok());
/// assert!(parse_resource_url("/watch?v=abc").is_err());
/// assert!(parse_resource_url("javascript:void(0)").is_err());
/// ```
pub fn parse_resource_url(raw: &str) -> Result<Url, ResourceError> {
    let url = Url::parse(raw.trim()).map_err(|_| ResourceError::InvalidUrl(raw.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(ResourceError::UnsupportedScheme(other.to_string())),
    }

    if url.host_str().is_none() {
        return Err(ResourceError::InvalidUrl(raw.to_string()));
    }

    Ok(url)
}

/// Resolves an href found on a result page to an absolute URL
///
/// Search result pages sometimes wrap outbound links in a `/url?q=<target>`
/// redirect on their own host; the target is unwrapped when present. The same
/// path on any other host is left alone.
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - fragment-only anchors
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    let absolute = base_url.join(href).ok()?;

    let unwrapped = if absolute.path() == "/url" && absolute.host_str() == base_url.host_str() {
        absolute
            .query_pairs()
            .find(|(key, _)| key == "q" || key == "url")
            .and_then(|(_, value)| Url::parse(&value).ok())
    } else {
        None
    };
    let target = unwrapped.unwrap_or(absolute);

    match target.scheme() {
        "http" | "https" => Some(target),
        _ => None,
    }
}
