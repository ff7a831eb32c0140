use url::Url;

/// List of tracking query parameters ignored when comparing URLs
const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "fbclid",
    "gclid",
    "mc_eid",
];

/// Computes the key under which two resource URLs are considered duplicates
///
/// # Normalization Steps
///
/// 1. Drop the scheme (http and https variants collapse)
/// 2. Lowercase the host and remove a `www.` prefix
/// 3. Keep an explicit port
/// 4. Normalize path:
///    - Remove dot segments (. and ..)
///    - Collapse repeated slashes
///    - Remove trailing slash (except for root /)
/// 5. Drop the fragment
/// 6. Remove tracking query parameters and sort the rest
///
/// # Examples
///
/// ```
/// use roadmap_scout::url::dedup_key;
/// use url::Url;
///
/// let a = Url::parse("http://WWW.Example.com/guide/?utm_source=x#intro").unwrap();
/// let b = Url::parse("https://example.com/guide").unwrap();
/// assert_eq!(dedup_key(&a), dedup_key(&b));
/// ```
pub fn dedup_key(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default().to_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);

    let mut key = match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    };
    key.push_str(&normalize_path(url.path()));

    let params = filter_and_sort_query_params(url);
    if !params.is_empty() {
        let query_string = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");
        key.push('?');
        key.push_str(&query_string);
    }

    key
}

/// Normalizes a URL path by removing dot segments and trailing slashes
fn normalize_path(path: &str) -> String {
    if path.is_empty() {
        return "/".to_string();
    }

    // Split path into segments and normalize
    let segments: Vec<&str> = path.split('/').collect();
    let mut normalized_segments: Vec<&str> = Vec::new();

    for segment in segments {
        match segment {
            // Skip empty segments (from multiple slashes) and current directory markers
            "" | "." => continue,
            // Parent directory - pop the last segment if possible
            ".." => {
                if !normalized_segments.is_empty() {
                    normalized_segments.pop();
                }
            }
            // Regular segment
            _ => normalized_segments.push(segment),
        }
    }

    // Reconstruct path
    if normalized_segments.is_empty() {
        return "/".to_string();
    }

    let result = format!("/{}", normalized_segments.join("/"));

    // Remove trailing slash unless it's the root
    if result.len() > 1 && result.ends_with('/') {
        result[..result.len() - 1].to_string()
    } else {
        result
    }
}

/// Filters out tracking parameters and sorts remaining query parameters
fn filter_and_sort_query_params(url: &Url) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !is_tracking_param(key))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    // Sort by key
    params.sort_by(|a, b| a.0.cmp(&b.0));

    params
}

/// Checks if a query parameter is a tracking parameter
fn is_tracking_param(key: &str) -> bool {
    // Check exact matches
    if TRACKING_PARAMS.contains(&key) {
        return true;
    }

    // Check for utm_* prefix (catches any utm parameter)
    if key.starts_with("utm_") {
        return true;
    }

    false
}
