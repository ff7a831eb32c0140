//! Resource extraction from rendered search result pages
//!
//! Each resource kind has its own markup rule: a container selector (which is
//! also the marker the browser waits for), a title selector and a link
//! selector, all relative to the container. These follow the current markup
//! of the public search pages and break when that markup changes.

use crate::model::{dedupe_and_cap, Resource, ResourceKind};
use crate::url::resolve_link;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Kind-specific extraction rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultMarkup {
    /// One element per search result; also the readiness marker
    pub container: &'static str,
    pub title: &'static str,
    pub link: &'static str,
    /// Provenance label for extracted resources
    pub source: &'static str,
}

impl ResultMarkup {
    pub fn for_kind(kind: ResourceKind) -> Self {
        match kind {
            ResourceKind::Article => Self {
                container: "div.tF2Cxc",
                title: "h3",
                link: "a[href]",
                source: "Google Search",
            },
            ResourceKind::Video => Self {
                container: "ytd-video-renderer",
                title: "#video-title",
                link: "#video-title[href]",
                source: "YouTube",
            },
        }
    }
}

/// Extracts up to `kind.cap()` resources from a rendered results page
///
/// Results missing a title or a usable link are skipped, relative links are
/// resolved against `page_url`, and duplicate URLs are dropped.
///
/// # Example
///
/// ```
/// use roadmap_scout::providers::extract_resources;
/// use roadmap_scout::ResourceKind;
/// use url::Url;
///
/// let html = r#"<div class="tF2Cxc"><a href="https://doc.rust-lang.org/book/"><h3>The Book</h3></a></div>"#;
/// let page = Url::parse("https://www.google.com/search?q=rust").unwrap();
/// let found = extract_resources(html, &page, ResourceKind::Article);
/// assert_eq!(found[0].title(), "The Book");
/// ```
pub fn extract_resources(html: &str, page_url: &Url, kind: ResourceKind) -> Vec<Resource> {
    let markup = ResultMarkup::for_kind(kind);
    let document = Html::parse_document(html);

    let (Ok(container), Ok(title), Ok(link)) = (
        Selector::parse(markup.container),
        Selector::parse(markup.title),
        Selector::parse(markup.link),
    ) else {
        return Vec::new();
    };

    let mut resources = Vec::new();
    for item in document.select(&container) {
        let Some(title_text) = item.select(&title).next().map(element_text) else {
            continue;
        };

        let Some(href) = item
            .select(&link)
            .next()
            .and_then(|element| element.value().attr("href"))
        else {
            continue;
        };

        let Some(url) = resolve_link(href, page_url) else {
            continue;
        };

        match Resource::new(&title_text, url.as_str(), kind, markup.source) {
            Ok(resource) => resources.push(resource),
            Err(e) => tracing::debug!(%url, error = %e, "Skipping scraped result"),
        }
    }

    dedupe_and_cap(resources, kind.cap())
}

/// Visible text of an element, whitespace-collapsed, falling back to its
/// `title` attribute
fn element_text(element: ElementRef<'_>) -> String {
    let text = element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ");

    if text.is_empty() {
        element.value().attr("title").unwrap_or_default().to_string()
    } else {
        text
    }
}
