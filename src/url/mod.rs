//! URL handling module for Roadmap-Scout
//!
//! This module provides validation of resource URLs, resolution of links found
//! in scraped result pages, and the normalized key used to deduplicate
//! resources that point at the same page.

mod normalize;
mod resolve;

pub use normalize::dedup_key;
pub use resolve::{parse_resource_url, resolve_link};
