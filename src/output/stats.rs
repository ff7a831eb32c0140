//! Statistics and listings from the resource store
//!
//! This module backs the `--list` mode: per-kind counts, a per-source
//! breakdown and the stored records themselves.

use crate::model::ResourceKind;
use crate::storage::{ResourceRecord, Storage, StorageResult};
use std::collections::BTreeMap;

/// Resource store summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceStatistics {
    /// Total number of stored resources
    pub total: u64,

    pub articles: u64,

    pub videos: u64,

    /// Count of resources per provenance label
    pub by_source: BTreeMap<String, u64>,
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `storage` - The storage backend to query
///
/// # Returns
///
/// * `Ok(ResourceStatistics)` - Successfully loaded statistics
/// * `Err(StorageError)` - Failed to query statistics
pub fn load_statistics(storage: &dyn Storage) -> StorageResult<ResourceStatistics> {
    let articles = storage.count_resources_by_kind(ResourceKind::Article)?;
    let videos = storage.count_resources_by_kind(ResourceKind::Video)?;

    let mut by_source = BTreeMap::new();
    for record in storage.list_resources()? {
        *by_source.entry(record.source).or_insert(0) += 1;
    }

    Ok(ResourceStatistics {
        total: articles + videos,
        articles,
        videos,
        by_source,
    })
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &ResourceStatistics) {
    println!("=== Resource Statistics ===\n");

    println!("Overview:");
    println!("  Total resources: {}", stats.total);
    println!("  Articles: {}", stats.articles);
    println!("  Videos: {}", stats.videos);
    println!();

    if !stats.by_source.is_empty() {
        println!("By Source:");
        let mut sources: Vec<_> = stats.by_source.iter().collect();
        sources.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

        for (source, count) in sources {
            let percentage = if stats.total > 0 {
                (*count as f64 / stats.total as f64) * 100.0
            } else {
                0.0
            };
            println!("  {}: {} ({:.1}%)", source, count, percentage);
        }
        println!();
    }
}

/// Prints every stored resource, grouped by kind
pub fn print_resources(records: &[ResourceRecord]) {
    for kind in [ResourceKind::Article, ResourceKind::Video] {
        let of_kind: Vec<_> = records.iter().filter(|r| r.kind == kind).collect();
        if of_kind.is_empty() {
            continue;
        }

        println!("{}s ({}):", kind, of_kind.len());
        for record in of_kind {
            println!("  - {}", record.title);
            println!("    {} [{}] {}", record.url, record.source, record.created_at);
        }
        println!();
    }
}
