//! Windowed cache controller.
//!
//! Given the visible window `[first_visible, first_visible + page_size)`,
//! every item gets a target tier by its distance from the window:
//!
//! ```text
//!   evict | cached (before) | decoded (window +/- decode_margin) | cached (after) | evict
//! ```
//!
//! and is driven to it.  Memory is always released before the file is
//! deleted, and a failure on one item never stops the scan.

use crate::item::{Item, Tier};
use crate::pipeline::ImagePipeline;

/// Widths of the bands around the visible window, in items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowPolicy {
    /// Items before the window kept on disk.
    pub prefetch_before: usize,
    /// Items after the window kept on disk.
    pub prefetch_after: usize,
    /// Items on either side of the window kept decoded.
    pub decode_margin: usize,
}

impl Default for WindowPolicy {
    fn default() -> Self {
        Self {
            prefetch_before: 2,
            prefetch_after: 2,
            decode_margin: 0,
        }
    }
}

/// Tier the item at `index` should be in for the given window.
pub fn target_tier(
    index: usize,
    first_visible: usize,
    page_size: usize,
    policy: &WindowPolicy,
) -> Tier {
    let last_visible = (first_visible + page_size).saturating_sub(1);

    let (distance, band) = if index < first_visible {
        (first_visible - index, policy.prefetch_before)
    } else if index > last_visible {
        (index - last_visible, policy.prefetch_after)
    } else {
        return Tier::DecodedInMemory;
    };

    if distance <= policy.decode_margin {
        Tier::DecodedInMemory
    } else if distance <= band {
        Tier::CachedOnDisk
    } else {
        Tier::Unfetched
    }
}

/// Outcome of one pass over the items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub decoded: usize,
    pub cached: usize,
    pub evicted: usize,
    /// Keys of items that could not reach their target tier.
    pub failed: Vec<i64>,
}

/// Drive every item to its target tier for the window.
pub fn apply_window(
    items: &mut [Item],
    first_visible: usize,
    page_size: usize,
    policy: &WindowPolicy,
    pipeline: &ImagePipeline,
) -> ScanReport {
    let mut report = ScanReport::default();

    for (index, item) in items.iter_mut().enumerate() {
        let target = target_tier(index, first_visible, page_size, policy);
        let outcome = match target {
            Tier::DecodedInMemory => item.decode_to_memory(pipeline),
            Tier::CachedOnDisk => {
                item.evict_from_memory();
                item.cache_to_disk(pipeline)
            }
            Tier::Unfetched => {
                item.evict_from_memory();
                item.evict_from_disk()
            }
        };

        match outcome {
            Ok(()) => match target {
                Tier::DecodedInMemory => report.decoded += 1,
                Tier::CachedOnDisk => report.cached += 1,
                Tier::Unfetched => report.evicted += 1,
            },
            Err(e) => {
                tracing::warn!(key = item.key(), index, %target, error = %e, "could not reach target tier");
                report.failed.push(item.key());
            }
        }
    }

    tracing::info!(
        first_visible,
        decoded = report.decoded,
        cached = report.cached,
        evicted = report.evicted,
        failed = report.failed.len(),
        "window scan"
    );
    report
}
