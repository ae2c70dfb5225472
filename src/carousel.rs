//! Carousel state: the ordered items, the scroll position and the cache
//! window that follows it.

use std::path::Path;

use crate::cache_window::{apply_window, ScanReport, WindowPolicy};
use crate::item::Item;
use crate::models::GameRecord;
use crate::pipeline::ImagePipeline;
use crate::scroll::{MoveOutcome, ScrollState};

pub struct Carousel {
    items: Vec<Item>,
    scroll: ScrollState,
    policy: WindowPolicy,
    pipeline: ImagePipeline,
    /// A window shift happened since the last scan (or no scan ran yet).
    scan_pending: bool,
}

impl Carousel {
    pub fn new(
        records: Vec<GameRecord>,
        cache_dir: &Path,
        page_size: usize,
        policy: WindowPolicy,
        pipeline: ImagePipeline,
    ) -> Self {
        let items: Vec<Item> = records
            .into_iter()
            .map(|r| Item::new(r, cache_dir))
            .collect();
        let scroll = ScrollState::new(items.len(), page_size);
        tracing::info!(games = items.len(), page_size = scroll.page_size(), "carousel ready");
        Self {
            items,
            scroll,
            policy,
            pipeline,
            scan_pending: true,
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn scroll(&self) -> &ScrollState {
        &self.scroll
    }

    pub fn policy(&self) -> &WindowPolicy {
        &self.policy
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn selected_item(&self) -> Option<&Item> {
        self.items.get(self.scroll.selected())
    }

    /// Visible items paired with whether each is the selected one.
    pub fn visible_items(&self) -> impl Iterator<Item = (&Item, bool)> {
        let selected = self.scroll.selected();
        let range = self.scroll.visible();
        let first = range.start;
        self.items[range]
            .iter()
            .enumerate()
            .map(move |(i, item)| (item, first + i == selected))
    }

    pub fn scan_pending(&self) -> bool {
        self.scan_pending
    }

    pub fn begin_cycle(&mut self) {
        self.scroll.begin_cycle();
    }

    pub fn move_left(&mut self) -> MoveOutcome {
        let outcome = self.scroll.move_left();
        self.record(outcome)
    }

    pub fn move_right(&mut self) -> MoveOutcome {
        let outcome = self.scroll.move_right();
        self.record(outcome)
    }

    fn record(&mut self, outcome: MoveOutcome) -> MoveOutcome {
        if outcome.shifted() {
            self.scan_pending = true;
        }
        outcome
    }

    /// Re-evaluate every item's tier if the window moved since the last scan.
    pub fn refresh_cache(&mut self) -> Option<ScanReport> {
        if !self.scan_pending {
            return None;
        }
        self.scan_pending = false;
        Some(apply_window(
            &mut self.items,
            self.scroll.first_visible(),
            self.scroll.page_size(),
            &self.policy,
            &self.pipeline,
        ))
    }

    /// Make sure every visible item has a texture, decoding on demand.
    pub fn prepare_visible(&mut self) {
        let range = self.scroll.visible();
        for item in &mut self.items[range] {
            item.texture(&self.pipeline);
        }
    }

    /// Release every item through both tiers and empty the carousel.
    pub fn teardown(&mut self) {
        let mut left_behind = 0;
        for item in &mut self.items {
            if let Err(e) = item.release() {
                tracing::warn!(key = item.key(), error = %e, "could not release game image");
                left_behind += 1;
            }
        }
        tracing::info!(games = self.items.len(), left_behind, "carousel torn down");
        self.items.clear();
        self.scroll = ScrollState::new(0, 0);
    }
}
