use super::state::AppState;

/// Per-frame processing between input and rendering: re-scan the cache
/// window if it moved, then make sure the visible games have textures.
pub fn process_state(state: &mut AppState) {
    if let Some(report) = state.carousel.refresh_cache() {
        state.image_notice = (!report.failed.is_empty())
            .then(|| format!("{} game image(s) unavailable", report.failed.len()));
    }
    state.carousel.prepare_visible();
}
