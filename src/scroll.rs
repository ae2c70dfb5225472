//! Selection and scroll position of the carousel.

/// Result of a move request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// At an edge, or a move was already accepted this cycle.
    Rejected,
    /// The selection moved inside the current window.
    Moved,
    /// The selection moved and dragged the window with it.
    WindowShifted,
}

impl MoveOutcome {
    pub fn shifted(self) -> bool {
        self == MoveOutcome::WindowShifted
    }
}

/// `(selected, first_visible)` over `count` items, with the selection always
/// inside `[first_visible, first_visible + page_size)`.
///
/// At most one move is accepted between two calls to [`ScrollState::begin_cycle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollState {
    count: usize,
    page_size: usize,
    selected: usize,
    first_visible: usize,
    moved_this_cycle: bool,
}

impl ScrollState {
    /// A page size larger than the list is clamped to the list length.
    pub fn new(count: usize, page_size: usize) -> Self {
        let page_size = if count == 0 { 0 } else { page_size.clamp(1, count) };
        Self {
            count,
            page_size,
            selected: 0,
            first_visible: 0,
            moved_this_cycle: false,
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Effective number of visible items.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn first_visible(&self) -> usize {
        self.first_visible
    }

    /// Indices currently on screen.
    pub fn visible(&self) -> std::ops::Range<usize> {
        self.first_visible..self.first_visible + self.page_size
    }

    pub fn has_hidden_before(&self) -> bool {
        self.first_visible > 0
    }

    pub fn has_hidden_after(&self) -> bool {
        self.first_visible + self.page_size < self.count
    }

    /// Start a new input cycle; re-arms the single move.
    pub fn begin_cycle(&mut self) {
        self.moved_this_cycle = false;
    }

    pub fn move_left(&mut self) -> MoveOutcome {
        if self.moved_this_cycle || self.selected == 0 {
            return MoveOutcome::Rejected;
        }
        self.selected -= 1;
        self.moved_this_cycle = true;
        if self.selected < self.first_visible {
            self.first_visible -= 1;
            return MoveOutcome::WindowShifted;
        }
        MoveOutcome::Moved
    }

    pub fn move_right(&mut self) -> MoveOutcome {
        if self.moved_this_cycle || self.selected + 1 >= self.count {
            return MoveOutcome::Rejected;
        }
        self.selected += 1;
        self.moved_this_cycle = true;
        if self.selected >= self.first_visible + self.page_size {
            self.first_visible += 1;
            return MoveOutcome::WindowShifted;
        }
        MoveOutcome::Moved
    }
}
