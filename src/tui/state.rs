use crate::carousel::Carousel;
use crate::texture::Texture;

/// Everything the frame loop reads and mutates.
pub struct AppState {
    /// The games, the scroll position and their image cache.
    pub carousel: Carousel,
    /// Full-screen backdrop.
    pub(crate) background: Option<Texture>,
    /// Schedule date shown in the header.
    pub(crate) date: String,
    /// Error message to display.
    pub(crate) error_message: Option<String>,
    /// Outcome of the last cache scan, when some images failed.
    pub(crate) image_notice: Option<String>,
    /// Should the application quit?
    pub should_quit: bool,
}

impl AppState {
    pub fn new(carousel: Carousel, background: Option<Texture>, date: impl Into<String>) -> Self {
        Self {
            carousel,
            background,
            date: date.into(),
            error_message: None,
            image_notice: None,
            should_quit: false,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn image_notice(&self) -> Option<&str> {
        self.image_notice.as_deref()
    }

    /// Clear any error message.
    pub fn clear_error(&mut self) {
        self.error_message = None;
    }

    /// Set an error message.
    pub fn set_error(&mut self, message: String) {
        self.error_message = Some(message);
    }

    /// Release every game image.  The carousel is empty afterwards.
    pub fn shutdown(&mut self) {
        self.carousel.teardown();
        self.background = None;
    }
}
