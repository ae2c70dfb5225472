pub mod actions;
pub mod events;
pub mod state;
pub mod terminal;
pub mod ui;

pub use actions::process_state;
pub use events::{apply_command, command_for, handle_event, Command};
pub use state::AppState;
pub use terminal::{restore_terminal, setup_terminal};
pub use ui::render;
