use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::state::AppState;

/// Discrete kiosk commands.  Every input device is reduced to these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveLeft,
    MoveRight,
    Quit,
}

/// Translate a terminal event into a command, if it maps to one.
pub fn command_for(event: &Event) -> Option<Command> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => command_for_key(key),
        _ => None,
    }
}

fn command_for_key(key: &KeyEvent) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return (key.code == KeyCode::Char('c')).then_some(Command::Quit);
    }
    match key.code {
        // Keypad 4/6 arrive as plain digits.
        KeyCode::Left | KeyCode::Char('4') | KeyCode::Char('h') => Some(Command::MoveLeft),
        KeyCode::Right | KeyCode::Char('6') | KeyCode::Char('l') => Some(Command::MoveRight),
        KeyCode::Esc | KeyCode::Char('q') => Some(Command::Quit),
        _ => None,
    }
}

/// Apply one command to the state.
pub fn apply_command(command: Command, state: &mut AppState) {
    match command {
        Command::MoveLeft => {
            state.carousel.move_left();
        }
        Command::MoveRight => {
            state.carousel.move_right();
        }
        Command::Quit => state.should_quit = true,
    }
}

/// Main event handler.
pub fn handle_event(event: Event, state: &mut AppState) {
    if let Some(command) = command_for(&event) {
        apply_command(command, state);
    }
}
