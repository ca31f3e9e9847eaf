//! Terminal key bindings.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use pastel_2048::{input::Command, Direction};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Input {
    Command(Command),
    Quit,
}

pub fn map_key(key: KeyEvent) -> Option<Input> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    let command = match key.code {
        KeyCode::Char('c') if ctrl => return Some(Input::Quit),
        KeyCode::Char('q') | KeyCode::Esc => return Some(Input::Quit),
        KeyCode::Char('z') | KeyCode::Char('Z') if ctrl => Command::Undo,

        KeyCode::Up | KeyCode::Char('k') => Direction::Up.into(),
        KeyCode::Down | KeyCode::Char('j') => Direction::Down.into(),
        KeyCode::Left | KeyCode::Char('h') => Direction::Left.into(),
        KeyCode::Right | KeyCode::Char('l') => Direction::Right.into(),

        KeyCode::Char('u') => Command::Undo,
        KeyCode::Char('n') => Command::NewGame,
        KeyCode::Char('c') => Command::KeepPlaying,
        _ => return None,
    };
    Some(Input::Command(command))
}
