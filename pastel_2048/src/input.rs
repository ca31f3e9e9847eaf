//! Mapping raw key presses and swipes onto game commands.

use serde::{Deserialize, Serialize};

use crate::Direction;

/// A swipe must travel further than this many pixels along its dominant axis.
pub const SWIPE_THRESHOLD: i32 = 40;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Move(Direction),
    Undo,
    NewGame,
    /// Dismiss the win celebration and carry on.
    KeepPlaying,
}

impl From<Direction> for Command {
    fn from(d: Direction) -> Self {
        Command::Move(d)
    }
}

/// Map a DOM-style key name. `ctrl_or_meta` is true when Control or Command is held.
pub fn key_command(key: &str, ctrl_or_meta: bool) -> Option<Command> {
    match key {
        "ArrowUp" => Some(Direction::Up.into()),
        "ArrowDown" => Some(Direction::Down.into()),
        "ArrowLeft" => Some(Direction::Left.into()),
        "ArrowRight" => Some(Direction::Right.into()),
        "z" | "Z" if ctrl_or_meta => Some(Command::Undo),
        _ => None,
    }
}

/// Direction of a swipe from `start` to `end` in screen pixels (y grows downward).
///
/// The axis with the larger absolute delta wins, ties going to the vertical
/// axis; short swipes map to nothing.
pub fn swipe_direction(start: (i32, i32), end: (i32, i32)) -> Option<Direction> {
    let dx = end.0 - start.0;
    let dy = end.1 - start.1;

    if dx.abs() > dy.abs() {
        if dx.abs() <= SWIPE_THRESHOLD {
            None
        } else if dx > 0 {
            Some(Direction::Right)
        } else {
            Some(Direction::Left)
        }
    } else if dy.abs() <= SWIPE_THRESHOLD {
        None
    } else if dy > 0 {
        Some(Direction::Down)
    } else {
        Some(Direction::Up)
    }
}
