//! Grid coordinates and the token's state.

use crate::Heading;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A cell coordinate: `x` is the column, `y` the row.
///
/// Coordinates are signed so a candidate one step past the edge can be
/// represented and rejected before it is committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[display("({x}, {y})")]
pub struct Position {
    /// Column, 0-indexed from the left.
    pub x: i32,
    /// Row, 0-indexed from the top.
    pub y: i32,
}

impl Position {
    /// Creates a position.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The cell one step away in the given heading.
    #[instrument]
    pub fn step(self, heading: Heading) -> Self {
        let (dx, dy) = heading.displacement();
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Snapshot of the token: where it stands and which way it faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerState {
    /// Current cell.
    pub position: Position,
    /// Current facing.
    pub heading: Heading,
}

impl PlayerState {
    /// Every run begins in the top-left corner facing right.
    pub const START: PlayerState = PlayerState {
        position: Position::new(0, 0),
        heading: Heading::Right,
    };

    /// Creates a player state.
    pub const fn new(position: Position, heading: Heading) -> Self {
        Self { position, heading }
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::START
    }
}

impl std::fmt::Display for PlayerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} facing {}", self.position, self.heading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_can_leave_the_grid() {
        let origin = Position::new(0, 0);
        assert_eq!(origin.step(Heading::Left), Position::new(-1, 0));
        assert_eq!(origin.step(Heading::Up), Position::new(0, -1));
        assert_eq!(origin.step(Heading::Down), Position::new(0, 1));
    }

    #[test]
    fn test_start_state() {
        assert_eq!(PlayerState::default().position, Position::new(0, 0));
        assert_eq!(PlayerState::default().heading.displacement(), (1, 0));
    }
}
