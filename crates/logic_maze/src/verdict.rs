//! Terminal outcome of a run.

use crate::Position;
use serde::{Deserialize, Serialize};

/// Why a forward move was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionKind {
    /// The step would have left the grid.
    Boundary,
    /// The step would have entered a wall cell.
    Wall,
}

impl CollisionKind {
    /// Human-readable reason.
    pub fn reason(self) -> &'static str {
        match self {
            CollisionKind::Boundary => "boundary collision",
            CollisionKind::Wall => "wall collision",
        }
    }
}

/// A rejected forward move. The attempted cell is never committed to the
/// trace; it is only carried here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Collision {
    /// Boundary or wall.
    pub kind: CollisionKind,
    /// The candidate position that was rejected.
    pub attempted: Position,
}

/// Result of running a program to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum Verdict {
    /// The token reached a goal cell.
    Won,
    /// A forward move collided.
    Lost(Collision),
    /// Commands ran out before reaching the goal.
    Incomplete,
}

impl Verdict {
    /// Returns true for [`Verdict::Won`].
    pub fn is_win(&self) -> bool {
        matches!(self, Verdict::Won)
    }

    /// Returns true for [`Verdict::Lost`].
    pub fn is_loss(&self) -> bool {
        matches!(self, Verdict::Lost(_))
    }

    /// The collision behind a loss.
    pub fn collision(&self) -> Option<&Collision> {
        match self {
            Verdict::Lost(collision) => Some(collision),
            _ => None,
        }
    }

    /// The loss reason, e.g. `"wall collision"`.
    pub fn loss_reason(&self) -> Option<&'static str> {
        self.collision().map(|c| c.kind.reason())
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Won => write!(f, "Goal reached"),
            Verdict::Lost(collision) => {
                write!(f, "Lost: {} at {}", collision.kind.reason(), collision.attempted)
            }
            Verdict::Incomplete => write!(f, "Program ended before reaching the goal"),
        }
    }
}
