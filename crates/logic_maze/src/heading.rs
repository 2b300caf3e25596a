//! Orientation and motion table.
//!
//! Headings are ordered clockwise starting at `Up`, so a right turn is a
//! step forward in [`Heading::ALL`] and a left turn is a step back.

use serde::{Deserialize, Serialize};
use tracing::instrument;

/// One of the four compass directions the token can face.
///
/// Row 0 is the top of the grid, so `Up` decreases `y`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::EnumIter, strum::Display,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Heading {
    /// Facing row 0.
    Up,
    /// Facing the last column.
    Right,
    /// Facing the last row.
    Down,
    /// Facing column 0.
    Left,
}

impl Heading {
    /// All headings in clockwise order.
    pub const ALL: [Heading; 4] = [Heading::Up, Heading::Right, Heading::Down, Heading::Left];

    /// Index of this heading in [`Heading::ALL`].
    fn index(self) -> usize {
        match self {
            Heading::Up => 0,
            Heading::Right => 1,
            Heading::Down => 2,
            Heading::Left => 3,
        }
    }

    /// Heading after a quarter turn counter-clockwise.
    #[instrument]
    pub fn rotate_left(self) -> Self {
        Self::ALL[(self.index() + 3) % 4]
    }

    /// Heading after a quarter turn clockwise.
    #[instrument]
    pub fn rotate_right(self) -> Self {
        Self::ALL[(self.index() + 1) % 4]
    }

    /// Unit displacement `(dx, dy)` for one step forward.
    #[instrument]
    pub fn displacement(self) -> (i32, i32) {
        match self {
            Heading::Up => (0, -1),
            Heading::Right => (1, 0),
            Heading::Down => (0, 1),
            Heading::Left => (-1, 0),
        }
    }

    /// Single-character glyph used when rendering the token.
    pub fn glyph(self) -> char {
        match self {
            Heading::Up => '^',
            Heading::Right => '>',
            Heading::Down => 'v',
            Heading::Left => '<',
        }
    }
}
