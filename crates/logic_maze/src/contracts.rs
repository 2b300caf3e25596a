//! Postconditions checked after every committed engine step.
//!
//! Each check answers one question about a transition
//! `{before} command {after}`. They are cheap and pure; the engine runs
//! them through [`assert_step_invariants`] in debug builds only.

use crate::{Cell, Command, Grid, PlayerState};
use tracing::{instrument, warn};

/// The committed position lies inside the grid.
pub struct InBounds;

impl InBounds {
    /// Checks the invariant.
    #[instrument(skip(grid))]
    pub fn holds(grid: &Grid, after: &PlayerState) -> bool {
        let valid = grid.contains(after.position);
        if !valid {
            warn!(position = %after.position, "Committed position outside grid");
        }
        valid
    }
}

/// A forward move never commits onto a wall.
pub struct NoWallEntered;

impl NoWallEntered {
    /// Checks the invariant.
    #[instrument(skip(grid))]
    pub fn holds(grid: &Grid, command: Command, after: &PlayerState) -> bool {
        if command != Command::MoveForward {
            return true;
        }
        let valid = !matches!(grid.cell_at(after.position), Ok(Cell::Wall));
        if !valid {
            warn!(position = %after.position, "Forward move committed onto a wall");
        }
        valid
    }
}

/// Turns change only the heading; forward moves change only the position,
/// by exactly the heading's displacement.
pub struct SingleStepMotion;

impl SingleStepMotion {
    /// Checks the invariant.
    #[instrument]
    pub fn holds(before: &PlayerState, command: Command, after: &PlayerState) -> bool {
        let valid = match command {
            Command::TurnLeft => {
                after.position == before.position && after.heading == before.heading.rotate_left()
            }
            Command::TurnRight => {
                after.position == before.position && after.heading == before.heading.rotate_right()
            }
            Command::MoveForward => {
                after.heading == before.heading
                    && after.position == before.position.step(before.heading)
            }
        };
        if !valid {
            warn!(%before, %after, ?command, "Transition does not match command");
        }
        valid
    }
}

/// Asserts every step postcondition (panics on violation in debug builds).
#[instrument(skip(grid))]
pub fn assert_step_invariants(
    grid: &Grid,
    before: &PlayerState,
    command: Command,
    after: &PlayerState,
) {
    debug_assert!(InBounds::holds(grid, after), "Committed position outside grid");
    debug_assert!(
        NoWallEntered::holds(grid, command, after),
        "Forward move committed onto a wall"
    );
    debug_assert!(
        SingleStepMotion::holds(before, command, after),
        "Transition does not match command"
    );
}
