//! Error types for grid construction, program building and sessions.
//!
//! Collisions are not errors: they are ordinary outcomes of a run and are
//! reported through [`crate::Verdict`].

use crate::Position;
use derive_more::{Display, Error, From};

/// Error raised while building or querying a [`crate::Grid`].
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum GridError {
    /// A position outside the declared dimensions was queried.
    #[display("Position {position} is outside the {width}x{height} grid")]
    OutOfBounds {
        /// The rejected position.
        position: Position,
        /// Grid width.
        width: usize,
        /// Grid height.
        height: usize,
    },

    /// Width or height was zero.
    #[display("Grid dimensions must be non-zero (got {width}x{height})")]
    EmptyDimensions {
        /// Requested width.
        width: usize,
        /// Requested height.
        height: usize,
    },

    /// The cell vector does not match `width * height`.
    #[display("Expected {expected} cells, got {actual}")]
    CellCountMismatch {
        /// `width * height`.
        expected: usize,
        /// Cells supplied.
        actual: usize,
    },

    /// Rows of differing length were supplied.
    #[display("Row {row} has {actual} cells, expected {expected}")]
    RaggedRows {
        /// Offending row index.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        actual: usize,
    },

    /// A character in a text grid is not a known cell symbol.
    #[display("Unknown cell symbol '{symbol}' at row {row}, column {column}")]
    InvalidCell {
        /// The unrecognised character.
        symbol: char,
        /// Row of the character.
        row: usize,
        /// Column of the character.
        column: usize,
    },
}

/// Error raised while building a [`crate::Program`].
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum ProgramError {
    /// Appending would exceed the command cap.
    #[display("Program is full ({max} commands maximum)")]
    TooLong {
        /// The cap that was hit.
        max: usize,
    },

    /// Text did not name a command.
    #[display("Unknown command: '{_0}'")]
    InvalidCommand(#[error(not(source))] String),
}

/// Error raised by [`crate::GameSession`] when an action is not allowed.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error, From)]
pub enum SessionError {
    /// A run is being played back; wait for it to finish or abandon it.
    #[display("A run is already in progress")]
    Busy,

    /// There are no commands to run.
    #[display("Program is empty")]
    EmptyProgram,

    /// The program rejected the edit.
    #[display("{_0}")]
    #[from]
    Program(ProgramError),
}
