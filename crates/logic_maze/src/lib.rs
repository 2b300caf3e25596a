//! Logic Maze game logic.
//!
//! A player queues a short program of turns and forward moves for a token
//! on a fixed grid, then runs it. The run stops when the token reaches the
//! goal, collides with a wall or the grid edge, or runs out of commands.
//!
//! # Architecture
//!
//! - **Grid** ([`Grid`], [`Cell`]): immutable cell classification and bounds
//! - **Motion** ([`Heading`], [`Position`], [`PlayerState`]): rotation and
//!   displacement tables
//! - **Program** ([`Command`], [`Program`]): bounded command queue
//! - **Engine** ([`Execution`], [`run`]): typestate run machine producing an
//!   [`ExecutionTrace`] and a [`Verdict`]
//! - **Session** ([`GameSession`]): caller-side editing and playback
//!
//! # Example
//!
//! ```
//! use logic_maze::{run, Command, Grid, Program};
//!
//! let program = Program::from_commands([Command::MoveForward, Command::MoveForward], 6)?;
//! let (trace, verdict) = run(&program, Grid::reference());
//!
//! assert_eq!(verdict.loss_reason(), Some("wall collision"));
//! assert_eq!(trace.len(), 2);
//! # Ok::<(), logic_maze::ProgramError>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod command;
mod contracts;
mod engine;
mod error;
mod grid;
mod heading;
mod position;
mod program;
mod report;
mod session;
mod verdict;

pub use command::Command;
pub use contracts::{assert_step_invariants, InBounds, NoWallEntered, SingleStepMotion};
pub use engine::{execute, run, Execution, ExecutionTrace, Idle, RunReport, Running, StepOutcome};
pub use error::{GridError, ProgramError, SessionError};
pub use grid::{Cell, Grid};
pub use heading::Heading;
pub use position::{PlayerState, Position};
pub use program::{Program, MAX_COMMANDS};
pub use report::ResultSubmission;
pub use session::{GameSession, SessionStatus};
pub use verdict::{Collision, CollisionKind, Verdict};
