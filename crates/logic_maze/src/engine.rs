//! Command-program execution engine.
//!
//! The run lifecycle is a typestate machine:
//!
//! - [`Execution<Idle>`]: built from a program and a grid, nothing evaluated.
//! - [`Execution<Running>`]: at least one command left; [`Execution::step`]
//!   consumes exactly one.
//! - [`RunReport`]: the finished run, always carrying a [`Verdict`].
//!
//! A finished run cannot be stepped again, so commands after the terminal
//! step are never evaluated. The engine has no clock and no suspension
//! points; pacing the trace is left to whoever replays it.

#[cfg(debug_assertions)]
use crate::contracts::assert_step_invariants;
use crate::{Cell, Collision, CollisionKind, Command, Grid, PlayerState, Program, Verdict};
use serde::Serialize;
use std::marker::PhantomData;
use tracing::{debug, info, instrument};

/// Typestate marker: run constructed but not started.
#[derive(Debug, Clone, Copy)]
pub struct Idle;

/// Typestate marker: run in progress with commands remaining.
#[derive(Debug, Clone, Copy)]
pub struct Running;

/// Ordered player snapshots produced by a run, starting with the initial
/// state and holding one entry per committed command.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ExecutionTrace {
    snapshots: Vec<PlayerState>,
}

impl ExecutionTrace {
    /// The snapshots in order.
    pub fn snapshots(&self) -> &[PlayerState] {
        &self.snapshots
    }

    /// Number of snapshots (never zero).
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Always false: a trace holds at least the initial snapshot.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// State before any command ran.
    pub fn initial(&self) -> Option<&PlayerState> {
        self.snapshots.first()
    }

    /// Last committed state.
    pub fn last(&self) -> Option<&PlayerState> {
        self.snapshots.last()
    }

    /// Iterates the snapshots in order.
    pub fn iter(&self) -> std::slice::Iter<'_, PlayerState> {
        self.snapshots.iter()
    }
}

impl IntoIterator for ExecutionTrace {
    type Item = PlayerState;
    type IntoIter = std::vec::IntoIter<PlayerState>;

    fn into_iter(self) -> Self::IntoIter {
        self.snapshots.into_iter()
    }
}

impl<'a> IntoIterator for &'a ExecutionTrace {
    type Item = &'a PlayerState;
    type IntoIter = std::slice::Iter<'a, PlayerState>;

    fn into_iter(self) -> Self::IntoIter {
        self.snapshots.iter()
    }
}

/// A finished run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    trace: ExecutionTrace,
    verdict: Verdict,
    commands_executed: usize,
}

impl RunReport {
    /// The snapshots produced.
    pub fn trace(&self) -> &ExecutionTrace {
        &self.trace
    }

    /// The terminal outcome.
    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    /// Commands evaluated, including a rejected final move.
    pub fn commands_executed(&self) -> usize {
        self.commands_executed
    }

    /// Splits the report into trace and verdict.
    pub fn into_parts(self) -> (ExecutionTrace, Verdict) {
        (self.trace, self.verdict)
    }
}

/// Result of advancing a running execution.
#[derive(Debug)]
pub enum StepOutcome<'a> {
    /// More commands remain.
    Running(Execution<'a, Running>),
    /// The run reached a verdict.
    Finished(RunReport),
}

/// A single run of a program against a grid, phase encoded in `S`.
#[derive(Debug, Clone)]
pub struct Execution<'a, S> {
    grid: &'a Grid,
    commands: &'a [Command],
    cursor: usize,
    player: PlayerState,
    trace: Vec<PlayerState>,
    _phase: PhantomData<S>,
}

impl<'a> Execution<'a, Idle> {
    /// Prepares a run; nothing is evaluated until [`Execution::start`].
    #[instrument(skip(program, grid), fields(commands = program.len()))]
    pub fn new(program: &'a Program, grid: &'a Grid) -> Self {
        Self {
            grid,
            commands: program.commands(),
            cursor: 0,
            player: PlayerState::START,
            trace: Vec::with_capacity(program.len() + 1),
            _phase: PhantomData,
        }
    }

    /// Resets the player to the start state, records the initial snapshot
    /// and begins the run.
    ///
    /// An empty program finishes immediately as [`Verdict::Incomplete`].
    #[instrument(skip(self))]
    pub fn start(mut self) -> StepOutcome<'a> {
        self.player = PlayerState::START;
        self.trace.clear();
        self.trace.push(self.player);
        debug!(start = %self.player, "Run started");

        let running = self.transition::<Running>();
        if running.commands.is_empty() {
            return StepOutcome::Finished(running.finish(Verdict::Incomplete));
        }
        StepOutcome::Running(running)
    }
}

impl<'a> Execution<'a, Running> {
    /// Consumes the next command.
    #[instrument(skip(self), fields(cursor = self.cursor, player = %self.player))]
    pub fn step(mut self) -> StepOutcome<'a> {
        let command = self.commands[self.cursor];
        self.cursor += 1;
        let before = self.player;

        let after = match command {
            Command::TurnLeft => PlayerState::new(before.position, before.heading.rotate_left()),
            Command::TurnRight => PlayerState::new(before.position, before.heading.rotate_right()),
            Command::MoveForward => {
                let candidate = before.position.step(before.heading);
                let kind = match self.grid.cell_at(candidate) {
                    Err(_) => Some(CollisionKind::Boundary),
                    Ok(Cell::Wall) => Some(CollisionKind::Wall),
                    Ok(_) => None,
                };
                if let Some(kind) = kind {
                    debug!(?command, attempted = %candidate, reason = kind.reason(), "Move rejected");
                    let collision = Collision {
                        kind,
                        attempted: candidate,
                    };
                    return StepOutcome::Finished(self.finish(Verdict::Lost(collision)));
                }
                PlayerState::new(candidate, before.heading)
            }
        };

        #[cfg(debug_assertions)]
        assert_step_invariants(self.grid, &before, command, &after);

        self.player = after;
        self.trace.push(after);
        debug!(?command, state = %after, "Step committed");

        if matches!(self.grid.cell_at(after.position), Ok(Cell::Goal)) {
            return StepOutcome::Finished(self.finish(Verdict::Won));
        }
        if self.cursor == self.commands.len() {
            return StepOutcome::Finished(self.finish(Verdict::Incomplete));
        }
        StepOutcome::Running(self)
    }

    /// Commands not yet evaluated.
    pub fn remaining(&self) -> &'a [Command] {
        let commands = self.commands;
        &commands[self.cursor..]
    }

    fn finish(self, verdict: Verdict) -> RunReport {
        info!(
            %verdict,
            commands_executed = self.cursor,
            snapshots = self.trace.len(),
            "Run finished"
        );
        RunReport {
            trace: ExecutionTrace {
                snapshots: self.trace,
            },
            verdict,
            commands_executed: self.cursor,
        }
    }
}

impl<'a, S> Execution<'a, S> {
    /// Current player state.
    pub fn player(&self) -> PlayerState {
        self.player
    }

    /// Snapshots recorded so far.
    pub fn trace(&self) -> &[PlayerState] {
        &self.trace
    }

    /// The grid this run is played on.
    pub fn grid(&self) -> &'a Grid {
        self.grid
    }

    fn transition<T>(self) -> Execution<'a, T> {
        Execution {
            grid: self.grid,
            commands: self.commands,
            cursor: self.cursor,
            player: self.player,
            trace: self.trace,
            _phase: PhantomData,
        }
    }
}

/// Runs a program to completion and returns the full report.
#[instrument(skip(program, grid), fields(program = %program.compact()))]
pub fn execute(program: &Program, grid: &Grid) -> RunReport {
    let mut outcome = Execution::new(program, grid).start();
    loop {
        match outcome {
            StepOutcome::Running(execution) => outcome = execution.step(),
            StepOutcome::Finished(report) => return report,
        }
    }
}

/// Runs a program to completion.
///
/// Deterministic and side-effect free: the same program and grid always
/// yield the same trace and verdict.
pub fn run(program: &Program, grid: &Grid) -> (ExecutionTrace, Verdict) {
    execute(program, grid).into_parts()
}
