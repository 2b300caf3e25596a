//! Single-player game session: program editing plus trace playback.
//!
//! The engine computes a whole run at once. The session is the caller layer
//! that turns it into something a UI can animate: it hands out one snapshot
//! per [`GameSession::advance`] and refuses edits or a second run until the
//! playback has been consumed or abandoned.

use crate::{run, Command, Grid, PlayerState, Program, SessionError, Verdict};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Status shown to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum SessionStatus {
    /// Editing the program; no run in progress.
    Idle,
    /// A trace is being played back.
    Running,
    /// The last run reached the goal.
    Won,
    /// The last run collided.
    Lost,
}

#[derive(Debug, Clone)]
struct Playback {
    snapshots: std::vec::IntoIter<PlayerState>,
    verdict: Verdict,
}

/// One player's game: the grid, the program being built and the token.
#[derive(Debug, Clone)]
pub struct GameSession {
    grid: Grid,
    program: Program,
    player: PlayerState,
    status: SessionStatus,
    playback: Option<Playback>,
    last_verdict: Option<Verdict>,
}

impl GameSession {
    /// Creates a session on the reference maze.
    #[instrument]
    pub fn new() -> Self {
        Self::with_grid(Grid::reference().clone(), Program::new())
    }

    /// Creates a session on a custom grid with the given (usually empty)
    /// program.
    #[instrument(skip(grid, program), fields(width = grid.width(), height = grid.height()))]
    pub fn with_grid(grid: Grid, program: Program) -> Self {
        info!(max_commands = program.max_len(), "Creating game session");
        Self {
            grid,
            program,
            player: PlayerState::START,
            status: SessionStatus::Idle,
            playback: None,
            last_verdict: None,
        }
    }

    /// Queues a command.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Busy`] during playback and
    /// [`SessionError::Program`] when the program is full.
    #[instrument(skip(self), fields(status = %self.status))]
    pub fn add_command(&mut self, command: Command) -> Result<(), SessionError> {
        self.ensure_not_running()?;
        self.program.push(command)?;
        Ok(())
    }

    /// Empties the program and puts the token back at the start.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Busy`] during playback.
    #[instrument(skip(self))]
    pub fn clear(&mut self) -> Result<(), SessionError> {
        self.ensure_not_running()?;
        self.program.clear();
        self.reset()
    }

    /// Puts the token back at the start, keeping the program.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Busy`] during playback.
    #[instrument(skip(self))]
    pub fn reset(&mut self) -> Result<(), SessionError> {
        self.ensure_not_running()?;
        self.player = PlayerState::START;
        self.status = SessionStatus::Idle;
        debug!("Session reset");
        Ok(())
    }

    /// Runs the program and begins playback of its trace.
    ///
    /// The verdict is decided here, before any snapshot is shown.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Busy`] if a playback is in progress and
    /// [`SessionError::EmptyProgram`] if there is nothing to run.
    #[instrument(skip(self), fields(program = %self.program.compact()))]
    pub fn start_run(&mut self) -> Result<Verdict, SessionError> {
        self.ensure_not_running()?;
        if self.program.is_empty() {
            warn!("Run requested with an empty program");
            return Err(SessionError::EmptyProgram);
        }

        let (trace, verdict) = run(&self.program, &self.grid);
        info!(%verdict, snapshots = trace.len(), "Run computed, starting playback");

        self.player = PlayerState::START;
        self.status = SessionStatus::Running;
        self.last_verdict = Some(verdict);
        self.playback = Some(Playback {
            snapshots: trace.into_iter(),
            verdict,
        });
        Ok(verdict)
    }

    /// Shows the next snapshot of the playback.
    ///
    /// Returns `None` when no playback is in progress. Emitting the last
    /// snapshot settles the status: `Won`, `Lost`, or back to `Idle` when
    /// the program ran out.
    #[instrument(skip(self))]
    pub fn advance(&mut self) -> Option<PlayerState> {
        let playback = self.playback.as_mut()?;
        let snapshot = playback.snapshots.next()?;
        let finished = playback.snapshots.len() == 0;
        let verdict = playback.verdict;

        self.player = snapshot;
        if finished {
            self.settle(verdict);
        }
        Some(snapshot)
    }

    /// Stops playback early. The token stays where playback stopped.
    ///
    /// Returns the verdict of the abandoned run, if one was playing.
    #[instrument(skip(self))]
    pub fn abandon(&mut self) -> Option<Verdict> {
        let playback = self.playback.take()?;
        info!(verdict = %playback.verdict, "Playback abandoned");
        self.status = SessionStatus::Idle;
        Some(playback.verdict)
    }

    /// Current token state as last shown.
    pub fn player(&self) -> PlayerState {
        self.player
    }

    /// Current status.
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// The program being built.
    pub fn program(&self) -> &Program {
        &self.program
    }

    /// The grid being played.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Verdict of the most recent run.
    pub fn last_verdict(&self) -> Option<Verdict> {
        self.last_verdict
    }

    /// Returns true while a playback is in progress.
    pub fn is_running(&self) -> bool {
        self.playback.is_some()
    }

    fn ensure_not_running(&self) -> Result<(), SessionError> {
        if self.is_running() {
            warn!("Rejected: run in progress");
            return Err(SessionError::Busy);
        }
        Ok(())
    }

    fn settle(&mut self, verdict: Verdict) {
        self.playback = None;
        self.status = match verdict {
            Verdict::Won => SessionStatus::Won,
            Verdict::Lost(_) => SessionStatus::Lost,
            Verdict::Incomplete => SessionStatus::Idle,
        };
        info!(status = %self.status, "Playback finished");
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ProgramError, MAX_COMMANDS};

    fn session_with(commands: &[Command]) -> GameSession {
        let mut session = GameSession::new();
        for command in commands {
            session.add_command(*command).expect("room left");
        }
        session
    }

    #[test]
    fn test_add_command_respects_cap() {
        let mut session = session_with(&[Command::TurnLeft; MAX_COMMANDS]);
        assert_eq!(
            session.add_command(Command::MoveForward),
            Err(SessionError::Program(ProgramError::TooLong {
                max: MAX_COMMANDS
            }))
        );
    }

    #[test]
    fn test_empty_program_cannot_start() {
        let mut session = GameSession::new();
        assert_eq!(session.start_run(), Err(SessionError::EmptyProgram));
        assert_eq!(session.status(), SessionStatus::Idle);
    }

    #[test]
    fn test_second_run_rejected_during_playback() {
        let mut session = session_with(&[Command::MoveForward, Command::MoveForward]);
        session.start_run().expect("starts");
        assert_eq!(session.status(), SessionStatus::Running);
        assert_eq!(session.start_run(), Err(SessionError::Busy));
        assert_eq!(session.add_command(Command::TurnLeft), Err(SessionError::Busy));
        assert_eq!(session.clear(), Err(SessionError::Busy));
    }

    #[test]
    fn test_playback_settles_to_lost() {
        let mut session = session_with(&[Command::MoveForward, Command::MoveForward]);
        let verdict = session.start_run().expect("starts");
        assert_eq!(verdict.loss_reason(), Some("wall collision"));

        let mut shown = Vec::new();
        while let Some(snapshot) = session.advance() {
            shown.push(snapshot.position);
        }
        assert_eq!(
            shown,
            vec![crate::Position::new(0, 0), crate::Position::new(1, 0)]
        );
        assert_eq!(session.status(), SessionStatus::Lost);
        assert!(!session.is_running());
    }

    #[test]
    fn test_incomplete_returns_to_idle() {
        let mut session = session_with(&[Command::TurnRight]);
        session.start_run().expect("starts");
        while session.advance().is_some() {}
        assert_eq!(session.status(), SessionStatus::Idle);
        assert_eq!(session.last_verdict(), Some(Verdict::Incomplete));
    }

    #[test]
    fn test_abandon_keeps_token_where_it_stopped() {
        let mut session = session_with(&[Command::MoveForward, Command::TurnRight]);
        session.start_run().expect("starts");
        session.advance();
        session.advance();
        assert_eq!(session.abandon(), Some(Verdict::Incomplete));
        assert_eq!(session.status(), SessionStatus::Idle);
        assert_eq!(session.player().position, crate::Position::new(1, 0));
        assert_eq!(session.advance(), None);
    }

    #[test]
    fn test_clear_resets_program_and_token() {
        let mut session = session_with(&[Command::MoveForward]);
        session.start_run().expect("starts");
        while session.advance().is_some() {}
        session.clear().expect("idle");
        assert!(session.program().is_empty());
        assert_eq!(session.player(), PlayerState::START);
        assert_eq!(session.status(), SessionStatus::Idle);
    }
}
