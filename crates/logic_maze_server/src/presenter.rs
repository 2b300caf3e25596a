//! Terminal playback of a run.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use derive_getters::Getters;
use logic_maze::{
    Command, GameSession, Grid, PlayerState, Program, ResultSubmission, SessionError, Verdict,
};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};

use crate::reporter::{ResultReporter, dispatch};

/// Builds a session on the reference maze holding the given commands.
///
/// # Errors
///
/// Returns [`SessionError::Program`] if the commands exceed `max_commands`.
#[instrument(skip(commands), fields(count = commands.len()))]
pub fn load_session(commands: &[Command], max_commands: usize) -> Result<GameSession, SessionError> {
    let mut session =
        GameSession::with_grid(Grid::reference().clone(), Program::with_max_len(max_commands));
    for command in commands {
        session.add_command(*command)?;
    }
    debug!(program = %session.program().compact(), "Session loaded");
    Ok(session)
}

/// Outcome of one presented run.
#[derive(Debug, Getters)]
pub struct Played {
    /// The verdict of the run.
    verdict: Verdict,
    /// Snapshots shown.
    frames: usize,
    /// Handle of the result submission, when one was dispatched.
    report: Option<JoinHandle<()>>,
}

impl Played {
    /// Takes the submission handle, leaving `None`.
    pub fn take_report(&mut self) -> Option<JoinHandle<()>> {
        self.report.take()
    }
}

/// Replays runs frame by frame and hands finished results to a reporter.
#[derive(Clone)]
pub struct Presenter {
    step_delay: Duration,
    reporter: Option<Arc<dyn ResultReporter>>,
}

impl std::fmt::Debug for Presenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Presenter")
            .field("step_delay", &self.step_delay)
            .field("reporting", &self.reporter.is_some())
            .finish()
    }
}

impl Presenter {
    /// Creates a presenter. Without a reporter, results are not submitted.
    pub fn new(step_delay: Duration, reporter: Option<Arc<dyn ResultReporter>>) -> Self {
        Self {
            step_delay,
            reporter,
        }
    }

    /// Runs the session's program and draws every snapshot to `out`.
    ///
    /// # Errors
    ///
    /// Fails if the session cannot start a run or `out` cannot be written.
    #[instrument(skip(self, session, out), fields(program = %session.program().compact()))]
    pub async fn play<W: Write>(
        &self,
        session: &mut GameSession,
        out: &mut W,
    ) -> anyhow::Result<Played> {
        let verdict = session.start_run()?;
        let mut frames = 0;

        while let Some(state) = session.advance() {
            if frames > 0 && !self.step_delay.is_zero() {
                tokio::time::sleep(self.step_delay).await;
            }
            frames += 1;
            draw_frame(out, session.grid(), &state, frames)?;
        }

        writeln!(out, "{}", verdict)?;
        out.flush()?;
        info!(%verdict, frames, "Run presented");

        let report = match (
            &self.reporter,
            ResultSubmission::from_verdict(&verdict, session.program()),
        ) {
            (Some(reporter), Some(submission)) => Some(dispatch(reporter.clone(), submission)),
            _ => None,
        };

        Ok(Played {
            verdict,
            frames,
            report,
        })
    }
}

fn draw_frame<W: Write>(
    out: &mut W,
    grid: &Grid,
    state: &PlayerState,
    frame: usize,
) -> std::io::Result<()> {
    writeln!(out, "step {}: {}", frame - 1, state)?;
    writeln!(out, "{}", grid.render(state))?;
    writeln!(out)?;
    out.flush()
}

/// Writes the reference maze with the token at its start and a legend.
pub fn show_maze<W: Write>(out: &mut W) -> std::io::Result<()> {
    let grid = Grid::reference();
    writeln!(out, "{}", grid.render(&PlayerState::START))?;
    writeln!(out)?;
    writeln!(out, "start {}", PlayerState::START)?;
    for goal in grid.goals() {
        writeln!(out, "goal  {}", goal)?;
    }
    writeln!(out, "legend: . empty  # wall  G goal  ^ > v < token")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_session_respects_cap() {
        let commands = Command::parse_sequence("FFFFFFF").unwrap();
        assert!(load_session(&commands, 6).is_err());
        let session = load_session(&commands, 7).unwrap();
        assert_eq!(session.program().len(), 7);
    }

    #[tokio::test]
    async fn test_play_draws_every_frame() {
        let commands = Command::parse_sequence("FF").unwrap();
        let mut session = load_session(&commands, 6).unwrap();
        let presenter = Presenter::new(Duration::ZERO, None);
        let mut out = Vec::new();

        let played = presenter.play(&mut session, &mut out).await.unwrap();
        assert!(played.verdict().is_loss());
        assert_eq!(*played.frames(), 2);
        assert!(played.report().is_none());

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("step 1: (1, 0) facing"));
        assert!(text.contains("wall collision at (2, 0)"));
    }

    /// Writer that records how much text each flush published.
    #[derive(Default)]
    struct FrameRecorder {
        pending: Vec<u8>,
        flushed: Vec<String>,
    }

    impl Write for FrameRecorder {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.pending.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            let chunk = String::from_utf8_lossy(&self.pending).into_owned();
            self.pending.clear();
            self.flushed.push(chunk);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_play_publishes_each_frame_separately() {
        let commands = Command::parse_sequence("RF").unwrap();
        let mut session = load_session(&commands, 6).unwrap();
        let presenter = Presenter::new(Duration::from_millis(1), None);
        let mut out = FrameRecorder::default();

        let played = presenter.play(&mut session, &mut out).await.unwrap();
        assert_eq!(*played.frames(), 3);
        assert_eq!(out.flushed.len(), 4);
        assert!(out.flushed[0].starts_with("step 0:"));
        assert!(out.flushed[2].starts_with("step 2: (0, 1)"));
        assert_eq!(out.flushed[3].trim(), "Program ended before reaching the goal");
        assert!(out.pending.is_empty());
    }

    #[test]
    fn test_show_maze_marks_start_and_goal() {
        let mut out = Vec::new();
        show_maze(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with(">.#"));
        assert!(text.contains("goal  (7, 7)"));
    }
}
