//! Payload handed to the result reporter once a run has a verdict.

use crate::{Program, Verdict};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Outcome summary sent for persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct ResultSubmission {
    /// Whether the goal was reached.
    is_win: bool,
    /// Blocks used by the program.
    moves_count: i32,
}

impl ResultSubmission {
    /// Creates a submission.
    pub fn new(is_win: bool, moves_count: i32) -> Self {
        Self {
            is_win,
            moves_count,
        }
    }

    /// Builds the submission for a finished run.
    ///
    /// Only wins and losses are reported; an incomplete run returns `None`.
    /// The move count is the number of blocks in the program, whether or
    /// not every block was evaluated.
    #[instrument(skip(program), fields(len = program.len()))]
    pub fn from_verdict(verdict: &Verdict, program: &Program) -> Option<Self> {
        let is_win = match verdict {
            Verdict::Won => true,
            Verdict::Lost(_) => false,
            Verdict::Incomplete => {
                debug!("Incomplete run is not reported");
                return None;
            }
        };
        let moves_count = i32::try_from(program.len()).unwrap_or(i32::MAX);
        Some(Self::new(is_win, moves_count))
    }
}
