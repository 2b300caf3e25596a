//! Database models for stored run results.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use logic_maze::ResultSubmission;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::db::schema;

/// A stored run result.
#[derive(Debug, Clone, PartialEq, Queryable, Identifiable, Selectable, Getters, Serialize, Deserialize)]
#[diesel(table_name = schema::game_results)]
#[serde(rename_all = "camelCase")]
pub struct GameResult {
    id: i32,
    completed_at: NaiveDateTime,
    moves_count: i32,
    is_win: bool,
}

/// Insertable result; the id and completion time are assigned by the
/// database.
#[derive(Debug, Clone, Copy, Insertable, new, Getters)]
#[diesel(table_name = schema::game_results)]
pub struct NewGameResult {
    moves_count: i32,
    is_win: bool,
}

impl From<ResultSubmission> for NewGameResult {
    fn from(submission: ResultSubmission) -> Self {
        Self::new(*submission.moves_count(), *submission.is_win())
    }
}

/// Aggregate figures over every stored run.
#[derive(Debug, Clone, PartialEq, Getters, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultStats {
    total_runs: i32,
    wins: i32,
    losses: i32,
    win_rate: f64,
    best_win_moves: Option<i32>,
}

impl ResultStats {
    /// Creates aggregate statistics; the win rate is derived.
    #[instrument]
    pub fn new(total_runs: i32, wins: i32, losses: i32, best_win_moves: Option<i32>) -> Self {
        let win_rate = if total_runs == 0 {
            0.0
        } else {
            (wins as f64 / total_runs as f64) * 100.0
        };
        Self {
            total_runs,
            wins,
            losses,
            win_rate,
            best_win_moves,
        }
    }
}
