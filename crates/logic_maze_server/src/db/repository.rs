//! Database repository for run results.

use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument};

use crate::db::{DbError, DbErrorKind, GameResult, NewGameResult, ResultStats, schema};

/// Schema migrations compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Repository over the `game_results` table.
///
/// Results are only ever inserted and read; there is no update or delete.
#[derive(Debug, Clone)]
pub struct GameResultRepository {
    db_path: String,
}

impl GameResultRepository {
    /// Creates a repository for the database at the given path.
    ///
    /// No connection is opened until the first query.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the path is empty.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn new(db_path: String) -> Result<Self, DbError> {
        if db_path.trim().is_empty() {
            return Err(DbError::new(DbErrorKind::Config, "Database path is empty"));
        }
        info!(path = %db_path, "Creating GameResultRepository");
        Ok(Self { db_path })
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        SqliteConnection::establish(&self.db_path)
            .map_err(|e| {
                DbError::new(
                    DbErrorKind::Connection,
                    format!("Failed to connect to '{}': {}", self.db_path, e),
                )
            })
    }

    /// Applies any pending schema migrations.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the database cannot be opened or a migration
    /// fails.
    #[instrument(skip(self))]
    pub fn run_migrations(&self) -> Result<(), DbError> {
        let mut conn = self.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbError::new(DbErrorKind::Migration, e.to_string()))?;
        info!(count = applied.len(), "Migrations applied");
        Ok(())
    }

    /// Records a finished run.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self, result), fields(moves_count = result.moves_count(), is_win = result.is_win()))]
    pub fn record_result(&self, result: NewGameResult) -> Result<GameResult, DbError> {
        debug!("Recording run result");
        let mut conn = self.connection()?;

        let stored = diesel::insert_into(schema::game_results::table)
            .values(&result)
            .returning(GameResult::as_returning())
            .get_result(&mut conn)?;

        info!(
            result_id = stored.id(),
            moves_count = stored.moves_count(),
            is_win = stored.is_win(),
            "Run result recorded"
        );
        Ok(stored)
    }

    /// Lists the most recent results, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn list_recent(&self, limit: i64) -> Result<Vec<GameResult>, DbError> {
        debug!(limit, "Listing recent results");
        let mut conn = self.connection()?;

        let results = schema::game_results::table
            .order((
                schema::game_results::completed_at.desc(),
                schema::game_results::id.desc(),
            ))
            .limit(limit)
            .select(GameResult::as_select())
            .load(&mut conn)?;

        info!(count = results.len(), "Recent results loaded");
        Ok(results)
    }

    /// Computes win/loss counts and the fewest blocks used in a win.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn get_stats(&self) -> Result<ResultStats, DbError> {
        debug!("Computing result stats");
        let mut conn = self.connection()?;

        let results = schema::game_results::table
            .select(GameResult::as_select())
            .load(&mut conn)?;

        let wins = results.iter().filter(|r| *r.is_win()).count() as i32;
        let total = results.len() as i32;
        let best_win_moves = results
            .iter()
            .filter(|r| *r.is_win())
            .map(|r| *r.moves_count())
            .min();

        let stats = ResultStats::new(total, wins, total - wins, best_win_moves);
        info!(
            total = %total,
            wins = %wins,
            losses = %(total - wins),
            win_rate = %format!("{:.1}%", stats.win_rate()),
            "Result stats computed"
        );
        Ok(stats)
    }
}
