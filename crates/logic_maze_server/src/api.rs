//! REST API for storing and reading run results.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use derive_more::{Display, Error, From};
use logic_maze::ResultSubmission;
use serde::Deserialize;
use tracing::{debug, error, info, instrument, warn};

use crate::db::{DbError, GameResult, GameResultRepository, NewGameResult, ResultStats};

/// Records returned when no limit is given.
pub const DEFAULT_LIST_LIMIT: i64 = 20;

/// Upper bound on records returned by one listing.
pub const MAX_LIST_LIMIT: i64 = 100;

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    repo: GameResultRepository,
}

impl AppState {
    /// Wraps a repository for sharing across handlers.
    pub fn new(repo: GameResultRepository) -> Self {
        Self { repo }
    }
}

/// Builds the API router.
#[instrument(skip(repo))]
pub fn router(repo: GameResultRepository) -> Router {
    Router::new()
        .route("/api/results", get(list_results).post(create_result))
        .route("/api/results/stats", get(result_stats))
        .route("/health", get(health))
        .with_state(AppState::new(repo))
}

/// Handler failure, rendered as `{ "message": ... }`.
#[derive(Debug, Display, Error, From)]
pub enum ApiError {
    /// The request was well-formed JSON but semantically invalid.
    #[display("{}", _0)]
    #[from(ignore)]
    BadRequest(#[error(not(source))] String),

    /// The repository failed.
    #[display("{}", _0)]
    Storage(DbError),

    /// The blocking task running the query was lost.
    #[display("Background task failed: {}", _0)]
    Task(tokio::task::JoinError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Storage(_) | Self::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        } else {
            warn!(error = %self, "Request rejected");
        }
        let body = Json(serde_json::json!({ "message": self.to_string() }));
        (status, body).into_response()
    }
}

#[instrument(skip(state))]
async fn create_result(
    State(state): State<AppState>,
    Json(submission): Json<ResultSubmission>,
) -> Result<(StatusCode, Json<GameResult>), ApiError> {
    if *submission.moves_count() < 0 {
        return Err(ApiError::BadRequest(
            "movesCount must be zero or greater".to_string(),
        ));
    }

    let repo = state.repo.clone();
    let new_result = NewGameResult::from(submission);
    let stored = tokio::task::spawn_blocking(move || repo.record_result(new_result)).await??;

    info!(result_id = stored.id(), "Result created");
    Ok((StatusCode::CREATED, Json(stored)))
}

/// Query parameters for listing results.
#[derive(Debug, Deserialize)]
struct ListParams {
    limit: Option<i64>,
}

/// Clamps a requested listing size into `1..=MAX_LIST_LIMIT`.
fn effective_limit(requested: Option<i64>) -> i64 {
    requested
        .unwrap_or(DEFAULT_LIST_LIMIT)
        .clamp(1, MAX_LIST_LIMIT)
}

#[instrument(skip(state))]
async fn list_results(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<GameResult>>, ApiError> {
    let limit = effective_limit(params.limit);
    debug!(limit, "Listing results");

    let repo = state.repo.clone();
    let results = tokio::task::spawn_blocking(move || repo.list_recent(limit)).await??;
    Ok(Json(results))
}

#[instrument(skip(state))]
async fn result_stats(State(state): State<AppState>) -> Result<Json<ResultStats>, ApiError> {
    let repo = state.repo.clone();
    let stats = tokio::task::spawn_blocking(move || repo.get_stats()).await??;
    Ok(Json(stats))
}

async fn health() -> &'static str {
    "ok"
}

/// Serves the API until the process is stopped.
#[instrument(skip(repo))]
pub async fn serve(repo: GameResultRepository, host: &str, port: u16) -> anyhow::Result<()> {
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, "Results API listening");
    axum::serve(listener, router(repo)).await?;
    Ok(())
}
