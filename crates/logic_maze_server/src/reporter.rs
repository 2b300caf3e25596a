//! Client side of result submission.
//!
//! Reporting is a one-way notification after a run settles. Failures are
//! logged and dropped; they never reach gameplay.

use std::sync::Arc;

use async_trait::async_trait;
use derive_more::{Display, Error, From};
use logic_maze::ResultSubmission;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::db::GameResult;

/// Why a submission did not produce a stored record.
#[derive(Debug, Display, Error, From)]
pub enum ReportError {
    /// The request could not be sent or the response body was unreadable.
    #[display("Transport error: {}", _0)]
    Transport(reqwest::Error),

    /// The server answered with a non-success status.
    #[display("Server rejected result with status {}: {}", status, body)]
    #[from(ignore)]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Response body, as text.
        body: String,
    },
}

/// Destination for finished-run results.
#[async_trait]
pub trait ResultReporter: Send + Sync {
    /// Submits one result and returns the stored record.
    async fn submit(&self, submission: ResultSubmission) -> Result<GameResult, ReportError>;
}

/// Reporter posting to the results REST API.
#[derive(Debug, Clone)]
pub struct HttpReporter {
    base_url: String,
    client: reqwest::Client,
}

impl HttpReporter {
    /// Creates a reporter for the server at `base_url`.
    #[instrument(skip_all, fields(base_url = %base_url))]
    pub fn new(base_url: String) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        debug!("Creating HTTP reporter");
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// Endpoint results are posted to.
    pub fn endpoint(&self) -> String {
        format!("{}/api/results", self.base_url)
    }
}

#[async_trait]
impl ResultReporter for HttpReporter {
    #[instrument(skip(self), fields(endpoint = %self.endpoint()))]
    async fn submit(&self, submission: ResultSubmission) -> Result<GameResult, ReportError> {
        debug!("Posting result");
        let response = self
            .client
            .post(self.endpoint())
            .json(&submission)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ReportError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let stored: GameResult = response.json().await?;
        info!(result_id = stored.id(), "Result stored by server");
        Ok(stored)
    }
}

/// Submits a result on a detached task.
///
/// Gameplay never needs to await the handle; it is returned so callers
/// that care (tests, a shutting-down CLI) can.
#[instrument(skip(reporter))]
pub fn dispatch(reporter: Arc<dyn ResultReporter>, submission: ResultSubmission) -> JoinHandle<()> {
    tokio::spawn(async move {
        match reporter.submit(submission).await {
            Ok(stored) => debug!(result_id = stored.id(), "Result reported"),
            Err(e) => warn!(error = %e, "Failed to report result"),
        }
    })
}
