//! Append-only persistence for run results.

mod error;
mod models;
mod repository;
mod schema; // Diesel generated schema - internal use only

pub use error::{DbError, DbErrorKind};
pub use models::{GameResult, NewGameResult, ResultStats};
pub use repository::{GameResultRepository, MIGRATIONS};
