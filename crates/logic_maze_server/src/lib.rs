//! Results server and terminal client for Logic Maze.
//!
//! The game rules live in the `logic_maze` crate. This crate adds what
//! surrounds them:
//!
//! - **Persistence** ([`GameResultRepository`]): append-only SQLite store
//! - **REST API** ([`api::router`]): submit and read results
//! - **Reporting** ([`HttpReporter`], [`dispatch`]): fire-and-forget
//!   submission from the player side
//! - **Presentation** ([`Presenter`]): frame-by-frame terminal playback
//! - **Configuration** ([`Config`]): TOML file, environment, CLI flags

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod api;
pub mod cli;
mod config;
mod db;
mod presenter;
mod reporter;

pub use config::{
    ClientConfig, Config, ConfigError, DATABASE_URL_ENV, SERVER_URL_ENV, ServerConfig,
};
pub use db::{
    DbError, DbErrorKind, GameResult, GameResultRepository, MIGRATIONS, NewGameResult, ResultStats,
};
pub use presenter::{Played, Presenter, load_session, show_maze};
pub use reporter::{HttpReporter, ReportError, ResultReporter, dispatch};
