//! Logic Maze - unified CLI
//!
//! Plays programs against the reference maze and serves the results API.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use logic_maze::Command as Block;
use logic_maze_server::{
    Config, GameResultRepository, HttpReporter, Presenter, ResultReporter, api,
    cli::{Cli, Command},
    load_session, show_maze,
};
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,logic_maze=debug")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Command::Serve {
            host,
            port,
            db_path,
        } => run_server(config.override_server(host, port, db_path)).await,
        Command::Play {
            program,
            server_url,
            step_ms,
            max_commands,
            offline,
        } => {
            run_play(
                config.override_client(server_url, step_ms),
                &program,
                max_commands,
                offline,
            )
            .await
        }
        Command::Show => {
            show_maze(&mut std::io::stdout().lock())?;
            Ok(())
        }
    }
}

/// Run the results REST server
#[instrument(skip(config))]
async fn run_server(config: Config) -> Result<()> {
    let server = config.server();
    info!(database_url = %server.database_url(), "Opening results database");

    let repo = GameResultRepository::new(server.database_url().clone())?;
    repo.run_migrations()?;

    api::serve(repo, server.host(), *server.port()).await
}

/// Run one program and report the result
#[instrument(skip(config))]
async fn run_play(config: Config, program: &str, max_commands: usize, offline: bool) -> Result<()> {
    let client = config.client();
    let commands = Block::parse_sequence(program).context("Invalid program")?;
    let mut session = load_session(&commands, max_commands)?;

    let reporter: Option<Arc<dyn ResultReporter>> = if offline {
        None
    } else {
        Some(Arc::new(HttpReporter::new(client.server_url().clone())))
    };
    let presenter = Presenter::new(Duration::from_millis(*client.step_delay_ms()), reporter);

    // Unlocked handle: each frame takes the lock only while it is written.
    let mut played = presenter.play(&mut session, &mut std::io::stdout()).await?;

    // Let the submission finish before the runtime shuts down.
    if let Some(handle) = played.take_report() {
        if let Err(e) = handle.await {
            warn!(error = %e, "Report task failed");
        }
    }
    Ok(())
}
