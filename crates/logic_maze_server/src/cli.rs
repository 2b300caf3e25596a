//! Command-line interface for logic_maze.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Logic Maze - program a token through a maze, one block at a time
#[derive(Parser, Debug)]
#[command(name = "logic_maze")]
#[command(about = "Logic maze player and results server", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the results REST server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,

        /// Path to the database file (created if it doesn't exist)
        #[arg(long)]
        db_path: Option<String>,
    },

    /// Run a program against the reference maze
    Play {
        /// Program as letters ("RFFL") or names ("RIGHT, FORWARD")
        program: String,

        /// Results server URL
        #[arg(long)]
        server_url: Option<String>,

        /// Milliseconds between frames
        #[arg(long)]
        step_ms: Option<u64>,

        /// Override the command cap
        #[arg(long, default_value_t = logic_maze::MAX_COMMANDS)]
        max_commands: usize,

        /// Do not submit the result
        #[arg(long)]
        offline: bool,
    },

    /// Print the reference maze
    Show,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_play() {
        let cli = Cli::try_parse_from(["logic_maze", "play", "RFF", "--offline", "--step-ms", "0"])
            .unwrap();
        match cli.command {
            Command::Play {
                program,
                offline,
                step_ms,
                max_commands,
                server_url,
            } => {
                assert_eq!(program, "RFF");
                assert!(offline);
                assert_eq!(step_ms, Some(0));
                assert_eq!(max_commands, logic_maze::MAX_COMMANDS);
                assert!(server_url.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_serve_with_global_config() {
        let cli = Cli::try_parse_from(["logic_maze", "serve", "--port", "8080", "-c", "maze.toml"])
            .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("maze.toml")));
        assert!(matches!(cli.command, Command::Serve { port: Some(8080), .. }));
    }
}
