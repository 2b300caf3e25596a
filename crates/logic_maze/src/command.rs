//! Command symbols a program is built from.
//!
//! Commands are plain data: they describe the player's intent and are only
//! given meaning by the engine.

use crate::ProgramError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::instrument;

/// One queued instruction for the token.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    strum::EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum Command {
    /// Quarter turn counter-clockwise, in place.
    #[serde(rename = "LEFT")]
    #[strum(serialize = "LEFT", serialize = "L", serialize = "TURN_LEFT")]
    TurnLeft,
    /// Quarter turn clockwise, in place.
    #[serde(rename = "RIGHT")]
    #[strum(serialize = "RIGHT", serialize = "R", serialize = "TURN_RIGHT")]
    TurnRight,
    /// One step in the current heading.
    #[serde(rename = "FORWARD")]
    #[strum(serialize = "FORWARD", serialize = "F", serialize = "MOVE_FORWARD")]
    MoveForward,
}

impl Command {
    /// Name used on the wire and in listings.
    pub fn label(self) -> &'static str {
        match self {
            Command::TurnLeft => "LEFT",
            Command::TurnRight => "RIGHT",
            Command::MoveForward => "FORWARD",
        }
    }

    /// Single-letter form used in compact program strings.
    pub fn short(self) -> char {
        match self {
            Command::TurnLeft => 'L',
            Command::TurnRight => 'R',
            Command::MoveForward => 'F',
        }
    }

    /// Parses a command from its label or single-letter form.
    ///
    /// # Errors
    ///
    /// Returns [`ProgramError::InvalidCommand`] for unrecognised text.
    #[instrument]
    pub fn parse(s: &str) -> Result<Self, ProgramError> {
        Command::from_str(s.trim()).map_err(|_| ProgramError::InvalidCommand(s.to_string()))
    }

    /// Parses a whole program string.
    ///
    /// Accepts either separated names (`"RIGHT, FORWARD"`, `"r f f"`) or a
    /// compact run of letters (`"RFFL"`).
    ///
    /// # Errors
    ///
    /// Returns [`ProgramError::InvalidCommand`] for the first unrecognised
    /// token.
    #[instrument]
    pub fn parse_sequence(s: &str) -> Result<Vec<Self>, ProgramError> {
        let tokens: Vec<&str> = s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
            .collect();

        let mut commands = Vec::new();
        for token in tokens {
            match Self::parse(token) {
                Ok(command) => commands.push(command),
                Err(err) => {
                    // A compact run like "RFFL" is a sequence of single letters.
                    let letters = token
                        .chars()
                        .map(|c| Self::parse(&c.to_string()))
                        .collect::<Result<Vec<_>, _>>()
                        .map_err(|_| err)?;
                    commands.extend(letters);
                }
            }
        }
        Ok(commands)
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_labels_and_letters() {
        assert_eq!(Command::parse("forward"), Ok(Command::MoveForward));
        assert_eq!(Command::parse("L"), Ok(Command::TurnLeft));
        assert_eq!(Command::parse(" r "), Ok(Command::TurnRight));
        assert_eq!(Command::parse("turn_left"), Ok(Command::TurnLeft));
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            Command::parse("jump"),
            Err(ProgramError::InvalidCommand("jump".to_string()))
        );
    }

    #[test]
    fn test_parse_sequence_compact() {
        let commands = Command::parse_sequence("RFFL").expect("valid program");
        assert_eq!(
            commands,
            vec![
                Command::TurnRight,
                Command::MoveForward,
                Command::MoveForward,
                Command::TurnLeft
            ]
        );
    }

    #[test]
    fn test_parse_sequence_separated() {
        let commands = Command::parse_sequence("right, forward left").expect("valid program");
        assert_eq!(
            commands,
            vec![Command::TurnRight, Command::MoveForward, Command::TurnLeft]
        );
    }

    #[test]
    fn test_parse_sequence_reports_bad_token() {
        assert_eq!(
            Command::parse_sequence("F, FX"),
            Err(ProgramError::InvalidCommand("FX".to_string()))
        );
    }

    #[test]
    fn test_serde_uses_wire_names() {
        let json = serde_json::to_string(&Command::MoveForward).expect("serialize");
        assert_eq!(json, "\"FORWARD\"");
    }
}
