//! Bounded, append-only command queue.

use crate::{Command, ProgramError};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

/// Maximum number of commands in a player-built program.
pub const MAX_COMMANDS: usize = 6;

/// An ordered sequence of commands with a fixed length cap.
///
/// Programs only grow one command at a time or are cleared wholesale; the
/// cap is enforced here so an over-long program never reaches the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawProgram")]
pub struct Program {
    commands: Vec<Command>,
    max_len: usize,
}

/// Unvalidated wire form of [`Program`].
#[derive(Deserialize)]
struct RawProgram {
    commands: Vec<Command>,
    max_len: usize,
}

impl TryFrom<RawProgram> for Program {
    type Error = ProgramError;

    fn try_from(raw: RawProgram) -> Result<Self, Self::Error> {
        Self::from_commands(raw.commands, raw.max_len)
    }
}

impl Program {
    /// Creates an empty program capped at [`MAX_COMMANDS`].
    #[instrument]
    pub fn new() -> Self {
        Self::with_max_len(MAX_COMMANDS)
    }

    /// Creates an empty program with a custom cap.
    #[instrument]
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            commands: Vec::with_capacity(max_len),
            max_len,
        }
    }

    /// Builds a program from a command list, enforcing the cap.
    ///
    /// # Errors
    ///
    /// Returns [`ProgramError::TooLong`] if there are more than `max_len`
    /// commands.
    #[instrument(skip(commands))]
    pub fn from_commands(
        commands: impl IntoIterator<Item = Command>,
        max_len: usize,
    ) -> Result<Self, ProgramError> {
        let mut program = Self::with_max_len(max_len);
        for command in commands {
            program.push(command)?;
        }
        Ok(program)
    }

    /// Appends a command.
    ///
    /// # Errors
    ///
    /// Returns [`ProgramError::TooLong`] if the program is already full.
    #[instrument(skip(self), fields(len = self.commands.len(), max = self.max_len))]
    pub fn push(&mut self, command: Command) -> Result<(), ProgramError> {
        if self.is_full() {
            warn!("Rejected command: program is full");
            return Err(ProgramError::TooLong { max: self.max_len });
        }
        self.commands.push(command);
        debug!(len = self.commands.len(), "Command queued");
        Ok(())
    }

    /// Removes every command.
    #[instrument(skip(self))]
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Returns the queued commands in order.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Number of queued commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns true if no commands are queued.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Returns true once the cap is reached.
    pub fn is_full(&self) -> bool {
        self.commands.len() >= self.max_len
    }

    /// The command cap.
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Compact single-letter listing, e.g. `"RFFL"`.
    pub fn compact(&self) -> String {
        self.commands.iter().map(|c| c.short()).collect()
    }
}

impl Default for Program {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a Program {
    type Item = &'a Command;
    type IntoIter = std::slice::Iter<'a, Command>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_until_full() {
        let mut program = Program::new();
        for _ in 0..MAX_COMMANDS {
            program.push(Command::MoveForward).expect("room left");
        }
        assert!(program.is_full());
        assert_eq!(
            program.push(Command::TurnLeft),
            Err(ProgramError::TooLong { max: MAX_COMMANDS })
        );
        assert_eq!(program.len(), MAX_COMMANDS);
    }

    #[test]
    fn test_clear_empties() {
        let mut program =
            Program::from_commands([Command::TurnRight, Command::MoveForward], 4).expect("fits");
        program.clear();
        assert!(program.is_empty());
        assert_eq!(program.max_len(), 4);
    }

    #[test]
    fn test_from_commands_enforces_cap() {
        let result = Program::from_commands([Command::MoveForward; 3], 2);
        assert_eq!(result, Err(ProgramError::TooLong { max: 2 }));
    }

    #[test]
    fn test_compact_listing() {
        let program = Program::from_commands(
            [Command::TurnRight, Command::MoveForward, Command::TurnLeft],
            MAX_COMMANDS,
        )
        .expect("fits");
        assert_eq!(program.compact(), "RFL");
    }

    #[test]
    fn test_deserialize_enforces_cap() {
        let json = r#"{"commands":["FORWARD","FORWARD","FORWARD","FORWARD","FORWARD","FORWARD","FORWARD","FORWARD"],"max_len":6}"#;
        let err = serde_json::from_str::<Program>(json).expect_err("over-long program");
        assert!(err.to_string().contains('6'), "unexpected error: {err}");
    }

    #[test]
    fn test_deserialize_within_cap() {
        let json = r#"{"commands":["RIGHT","FORWARD"],"max_len":6}"#;
        let program: Program = serde_json::from_str(json).expect("fits");
        assert_eq!(program.compact(), "RF");
        assert_eq!(program.max_len(), MAX_COMMANDS);
    }
}
