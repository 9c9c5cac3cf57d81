//! Prompt commands.

use crate::{error::ClientError, reconciler::LocalAction};

/// A line typed at the prompt
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Action(LocalAction),
    Status,
    Quit,
}

impl Command {
    /// Parse `play`, `pause`, `seek <secs>`, `status` or `quit`
    pub fn parse(line: &str) -> Result<Self, ClientError> {
        let mut words = line.split_whitespace();
        let command = match (words.next(), words.next()) {
            (Some("play"), None) => Command::Action(LocalAction::Play),
            (Some("pause"), None) => Command::Action(LocalAction::Pause),
            (Some("seek"), Some(position)) => Command::Action(LocalAction::Seek(
                parse_position(position)?,
            )),
            (Some("status"), None) => Command::Status,
            (Some("quit" | "exit"), None) => Command::Quit,
            _ => return Err(ClientError::InvalidCommand(line.trim().to_string())),
        };

        if words.next().is_some() {
            return Err(ClientError::InvalidCommand(line.trim().to_string()));
        }
        Ok(command)
    }
}

fn parse_position(value: &str) -> Result<f64, ClientError> {
    match value.parse::<f64>() {
        Ok(position) if position.is_finite() && position >= 0.0 => Ok(position),
        _ => Err(ClientError::InvalidCommand(format!(
            "seek position must be a non-negative number of seconds, got '{}'",
            value
        ))),
    }
}
