use crate::connect6::Move;
use crate::error::GameError;
use std::str::FromStr;

/// A text frame received from a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    NewGame,
    Resign,
    Move(Move),
}

impl FromStr for Command {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "NewGame" => Ok(Command::NewGame),
            "Resign" => Ok(Command::Resign),
            other => other.parse::<Move>().map(Command::Move),
        }
    }
}
