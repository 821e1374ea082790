use serde::Serialize;

use crate::connect6::{Move, Player};
use crate::hub::Seat;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    Error,
    GameState,
    Move,
    Finished,
    CurrentPlayer,
    NewGame,
    Resign,
}

/// Event sent to clients as a JSON text frame.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ServerEvent {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub sender: String,
    #[serde(rename = "type")]
    pub kind: EventType,
    pub content: String,
}

impl ServerEvent {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    fn new(sender: impl Into<String>, kind: EventType, content: String) -> Self {
        Self {
            sender: sender.into(),
            kind,
            content,
        }
    }

    pub fn error(sender: &str, message: impl Into<String>) -> Self {
        Self::new(sender, EventType::Error, message.into())
    }

    /// Snapshot sent privately to a newly connected session.
    pub fn game_state(seat: Seat, state: &str) -> Self {
        Self::new("", EventType::GameState, format!("{},{}", seat.number(), state))
    }

    pub fn move_made(sender: &str, m: Move, mover: Player) -> Self {
        Self::new(
            sender,
            EventType::Move,
            format!("{},{},{}", m.row, m.col, mover.number()),
        )
    }

    pub fn finished(sender: &str, winner: Player) -> Self {
        Self::new(sender, EventType::Finished, winner.number().to_string())
    }

    pub fn current_player(sender: &str, player: Player) -> Self {
        Self::new(sender, EventType::CurrentPlayer, player.number().to_string())
    }

    pub fn new_game(sender: &str, state: String) -> Self {
        Self::new(sender, EventType::NewGame, state)
    }

    pub fn resign(sender: &str, seat: Seat) -> Self {
        Self::new(sender, EventType::Resign, seat.number().to_string())
    }
}
