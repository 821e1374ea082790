use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

use crate::messages::ServerEvent;

/// Identifies one live connection. Several connections may share an identity.
pub type ConnectionId = Uuid;

pub type EventSender = mpsc::Sender<Arc<ServerEvent>>;
pub type EventReceiver = mpsc::Receiver<Arc<ServerEvent>>;

/// Everything the hub actor consumes, in arrival order.
#[derive(Debug)]
pub enum HubMessage {
    Register {
        conn_id: ConnectionId,
        identity: String,
        outbound: EventSender,
    },
    Unregister {
        conn_id: ConnectionId,
    },
    Command {
        conn_id: ConnectionId,
        raw: String,
    },
    /// Answered after every earlier message has been handled.
    Status {
        reply: oneshot::Sender<HubStatus>,
    },
}

impl HubMessage {
    pub fn register(conn_id: ConnectionId, identity: String, outbound: EventSender) -> Self {
        Self::Register {
            conn_id,
            identity,
            outbound,
        }
    }

    pub fn command(conn_id: ConnectionId, raw: impl Into<String>) -> Self {
        Self::Command {
            conn_id,
            raw: raw.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubStatus {
    pub sessions: usize,
    pub seats: [Option<String>; 2],
    pub finished: bool,
    pub state: String,
}

#[cfg(test)]
impl HubStatus {
    pub fn seat_of(&self, identity: &str) -> crate::hub::Seat {
        use crate::hub::Seat;

        match self.seats.iter().position(|s| s.as_deref() == Some(identity)) {
            Some(0) => Seat::PlayerOne,
            Some(_) => Seat::PlayerTwo,
            None => Seat::Spectator,
        }
    }
}
