use super::{
    broadcaster::SessionBroadcaster,
    handlers::{CommandContext, HubHandlers},
    seats::SeatTable,
};
use crate::connect6::Connect6;
use crate::messages::{Command, ConnectionId, EventSender, HubMessage, HubStatus, ServerEvent};
use std::collections::HashMap;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HubOptions {
    /// Only accept moves from the session seated as the current turn holder.
    pub enforce_turn_order: bool,
}

// A session's seat is always looked up in the seat table: another connection
// of the same identity may have taken a seat after this one joined.
#[derive(Debug, Clone)]
struct Session {
    identity: String,
}

/// All mutable game and session state. Owned by the hub task alone.
#[derive(Debug)]
pub struct SessionHub {
    game: Connect6,
    seats: SeatTable,
    sessions: HashMap<ConnectionId, Session>,
    broadcaster: SessionBroadcaster,
    options: HubOptions,
}

impl SessionHub {
    pub fn new(options: HubOptions) -> Self {
        Self {
            game: Connect6::new(),
            seats: SeatTable::new(),
            sessions: HashMap::new(),
            broadcaster: SessionBroadcaster::new(),
            options,
        }
    }

    pub fn handle(&mut self, msg: HubMessage) {
        match msg {
            HubMessage::Register {
                conn_id,
                identity,
                outbound,
            } => self.on_connect(conn_id, identity, outbound),
            HubMessage::Unregister { conn_id } => self.on_disconnect(conn_id),
            HubMessage::Command { conn_id, raw } => self.on_command(conn_id, &raw),
            HubMessage::Status { reply } => {
                let _ = reply.send(self.status());
            }
        }
    }

    pub fn on_connect(&mut self, conn_id: ConnectionId, identity: String, outbound: EventSender) {
        let seat = self.seats.assign(&identity);
        info!(
            "Connection {} joined as {} (seat {})",
            conn_id,
            identity,
            seat.number()
        );

        self.sessions.insert(conn_id, Session { identity });
        self.broadcaster.add_session(conn_id, outbound);

        let snapshot = ServerEvent::game_state(seat, &self.game.encode_state());
        let dropped = self.broadcaster.send_to(conn_id, snapshot);
        self.drop_sessions(dropped);
    }

    pub fn on_disconnect(&mut self, conn_id: ConnectionId) {
        let Some(session) = self.sessions.remove(&conn_id) else {
            return;
        };
        self.broadcaster.remove_session(conn_id);

        // The seat stays bound while another connection of the same identity is live
        let identity_still_live = self
            .sessions
            .values()
            .any(|s| s.identity == session.identity);
        if identity_still_live {
            debug!(
                "{} closed one of several connections ({} sessions remain)",
                session.identity,
                self.sessions.len()
            );
            return;
        }
        match self.seats.release(&session.identity) {
            Some(seat) => info!("Player {} ({}) left", seat.number(), session.identity),
            None => info!("Spectator {} left", session.identity),
        }
    }

    pub fn on_command(&mut self, conn_id: ConnectionId, raw: &str) {
        let Some(session) = self.sessions.get(&conn_id) else {
            warn!("Command from unknown connection {}", conn_id);
            return;
        };
        let identity = session.identity.clone();
        let ctx = CommandContext {
            conn_id,
            identity: &identity,
            seat: self.seats.seat_of(&identity),
        };

        let dropped = match raw.parse::<Command>() {
            Ok(Command::NewGame) => {
                HubHandlers::handle_new_game(&mut self.game, &mut self.broadcaster, &ctx)
            }
            Ok(Command::Resign) => {
                HubHandlers::handle_resign(&mut self.game, &mut self.broadcaster, &ctx)
            }
            Ok(Command::Move(m)) => HubHandlers::handle_move(
                &mut self.game,
                &mut self.broadcaster,
                &ctx,
                m,
                self.options.enforce_turn_order,
            ),
            Err(e) => HubHandlers::reject(&mut self.broadcaster, &ctx, e),
        };
        self.drop_sessions(dropped);
    }

    pub fn status(&self) -> HubStatus {
        HubStatus {
            sessions: self.sessions.len(),
            seats: self.seats.bound(),
            finished: self.game.is_finished(),
            state: self.game.encode_state(),
        }
    }

    fn drop_sessions(&mut self, conn_ids: Vec<ConnectionId>) {
        for conn_id in conn_ids {
            warn!("Dropping connection {}", conn_id);
            self.on_disconnect(conn_id);
        }
    }
}
