use crate::messages::{ConnectionId, EventSender, ServerEvent};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::warn;

/// Outbound queues of every live session.
///
/// Sends never wait: a session whose queue is full or closed is removed on
/// the spot and returned to the caller so the hub can forget it too.
#[derive(Debug, Default)]
pub struct SessionBroadcaster {
    senders: HashMap<ConnectionId, EventSender>,
}

impl SessionBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_session(&mut self, conn_id: ConnectionId, sender: EventSender) {
        self.senders.insert(conn_id, sender);
    }

    pub fn remove_session(&mut self, conn_id: ConnectionId) {
        self.senders.remove(&conn_id);
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.senders.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.senders.is_empty()
    }

    #[must_use]
    pub fn send_to(&mut self, conn_id: ConnectionId, event: ServerEvent) -> Vec<ConnectionId> {
        let Some(sender) = self.senders.get(&conn_id) else {
            return Vec::new();
        };
        if Self::try_deliver(conn_id, sender, Arc::new(event)) {
            return Vec::new();
        }
        self.senders.remove(&conn_id);
        vec![conn_id]
    }

    #[must_use]
    pub fn broadcast(&mut self, event: ServerEvent) -> Vec<ConnectionId> {
        let event = Arc::new(event);
        let failed: Vec<ConnectionId> = self
            .senders
            .iter()
            .filter(|(conn_id, sender)| !Self::try_deliver(**conn_id, sender, event.clone()))
            .map(|(conn_id, _)| *conn_id)
            .collect();
        for conn_id in &failed {
            self.senders.remove(conn_id);
        }
        failed
    }

    fn try_deliver(conn_id: ConnectionId, sender: &EventSender, event: Arc<ServerEvent>) -> bool {
        match sender.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                warn!("Outbound queue full for connection {}, dropping it", conn_id);
                false
            }
            Err(TrySendError::Closed(_)) => false,
        }
    }
}
