use crate::hub::hub::SessionHub;
use crate::messages::{ConnectionId, EventReceiver, EventType, ServerEvent};
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

pub fn connect(hub: &mut SessionHub, identity: &str) -> (ConnectionId, EventReceiver) {
    connect_with_capacity(hub, identity, 64)
}

pub fn connect_with_capacity(
    hub: &mut SessionHub,
    identity: &str,
    capacity: usize,
) -> (ConnectionId, EventReceiver) {
    let conn_id = Uuid::new_v4();
    let (tx, rx) = mpsc::channel(capacity);
    hub.on_connect(conn_id, identity.to_string(), tx);
    (conn_id, rx)
}

/// Everything currently queued for a session.
pub fn drain(rx: &mut EventReceiver) -> Vec<Arc<ServerEvent>> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

pub fn contains_event_of_type(events: &[Arc<ServerEvent>], kind: EventType) -> bool {
    events.iter().any(|event| event.kind == kind)
}
