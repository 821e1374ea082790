use super::hub::{HubOptions, SessionHub};
use crate::messages::HubMessage;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// The hub actor: the only task that touches game and session state.
///
/// Messages are handled one at a time in arrival order. The task ends once
/// every sender has been dropped.
pub async fn hub_task(mut rx: mpsc::UnboundedReceiver<HubMessage>, options: HubOptions) {
    let mut hub = SessionHub::new(options);

    info!(
        "Session hub started (turn order enforced: {})",
        options.enforce_turn_order
    );

    while let Some(msg) = rx.recv().await {
        hub.handle(msg);
    }
    debug!("Session hub stopped");
}
