use crate::client::handle_client;
use crate::config::Config;
use crate::hub::hub_task;
use crate::messages::{HubMessage, HubStatus};
use anyhow::Context;
use socket2::{SockRef, TcpKeepalive};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

/// The single game hosted by this process: the hub actor plus the accept loop
/// feeding it connections.
pub struct GameServer {
    config: Arc<Config>,
    hub_tx: mpsc::UnboundedSender<HubMessage>,
}

impl GameServer {
    /// Spawns the hub actor. Must be called inside a tokio runtime.
    pub fn new(config: Config) -> Self {
        let (hub_tx, hub_rx) = mpsc::unbounded_channel::<HubMessage>();
        tokio::spawn(hub_task(hub_rx, config.hub_options()));

        Self {
            config: Arc::new(config),
            hub_tx,
        }
    }

    pub async fn run(&self, listener: TcpListener) -> anyhow::Result<()> {
        loop {
            let (socket, addr) = listener.accept().await?;
            debug!("Accepted TCP connection from {}", addr);

            // Configure TCP keep-alive
            let keepalive = TcpKeepalive::new()
                .with_time(Duration::from_secs(10))
                .with_interval(Duration::from_secs(1));
            let sf = SockRef::from(&socket);
            let _ = sf.set_tcp_keepalive(&keepalive);

            tokio::spawn(handle_client(
                socket,
                addr,
                self.hub_tx.clone(),
                self.config.clone(),
            ));
        }
    }

    /// Asks the hub for its state once it has handled everything sent so far.
    pub async fn status(&self) -> anyhow::Result<HubStatus> {
        let (reply, rx) = oneshot::channel();
        self.hub_tx
            .send(HubMessage::Status { reply })
            .context("session hub stopped")?;
        rx.await.context("session hub dropped the status request")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::{SinkExt, StreamExt};
    use serde_json::Value;
    use tokio::net::TcpStream;
    use tokio_tungstenite::tungstenite::Message;
    use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

    type Ws = WebSocketStream<MaybeTlsStream<TcpStream>>;

    async fn start() -> (Arc<GameServer>, String) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = Arc::new(GameServer::new(Config::default()));
        let runner = server.clone();
        tokio::spawn(async move { runner.run(listener).await });
        (server, format!("ws://{}", addr))
    }

    async fn next_event(ws: &mut Ws) -> Value {
        loop {
            let frame = tokio::time::timeout(Duration::from_secs(5), ws.next())
                .await
                .expect("timed out waiting for an event")
                .expect("connection closed")
                .expect("transport error");
            if let Message::Text(text) = frame {
                return serde_json::from_str(text.as_str()).unwrap();
            }
        }
    }

    #[tokio::test]
    async fn test_players_exchange_moves() {
        let (server, base) = start().await;
        let (mut one, _) = connect_async(format!("{}/ws?id=alice", base)).await.unwrap();
        let snapshot = next_event(&mut one).await;
        assert_eq!(snapshot["type"], "GameState");
        assert!(snapshot["content"].as_str().unwrap().starts_with("1,1,0,"));

        let (mut two, _) = connect_async(format!("{}/ws?id=bob", base)).await.unwrap();
        let snapshot = next_event(&mut two).await;
        assert!(snapshot["content"].as_str().unwrap().starts_with("2,1,0,"));

        one.send(Message::Text("9,9".into())).await.unwrap();
        for ws in [&mut one, &mut two] {
            let moved = next_event(ws).await;
            assert_eq!(moved["type"], "Move");
            assert_eq!(moved["sender"], "alice");
            assert_eq!(moved["content"], "9,9,1");
            let turn = next_event(ws).await;
            assert_eq!(turn["type"], "CurrentPlayer");
            assert_eq!(turn["content"], "2");
        }

        two.send(Message::Text("abc,def".into())).await.unwrap();
        let rejected = next_event(&mut two).await;
        assert_eq!(rejected["type"], "Error");

        let status = server.status().await.unwrap();
        assert_eq!(status.sessions, 2);
        assert_eq!(status.seats, [Some("alice".to_string()), Some("bob".to_string())]);
    }

    #[tokio::test]
    async fn test_closing_connection_frees_seat() {
        let (server, base) = start().await;
        let (mut one, _) = connect_async(format!("{}/ws?id=alice", base)).await.unwrap();
        next_event(&mut one).await;
        one.close(None).await.unwrap();

        let mut freed = false;
        for _ in 0..50 {
            if server.status().await.unwrap().seats[0].is_none() {
                freed = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert!(freed);
    }

    #[tokio::test]
    async fn test_wrong_path_is_refused() {
        let (server, base) = start().await;
        assert!(connect_async(format!("{}/elsewhere", base)).await.is_err());
        assert_eq!(server.status().await.unwrap().sessions, 0);
    }
}
