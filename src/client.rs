use crate::config::Config;
use crate::error::TransportError;
use crate::messages::{ConnectionId, EventReceiver, HubMessage};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::http::StatusCode;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{WebSocketStream, accept_hdr_async};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

type WsWriter = SplitSink<WebSocketStream<TcpStream>, Message>;
type WsReader = SplitStream<WebSocketStream<TcpStream>>;

const MAX_IDENTITY_LEN: usize = 64;

/// Drives one websocket connection from handshake to close.
///
/// The connection gets a reader (this task) and a writer task. Whichever
/// stops first ends the connection, and the hub is always told.
pub async fn handle_client(
    stream: TcpStream,
    addr: SocketAddr,
    hub_tx: mpsc::UnboundedSender<HubMessage>,
    config: Arc<Config>,
) {
    let mut requested_identity = None;
    let callback = |request: &Request, response: Response| -> Result<Response, ErrorResponse> {
        if request.uri().path() != config.ws_path {
            let mut not_found = ErrorResponse::new(Some(String::from("Not Found")));
            *not_found.status_mut() = StatusCode::NOT_FOUND;
            return Err(not_found);
        }
        requested_identity = request.uri().query().and_then(identity_from_query);
        Ok(response)
    };
    let socket = match accept_hdr_async(stream, callback).await {
        Ok(socket) => socket,
        Err(e) => {
            warn!("Websocket handshake with {} failed: {}", addr, e);
            return;
        }
    };

    let conn_id = Uuid::new_v4();
    let identity = requested_identity.unwrap_or_else(|| Uuid::new_v4().to_string());
    let (outbound_tx, outbound_rx) = mpsc::channel(config.outbound_capacity);
    if hub_tx
        .send(HubMessage::register(conn_id, identity.clone(), outbound_tx))
        .is_err()
    {
        error!("Session hub is gone, refusing {}", addr);
        return;
    }
    info!("Client {} ({}) connected from {}", conn_id, identity, addr);

    let (ws_writer, mut ws_reader) = socket.split();
    let mut write_task = tokio::spawn(handle_client_writer(conn_id, ws_writer, outbound_rx));

    let result = tokio::select! {
        result = read_commands(conn_id, &mut ws_reader, &hub_tx) => result,
        _ = &mut write_task => Ok(()),
    };
    match result {
        Ok(()) => info!("Client {} disconnected", conn_id),
        Err(e) => warn!("Client {} transport failure: {}", conn_id, e),
    }

    let _ = hub_tx.send(HubMessage::Unregister { conn_id });
    write_task.abort();

    debug!("Client {} cleanup complete", conn_id);
}

async fn read_commands(
    conn_id: ConnectionId,
    reader: &mut WsReader,
    hub_tx: &mpsc::UnboundedSender<HubMessage>,
) -> Result<(), TransportError> {
    while let Some(frame) = reader.next().await {
        match frame? {
            Message::Text(text) => {
                debug!("Client {} sent {:?}", conn_id, text.as_str());
                if hub_tx
                    .send(HubMessage::command(conn_id, text.as_str()))
                    .is_err()
                {
                    break;
                }
            }
            Message::Close(_) => break,
            _ => {}
        }
    }
    Ok(())
}

/// Drains the connection's outbound queue onto the socket. The queue closes
/// when the hub drops the session.
async fn handle_client_writer(conn_id: ConnectionId, mut writer: WsWriter, mut rx: EventReceiver) {
    if let Err(e) = write_events(&mut writer, &mut rx).await {
        error!("Failed to write to client {}: {}", conn_id, e);
    }
    let _ = writer.send(Message::Close(None)).await;
}

async fn write_events(writer: &mut WsWriter, rx: &mut EventReceiver) -> Result<(), TransportError> {
    while let Some(event) = rx.recv().await {
        let json = event.to_json()?;
        writer.send(Message::Text(json.into())).await?;
    }
    Ok(())
}

/// Reads the `id` parameter of a query string, if it is a usable identity.
fn identity_from_query(query: &str) -> Option<String> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "id")
        .map(|(_, value)| value)
        .filter(|value| {
            !value.is_empty()
                && value.len() <= MAX_IDENTITY_LEN
                && value
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        })
        .map(str::to_string)
}
