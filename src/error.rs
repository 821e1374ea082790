use thiserror::Error;

/// Errors a command can produce. All of them are reported privately to the
/// session that sent the command and never touch the game state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("Coordinate ({row}, {col}) is outside the board")]
    InvalidCoordinate { row: i64, col: i64 },

    #[error("Space is already taken")]
    CellOccupied,

    #[error("Game is already finished")]
    GameFinished,

    #[error("Malformed command: {0:?}")]
    MalformedCommand(String),

    #[error("It is not your turn")]
    NotYourTurn,

    #[error("Spectators cannot resign")]
    SpectatorCannotResign,
}

/// Failure on a single connection's socket.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("failed to encode event: {0}")]
    Encode(#[from] serde_json::Error),
}
