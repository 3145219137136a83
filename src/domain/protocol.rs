//! Wire protocol between the board client and the game server.
//!
//! Every WebSocket text frame carries one named event as a JSON object
//! `{"event": "<name>", "data": <payload>}`. Event names match the ones the
//! server already speaks (`move`, `playerRole`, `boardState`, ...).

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::chess::{PieceColor, PlayerRole};
use crate::error::ProtocolError;

/// A move request in algebraic squares, e.g. e2 -> e4 promoting to "q"
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MoveSpec {
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion: Option<String>,
}

impl MoveSpec {
    pub fn new(from: &str, to: &str, promotion: Option<&str>) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            promotion: promotion.map(str::to_string),
        }
    }
}

impl std::fmt::Display for MoveSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(p) = &self.promotion {
            write!(f, "={}", p)?;
        }
        Ok(())
    }
}

/// Events sent from this client to the server
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientEvent {
    /// A locally validated move
    Move(MoveSpec),
    /// Ask the server to push a fresh `boardState`
    RequestBoardState,
}

/// Events pushed by the server
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    /// Side assigned to this client, "w" or "b" (any case)
    PlayerRole(String),
    /// This client only watches
    SpectatorRole,
    /// Authoritative position as FEN
    BoardState(String),
    /// A move played by someone
    Move(MoveSpec),
    /// The server rejected a move this client sent
    InvalidMove(MoveSpec),
}

impl ServerEvent {
    /// Short event name for logging
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::PlayerRole(_) => "playerRole",
            ServerEvent::SpectatorRole => "spectatorRole",
            ServerEvent::BoardState(_) => "boardState",
            ServerEvent::Move(_) => "move",
            ServerEvent::InvalidMove(_) => "invalidMove",
        }
    }
}

/// Interpret a `playerRole` payload
pub fn parse_role(code: &str) -> Result<PlayerRole, ProtocolError> {
    PieceColor::from_code(code).map(PlayerRole::Player)
}

/// Encode an outbound event as a text frame
pub fn encode(event: &ClientEvent) -> Result<String, ProtocolError> {
    Ok(serde_json::to_string(event)?)
}

/// Decode an inbound text frame
pub fn decode(text: &str) -> Result<ServerEvent, ProtocolError> {
    Ok(serde_json::from_str(text)?)
}

/// JSON schema describing both directions of the protocol
pub fn protocol_schema() -> serde_json::Value {
    serde_json::json!({
        "client": schemars::schema_for!(ClientEvent),
        "server": schemars::schema_for!(ServerEvent),
    })
}
