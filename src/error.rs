//! Error types for move validation, position loading and the wire protocol.

use thiserror::Error;

/// A move the rules engine refused to play
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidMove {
    #[error("malformed square {0:?}")]
    MalformedSquare(String),
    #[error("unknown promotion piece {0:?}")]
    UnknownPromotion(String),
    #[error("illegal move {from}{to}")]
    Illegal { from: String, to: String },
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("invalid position {fen:?}: {reason}")]
    InvalidPosition { fen: String, reason: String },
}

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("unknown player role {0:?}")]
    UnknownRole(String),
}
