pub mod chess;
pub mod protocol;
pub mod rules;

pub use chess::{Piece, PieceColor, PlayerRole, grid_to_algebraic};
pub use protocol::{ClientEvent, MoveSpec, ServerEvent};
pub use rules::{RulesEngine, ShakmatyRules};
