//! Rules engine seam. The session never inspects chess rules itself; it asks
//! a `RulesEngine` for the board, the side to move, and whether a move is legal.

use shakmaty::fen::Fen;
use shakmaty::san::San;
use shakmaty::{CastlingMode, Chess, EnPassantMode, File, Move, Position, Role, Square};

use crate::domain::chess::{Piece, PieceColor, shakmaty_to_color, shakmaty_to_piece, to_square};
use crate::domain::protocol::MoveSpec;
use crate::error::{InvalidMove, SessionError};

/// Snapshot of the board, row 0 = rank 8, col 0 = file a
pub type BoardSnapshot = [[Option<Piece>; 8]; 8];

/// The operations the board controller needs from a chess rules implementation
pub trait RulesEngine {
    /// Current position as an 8x8 grid
    fn board(&self) -> BoardSnapshot;
    /// Play a move if legal, returning its SAN. Leaves the position untouched on failure.
    fn play(&mut self, mv: &MoveSpec) -> Result<String, InvalidMove>;
    /// Side to move
    fn turn(&self) -> PieceColor;
    /// Replace the whole position from a FEN string
    fn load(&mut self, fen: &str) -> Result<(), SessionError>;
    /// Current position as FEN
    fn fen(&self) -> String;
}

/// Rules engine backed by shakmaty
#[derive(Clone, Debug, Default)]
pub struct ShakmatyRules {
    position: Chess,
}

impl ShakmatyRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find the legal move a from/to/promotion request refers to
    fn find_move(&self, mv: &MoveSpec) -> Result<Move, InvalidMove> {
        let from_sq = parse_square(&mv.from)?;
        let to_sq = parse_square(&mv.to)?;
        let promotion = match mv.promotion.as_deref() {
            Some(p) => Some(parse_promotion(p)?),
            None => None,
        };

        for m in &self.position.legal_moves() {
            let matches = match m {
                Move::Normal {
                    from,
                    to,
                    promotion: move_promotion,
                    ..
                } => {
                    *from == from_sq
                        && *to == to_sq
                        && (move_promotion.is_none() || *move_promotion == promotion)
                }
                Move::EnPassant { from, to } => *from == from_sq && *to == to_sq,
                Move::Castle { king, rook } => {
                    // king dragged onto its destination (g/c file) or onto its own rook
                    let king_dest = if rook.file() == File::H {
                        Square::from_coords(File::G, rook.rank())
                    } else {
                        Square::from_coords(File::C, rook.rank())
                    };
                    *king == from_sq && (to_sq == king_dest || to_sq == *rook)
                }
                Move::Put { .. } => false,
            };

            if matches {
                return Ok(m.clone());
            }
        }

        Err(InvalidMove::Illegal {
            from: mv.from.clone(),
            to: mv.to.clone(),
        })
    }
}

impl RulesEngine for ShakmatyRules {
    fn board(&self) -> BoardSnapshot {
        let mut grid = [[None; 8]; 8];
        for (row, cells) in grid.iter_mut().enumerate() {
            for (col, cell) in cells.iter_mut().enumerate() {
                *cell = self
                    .position
                    .board()
                    .piece_at(to_square(row, col))
                    .map(shakmaty_to_piece);
            }
        }
        grid
    }

    fn play(&mut self, mv: &MoveSpec) -> Result<String, InvalidMove> {
        let m = self.find_move(mv)?;
        let san = San::from_move(&self.position, m.clone()).to_string();
        // legal by construction, so play cannot fail
        match self.position.clone().play(m) {
            Ok(next) => {
                self.position = next;
                Ok(san)
            }
            Err(_) => Err(InvalidMove::Illegal {
                from: mv.from.clone(),
                to: mv.to.clone(),
            }),
        }
    }

    fn turn(&self) -> PieceColor {
        shakmaty_to_color(self.position.turn())
    }

    fn load(&mut self, fen: &str) -> Result<(), SessionError> {
        let invalid = |reason: String| SessionError::InvalidPosition {
            fen: fen.to_string(),
            reason,
        };
        let parsed: Fen = fen.trim().parse().map_err(|e| invalid(format!("{}", e)))?;
        let position: Chess = parsed
            .into_position(CastlingMode::Standard)
            .map_err(|e| invalid(format!("{}", e)))?;
        self.position = position;
        Ok(())
    }

    fn fen(&self) -> String {
        Fen::from_position(&self.position, EnPassantMode::Legal).to_string()
    }
}

fn parse_square(name: &str) -> Result<Square, InvalidMove> {
    name.parse::<Square>()
        .map_err(|_| InvalidMove::MalformedSquare(name.to_string()))
}

fn parse_promotion(code: &str) -> Result<Role, InvalidMove> {
    let unknown = || InvalidMove::UnknownPromotion(code.to_string());
    let mut chars = code.chars();
    let (Some(c), None) = (chars.next(), chars.next()) else {
        return Err(unknown());
    };
    match Role::from_char(c.to_ascii_lowercase()) {
        Some(role @ (Role::Queen | Role::Rook | Role::Bishop | Role::Knight)) => Ok(role),
        _ => Err(unknown()),
    }
}
