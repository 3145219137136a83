//! Pure chess domain types and utilities.
//! No GPUI dependencies - this is the domain layer.

use shakmaty::{Color as SColor, File, Rank, Role, Square};

use crate::error::ProtocolError;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PieceKind {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PieceColor {
    White,
    Black,
}

impl PieceColor {
    /// Parse a side code as sent by the server ("w" or "b", any case)
    pub fn from_code(code: &str) -> Result<Self, ProtocolError> {
        match code.trim().to_lowercase().as_str() {
            "w" => Ok(PieceColor::White),
            "b" => Ok(PieceColor::Black),
            _ => Err(ProtocolError::UnknownRole(code.to_string())),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PieceColor::White => "White",
            PieceColor::Black => "Black",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: PieceColor,
}

impl Piece {
    /// Unicode glyph used to draw the piece. The solid set is used for
    /// both sides; the renderer colors it by `color`.
    pub fn glyph(&self) -> &'static str {
        match self.kind {
            PieceKind::Pawn => "\u{265F}",
            PieceKind::Rook => "\u{265C}",
            PieceKind::Knight => "\u{265E}",
            PieceKind::Bishop => "\u{265D}",
            PieceKind::Queen => "\u{265B}",
            PieceKind::King => "\u{265A}",
        }
    }
}

/// The side this client may move, assigned by the server
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PlayerRole {
    Player(PieceColor),
    Spectator,
}

impl PlayerRole {
    /// The color this role is allowed to move, if any
    pub fn color(self) -> Option<PieceColor> {
        match self {
            PlayerRole::Player(color) => Some(color),
            PlayerRole::Spectator => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PlayerRole::Player(PieceColor::White) => "Playing White",
            PlayerRole::Player(PieceColor::Black) => "Playing Black",
            PlayerRole::Spectator => "Spectating",
        }
    }
}

/// Algebraic name of a grid cell (row 0 = rank 8, col 0 = file a)
pub fn grid_to_algebraic(row: usize, col: usize) -> Option<String> {
    if row > 7 || col > 7 {
        return None;
    }
    let file = (b'a' + col as u8) as char;
    let rank = 8 - row;
    Some(format!("{}{}", file, rank))
}

/// Convert row/col (0-indexed, row 0 = rank 8) to shakmaty Square
pub fn to_square(row: usize, col: usize) -> Square {
    let file = File::new(col as u32);
    let rank = Rank::new(7 - row as u32); // row 0 = rank 8, row 7 = rank 1
    Square::from_coords(file, rank)
}

/// Convert shakmaty piece to our domain Piece
pub fn shakmaty_to_piece(piece: shakmaty::Piece) -> Piece {
    let kind = match piece.role {
        Role::Pawn => PieceKind::Pawn,
        Role::Knight => PieceKind::Knight,
        Role::Bishop => PieceKind::Bishop,
        Role::Rook => PieceKind::Rook,
        Role::Queen => PieceKind::Queen,
        Role::King => PieceKind::King,
    };
    Piece {
        kind,
        color: shakmaty_to_color(piece.color),
    }
}

pub fn shakmaty_to_color(color: SColor) -> PieceColor {
    match color {
        SColor::White => PieceColor::White,
        SColor::Black => PieceColor::Black,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_corners() {
        assert_eq!(grid_to_algebraic(0, 0).as_deref(), Some("a8"));
        assert_eq!(grid_to_algebraic(7, 7).as_deref(), Some("h1"));
        assert_eq!(grid_to_algebraic(6, 4).as_deref(), Some("e2"));
    }

    #[test]
    fn test_grid_matches_formula_everywhere() {
        for row in 0..8 {
            for col in 0..8 {
                let name = grid_to_algebraic(row, col).unwrap();
                let expected = format!("{}{}", (b'a' + col as u8) as char, 8 - row);
                assert_eq!(name, expected);
                assert_eq!(to_square(row, col).to_string(), expected);
            }
        }
    }

    #[test]
    fn test_grid_out_of_range() {
        assert_eq!(grid_to_algebraic(8, 0), None);
        assert_eq!(grid_to_algebraic(0, 8), None);
    }

    #[test]
    fn test_color_codes() {
        assert_eq!(PieceColor::from_code("w").unwrap(), PieceColor::White);
        assert_eq!(PieceColor::from_code("B").unwrap(), PieceColor::Black);
        assert!(PieceColor::from_code("x").is_err());
    }

    #[test]
    fn test_spectator_has_no_color() {
        assert_eq!(PlayerRole::Spectator.color(), None);
        assert_eq!(
            PlayerRole::Player(PieceColor::Black).color(),
            Some(PieceColor::Black)
        );
    }
}
