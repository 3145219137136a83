//! Theme constants and colors for the chess UI.

use gpui::{Rgba, rgb};

use crate::domain::PieceColor;

// Layout constants
pub const BOARD_PADDING: f32 = 20.0;
pub const PIECE_SCALE: f32 = 0.8; // glyph size relative to square
pub const GHOST_OPACITY: f32 = 0.4;

// Initial panel sizes
pub const INITIAL_LEFT_PANEL: f32 = 540.0;
pub const INITIAL_RIGHT_PANEL: f32 = 280.0;

// Board colors
pub const LIGHT_SQUARE: u32 = 0xEFD9B5;
pub const DARK_SQUARE: u32 = 0xB48764;
pub const WHITE_PIECE: u32 = 0xFAFAFA;
pub const BLACK_PIECE: u32 = 0x1A1A1A;

// Panel colors
pub const PANEL_BG: u32 = 0x2a2a2a;
pub const MOVE_LIST_BG: u32 = 0x1e1e1e;
pub const BORDER_COLOR: u32 = 0x4a4a4a;
pub const TEXT_PRIMARY: u32 = 0xffffff;
pub const TEXT_SECONDARY: u32 = 0x888888;

// Status colors
pub const STATUS_ONLINE: u32 = 0x4ade80;
pub const STATUS_OFFLINE: u32 = 0xf87171;
pub const ALERT_SCRIM: u32 = 0x000000aa; // rgba
pub const ALERT_BG: u32 = 0x3a3a3a;

/// Get the color for a board square from its shade
pub fn square_color(light: bool) -> Rgba {
    if light {
        rgb(LIGHT_SQUARE)
    } else {
        rgb(DARK_SQUARE)
    }
}

pub fn piece_color(color: PieceColor) -> Rgba {
    match color {
        PieceColor::White => rgb(WHITE_PIECE),
        PieceColor::Black => rgb(BLACK_PIECE),
    }
}
