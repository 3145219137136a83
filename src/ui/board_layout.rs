//! Board layout calculations - sizing and pixel to square mapping.

use crate::ui::theme::{BOARD_PADDING, PIECE_SCALE};
use gpui::{Pixels, Size};

/// Geometry of the board inside its panel
#[derive(Clone, Copy, Debug)]
pub struct BoardLayout {
    pub panel_size: Size<Pixels>,
    /// Black's view: rank 1 at the top, file h on the left
    pub flipped: bool,
}

impl BoardLayout {
    pub fn new(panel_size: Size<Pixels>, flipped: bool) -> Self {
        Self {
            panel_size,
            flipped,
        }
    }

    /// Calculate square size from measured panel dimensions
    pub fn square_size(&self) -> f32 {
        let panel_width: f32 = self.panel_size.width.into();
        let panel_height: f32 = self.panel_size.height.into();
        let available = (panel_width - BOARD_PADDING * 2.0).min(panel_height - BOARD_PADDING * 2.0);
        (available / 8.0).max(30.0)
    }

    pub fn piece_size(&self) -> f32 {
        self.square_size() * PIECE_SCALE
    }

    pub fn board_total_size(&self) -> f32 {
        self.square_size() * 8.0
    }

    /// Board row/col (row 0 = rank 8) under a panel position, honoring orientation
    pub fn square_at(&self, x: f32, y: f32) -> Option<(usize, usize)> {
        let board_x = x - BOARD_PADDING;
        let board_y = y - BOARD_PADDING;
        if board_x < 0.0 || board_y < 0.0 {
            return None;
        }

        let square_size = self.square_size();
        let display_col = (board_x / square_size) as usize;
        let display_row = (board_y / square_size) as usize;
        if display_row > 7 || display_col > 7 {
            return None;
        }

        if self.flipped {
            Some((7 - display_row, 7 - display_col))
        } else {
            Some((display_row, display_col))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpui::px;

    // 8 squares of 50px plus padding on both sides
    fn layout(flipped: bool) -> BoardLayout {
        BoardLayout::new(
            Size {
                width: px(440.0),
                height: px(440.0),
            },
            flipped,
        )
    }

    #[test]
    fn test_square_size() {
        assert_eq!(layout(false).square_size(), 50.0);
        assert_eq!(layout(false).board_total_size(), 400.0);
    }

    #[test]
    fn test_square_at() {
        let layout = layout(false);
        assert_eq!(layout.square_at(21.0, 21.0), Some((0, 0)));
        assert_eq!(layout.square_at(419.0, 419.0), Some((7, 7)));
        assert_eq!(layout.square_at(75.0, 125.0), Some((2, 1)));
    }

    #[test]
    fn test_square_at_flipped() {
        let layout = layout(true);
        // top-left corner shows h1 for black
        assert_eq!(layout.square_at(21.0, 21.0), Some((7, 7)));
        assert_eq!(layout.square_at(419.0, 419.0), Some((0, 0)));
        assert_eq!(layout.square_at(75.0, 125.0), Some((5, 6)));
    }

    #[test]
    fn test_outside_board() {
        let layout = layout(false);
        assert_eq!(layout.square_at(5.0, 100.0), None);
        assert_eq!(layout.square_at(100.0, 430.0), None);
    }

    #[test]
    fn test_minimum_square_size() {
        let tiny = BoardLayout::new(
            Size {
                width: px(100.0),
                height: px(100.0),
            },
            false,
        );
        assert_eq!(tiny.square_size(), 30.0);
    }
}
