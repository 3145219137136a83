//! Square rendering component.

use crate::models::SquareView;
use crate::ui::components::render_piece;
use crate::ui::theme::{GHOST_OPACITY, square_color};
use gpui::{Div, div, prelude::*, px};

/// Render a single board square with optional piece
pub fn render_square(
    square: &SquareView,
    is_being_dragged: bool,
    square_size: f32,
    piece_size: f32,
) -> Div {
    div()
        .flex_shrink_0() // never shrink - maintain aspect ratio
        .size(px(square_size))
        .bg(square_color(square.light))
        .flex()
        .items_center()
        .justify_center()
        .when(square.draggable, |el| el.cursor_grab())
        .when_some(square.piece, |el, p| {
            if is_being_dragged {
                // ghost piece on original square
                el.child(render_piece(p, piece_size).opacity(GHOST_OPACITY))
            } else {
                el.child(render_piece(p, piece_size))
            }
        })
}
