//! Chess board view - the board with drag-and-drop piece movement.

use gpui::{
    Context, Div, Entity, MouseButton, MouseDownEvent, MouseMoveEvent, MouseUpEvent, Pixels,
    SharedString, Subscription, Window, canvas, div, prelude::*, px, rgb, rgba,
};
use gpui_component::button::{Button, ButtonVariants};
use gpui_component::resizable::{h_resizable, resizable_panel};

use crate::models::BoardModel;
use crate::ui::components::{render_piece, render_square};
use crate::ui::theme::{
    ALERT_BG, ALERT_SCRIM, BOARD_PADDING, BORDER_COLOR, INITIAL_LEFT_PANEL, INITIAL_RIGHT_PANEL,
    PANEL_BG, TEXT_PRIMARY,
};
use crate::ui::views::render_side_panel;

/// The main chess board view that observes a BoardModel
pub struct ChessBoardView {
    model: Entity<BoardModel>,
    _subscription: Subscription,
}

impl ChessBoardView {
    pub fn new(model: Entity<BoardModel>, cx: &mut Context<Self>) -> Self {
        let _subscription = cx.observe(&model, |_, _, cx| cx.notify());
        Self {
            model,
            _subscription,
        }
    }
}

impl Render for ChessBoardView {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let model = self.model.clone();
        let model_down = model.clone();
        let model_move = model.clone();
        let model_up = model.clone();
        let model_up_out = model.clone();
        let model_measure = model.clone();

        let board_model = self.model.read(cx);
        let session = board_model.session();
        let layout = board_model.layout();
        let grid = session.grid();
        let drag = session.drag();
        let dragging_from = drag.map(|d| (d.from_row, d.from_col));
        let alert = session.alert().map(|m| SharedString::from(m.to_string()));

        let square_size = layout.square_size();
        let piece_size = layout.piece_size();
        let board_total_size = layout.board_total_size();

        // Floating piece follows cursor during drag
        let floating_piece = drag.zip(board_model.pointer).map(|(d, (x, y))| {
            div()
                .absolute()
                .left(px(x - square_size / 2.0))
                .top(px(y - square_size / 2.0))
                .size(px(square_size))
                .child(render_piece(d.piece, piece_size))
        });

        // Board element with fixed size - always maintains 1:1 aspect ratio
        let board = div()
            .flex_shrink_0()
            .flex()
            .flex_col()
            .w(px(board_total_size))
            .h(px(board_total_size))
            .overflow_hidden()
            .rounded_md()
            .children(grid.rows().map(|row| {
                div().flex().flex_shrink_0().children(row.iter().map(|square| {
                    let is_being_dragged = dragging_from == Some((square.row, square.col));
                    render_square(square, is_being_dragged, square_size, piece_size)
                }))
            }));

        let board_panel_content = div()
            .id("board-panel")
            .relative()
            .size_full()
            .overflow_hidden()
            .bg(rgb(PANEL_BG))
            .p(px(BOARD_PADDING))
            .child(board)
            .when_some(floating_piece, |el, fp| el.child(fp))
            // Mouse down: start drag if the piece under the cursor may move
            .on_mouse_down(
                MouseButton::Left,
                move |ev: &MouseDownEvent, _window, cx| {
                    model_down.update(cx, |board, cx| {
                        if board.pick_up(ev.position.x.into(), ev.position.y.into()) {
                            cx.notify();
                        }
                    });
                },
            )
            // Mouse move: update drag position
            .on_mouse_move(move |ev: &MouseMoveEvent, _, cx| {
                model_move.update(cx, |board, cx| {
                    if board.pointer.is_some() {
                        board.pointer = Some((ev.position.x.into(), ev.position.y.into()));
                        cx.notify();
                    }
                });
            })
            // Mouse up: drop the piece and attempt the move
            .on_mouse_up(MouseButton::Left, move |ev: &MouseUpEvent, _window, cx| {
                model_up.update(cx, |board, cx| {
                    if board.session().drag().is_some() {
                        board.put_down(ev.position.x.into(), ev.position.y.into());
                        cx.notify();
                    }
                });
            })
            // Released outside the board panel: the drag ends with no move
            .on_mouse_up_out(MouseButton::Left, move |_: &MouseUpEvent, _window, cx| {
                model_up_out.update(cx, |board, cx| {
                    if board.cancel_drag() {
                        cx.notify();
                    }
                });
            })
            .when_some(alert, |el, message| {
                el.child(render_alert(message, model.clone()))
            });

        // Canvas to measure actual panel size
        let measure_canvas = canvas(
            move |bounds, _window, cx| {
                model_measure.update(cx, |board, cx| {
                    if board.panel_size != bounds.size {
                        board.panel_size = bounds.size;
                        cx.notify();
                    }
                });
            },
            |_, _, _, _| {},
        )
        .absolute()
        .top_0()
        .left_0()
        .size_full();

        let board_panel_with_measure = div()
            .relative()
            .size_full()
            .child(measure_canvas)
            .child(board_panel_content);

        let side_panel_content = render_side_panel(&self.model, cx);

        // Main resizable layout
        div().size_full().child(
            h_resizable("chess-layout")
                .child(
                    resizable_panel()
                        .size(px(INITIAL_LEFT_PANEL))
                        .size_range(px(320.)..px(1200.))
                        .child(board_panel_with_measure),
                )
                .child(
                    resizable_panel()
                        .size(px(INITIAL_RIGHT_PANEL))
                        .size_range(px(150.)..Pixels::MAX)
                        .child(side_panel_content),
                ),
        )
    }
}

/// Modal notice covering the board until the user dismisses it
fn render_alert(message: SharedString, model: Entity<BoardModel>) -> Div {
    div()
        .absolute()
        .top_0()
        .left_0()
        .size_full()
        .flex()
        .items_center()
        .justify_center()
        .bg(rgba(ALERT_SCRIM))
        .child(
            div()
                .flex()
                .flex_col()
                .items_center()
                .gap_3()
                .p_4()
                .bg(rgb(ALERT_BG))
                .border_1()
                .border_color(rgb(BORDER_COLOR))
                .rounded_md()
                .child(div().text_color(rgb(TEXT_PRIMARY)).child(message))
                .child(
                    Button::new("dismiss-alert")
                        .label("OK")
                        .primary()
                        .compact()
                        .on_click(move |_, _, cx| {
                            model.update(cx, |board, cx| {
                                board.session_mut().dismiss_alert();
                                cx.notify();
                            });
                        }),
                ),
        )
}
