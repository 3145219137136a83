//! Side panel - connection state, role, side to move and the move log.

use gpui::{App, Div, Entity, div, prelude::*, px, rgb};

use crate::models::BoardModel;
use crate::ui::theme::{
    BOARD_PADDING, BORDER_COLOR, MOVE_LIST_BG, PANEL_BG, STATUS_OFFLINE, STATUS_ONLINE,
    TEXT_PRIMARY, TEXT_SECONDARY,
};

/// Render the side panel for a given board model.
pub fn render_side_panel(model: &Entity<BoardModel>, cx: &App) -> Div {
    let session = model.read(cx).session();

    let (status_text, status_color) = if session.is_connected() {
        ("Connected", STATUS_ONLINE)
    } else {
        ("Disconnected", STATUS_OFFLINE)
    };
    let role_text = session
        .role()
        .map(|role| role.label())
        .unwrap_or("Waiting for role");
    let turn_text = format!("{} to move", session.turn().name());

    // Pair up moves for display: (number, first, second)
    let move_pairs: Vec<(usize, String, Option<String>)> = session
        .move_log()
        .chunks(2)
        .enumerate()
        .map(|(i, chunk)| {
            let first = chunk.first().cloned().unwrap_or_default();
            let second = chunk.get(1).cloned();
            (i + 1, first, second)
        })
        .collect();

    let status = div()
        .flex()
        .flex_col()
        .gap_1()
        .pb_3()
        .child(
            div()
                .flex()
                .items_center()
                .gap_2()
                .child(div().size(px(8.0)).rounded_full().bg(rgb(status_color)))
                .child(div().text_color(rgb(TEXT_SECONDARY)).text_sm().child(status_text)),
        )
        .child(div().text_color(rgb(TEXT_PRIMARY)).child(role_text))
        .child(div().text_color(rgb(TEXT_SECONDARY)).text_sm().child(turn_text));

    let moves_content = if move_pairs.is_empty() {
        div().text_color(rgb(TEXT_SECONDARY)).text_sm().child("No moves yet")
    } else {
        div().flex().flex_col().children(move_pairs.into_iter().map(
            |(move_num, first, second)| {
                div()
                    .flex()
                    .py_1()
                    .child(
                        div()
                            .text_color(rgb(TEXT_SECONDARY))
                            .text_sm()
                            .w(px(40.0))
                            .child(format!("{}.", move_num)),
                    )
                    .child(div().text_color(rgb(TEXT_PRIMARY)).text_sm().flex_1().child(first))
                    .when_some(second, |el, mv| {
                        el.child(div().text_color(rgb(TEXT_PRIMARY)).text_sm().flex_1().child(mv))
                    })
            },
        ))
    };

    let move_list = div()
        .flex_1()
        .flex()
        .flex_col()
        .bg(rgb(MOVE_LIST_BG))
        .border_1()
        .border_color(rgb(BORDER_COLOR))
        .rounded_md()
        .overflow_hidden()
        .child(
            div()
                .p_4()
                .pb_2()
                .text_color(rgb(TEXT_PRIMARY))
                .border_b_1()
                .border_color(rgb(BORDER_COLOR))
                .child("Moves"),
        )
        .child(
            div()
                .id("move-list-scroll")
                .flex_1()
                .overflow_y_scroll()
                .p_4()
                .pt_2()
                .child(moves_content),
        );

    div()
        .size_full()
        .flex()
        .flex_col()
        .bg(rgb(PANEL_BG))
        .p(px(BOARD_PADDING))
        .child(status)
        .child(move_list)
}
