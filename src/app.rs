//! Application setup and window creation.

use std::sync::mpsc::Receiver;

use gpui::{App, Bounds, WindowBounds, WindowOptions, prelude::*, px, size};
use gpui_component::Root;
use tracing::error;

use crate::models::{BoardModel, ConnectionHandle, TransportEvent};
use crate::ui::views::ChessBoardView;

/// Initialize and run the board client window
pub fn run(cx: &mut App, connection: ConnectionHandle, events: Receiver<TransportEvent>) {
    gpui_component::init(cx);

    // One board session per window
    let model = cx.new(|cx| BoardModel::new(connection, events, cx));

    let bounds = Bounds::centered(None, size(px(900.0), px(600.0)), cx);
    let opened = cx.open_window(
        WindowOptions {
            window_bounds: Some(WindowBounds::Windowed(bounds)),
            ..Default::default()
        },
        |window, cx| {
            let view = cx.new(|cx| ChessBoardView::new(model, cx));
            cx.new(|cx| Root::new(view, window, cx))
        },
    );

    if let Err(e) = opened {
        error!(error = %e, "failed to open window");
        cx.quit();
    }
}
