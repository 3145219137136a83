//! Board model - the GPUI entity that owns the board session.
//!
//! Architecture:
//! - Socket I/O runs on the connection thread (see `models::transport`)
//! - A GPUI background task polls the transport channel and feeds events
//!   into the session, notifying the views when something arrived

use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::Duration;

use gpui::{AsyncApp, Context, Pixels, Size, Task, WeakEntity, px};
use tracing::info;

use crate::domain::ShakmatyRules;
use crate::models::session::BoardSession;
use crate::models::transport::{ConnectionHandle, TransportEvent};
use crate::ui::BoardLayout;
use crate::ui::theme::INITIAL_LEFT_PANEL;

pub type Session = BoardSession<ShakmatyRules, ConnectionHandle>;

pub struct BoardModel {
    session: Session,
    /// Channel receiver for transport events (polled by background task)
    events: Receiver<TransportEvent>,
    /// Cursor position while a piece is dragged, relative to the window
    pub pointer: Option<(f32, f32)>,
    /// Measured panel size from canvas
    pub panel_size: Size<Pixels>,
    /// Background polling task, kept alive with the model
    _poll_task: Task<()>,
}

impl BoardModel {
    pub fn new(
        connection: ConnectionHandle,
        events: Receiver<TransportEvent>,
        cx: &mut Context<Self>,
    ) -> Self {
        let poll_task = cx.spawn(
            async move |weak_entity: WeakEntity<BoardModel>, cx: &mut AsyncApp| {
                Self::run_event_loop(weak_entity, cx).await;
            },
        );

        Self {
            session: BoardSession::new(ShakmatyRules::new(), connection),
            events,
            pointer: None,
            panel_size: Size {
                width: px(INITIAL_LEFT_PANEL),
                height: px(600.0),
            },
            _poll_task: poll_task,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn layout(&self) -> BoardLayout {
        BoardLayout::new(self.panel_size, self.session.grid().flipped)
    }

    /// Start dragging the piece under a window position
    pub fn pick_up(&mut self, x: f32, y: f32) -> bool {
        let Some((row, col)) = self.layout().square_at(x, y) else {
            return false;
        };
        if self.session.on_drag_start(row, col) {
            self.pointer = Some((x, y));
            true
        } else {
            false
        }
    }

    /// Finish a drag at a window position; off-board drops cancel the drag
    pub fn put_down(&mut self, x: f32, y: f32) {
        self.pointer = None;
        match self.layout().square_at(x, y) {
            Some((row, col)) => self.session.on_drop(row, col),
            None => self.session.on_drag_end(),
        }
    }

    /// Drop whatever is being dragged without attempting a move
    pub fn cancel_drag(&mut self) -> bool {
        let was_dragging = self.session.drag().is_some();
        self.pointer = None;
        self.session.on_drag_end();
        was_dragging
    }

    /// Background event loop that polls the channel and updates the model
    async fn run_event_loop(weak_entity: WeakEntity<BoardModel>, cx: &mut AsyncApp) {
        const POLL_INTERVAL: Duration = Duration::from_millis(16); // ~60fps

        loop {
            cx.background_executor().timer(POLL_INTERVAL).await;

            let should_continue = weak_entity.update(cx, |board, cx| {
                let (had_events, alive) = board.process_pending_events();
                if had_events {
                    cx.notify();
                }
                alive
            });

            match should_continue {
                Ok(true) => continue,
                _ => break,
            }
        }
    }

    /// Drain the transport channel into the session.
    /// Returns whether anything arrived and whether the channel is still open.
    fn process_pending_events(&mut self) -> (bool, bool) {
        let mut had_events = false;
        loop {
            match self.events.try_recv() {
                Ok(event) => {
                    had_events = true;
                    match event {
                        TransportEvent::Connected => self.session.on_connected(),
                        TransportEvent::Event(event) => self.session.handle(event),
                        TransportEvent::Disconnected(reason) => {
                            self.pointer = None;
                            self.session.on_disconnected(&reason);
                        }
                    }
                }
                Err(TryRecvError::Empty) => return (had_events, true),
                Err(TryRecvError::Disconnected) => {
                    info!("connection thread finished");
                    return (had_events, false);
                }
            }
        }
    }
}
