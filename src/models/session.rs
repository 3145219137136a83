//! Board session - the controller between the rules engine, the server
//! connection and the rendered board.
//!
//! The session is free of GPUI so it can be driven directly in tests. The
//! GPUI entity in `models::board` owns one and forwards input and network
//! events into it.

use tracing::{debug, info, warn};

use crate::domain::protocol::parse_role;
use crate::domain::{
    ClientEvent, MoveSpec, Piece, PieceColor, PlayerRole, RulesEngine, ServerEvent,
    grid_to_algebraic,
};
use crate::error::InvalidMove;
use crate::models::transport::Transport;

/// Locally originated moves always promote to a queen
pub const DEFAULT_PROMOTION: &str = "q";

/// A piece picked up by the user, alive until the drop or drag end
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DragSession {
    pub piece: Piece,
    pub from_row: usize,
    pub from_col: usize,
}

/// One rendered square
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SquareView {
    /// Board row (0 = rank 8), independent of orientation
    pub row: usize,
    /// Board column (0 = file a), independent of orientation
    pub col: usize,
    pub name: String,
    pub piece: Option<Piece>,
    pub draggable: bool,
    pub light: bool,
}

/// The full rendered board, squares in display order (top-left first)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BoardGrid {
    pub flipped: bool,
    pub squares: Vec<SquareView>,
}

impl BoardGrid {
    /// Square at board coordinates
    pub fn at(&self, row: usize, col: usize) -> Option<&SquareView> {
        if row > 7 || col > 7 {
            return None;
        }
        // flipping is its own inverse
        let (display_row, display_col) = self.to_board(row, col);
        self.squares.get(display_row * 8 + display_col)
    }

    /// Map display coordinates (as seen on screen) to board coordinates
    pub fn to_board(&self, display_row: usize, display_col: usize) -> (usize, usize) {
        if self.flipped {
            (7 - display_row, 7 - display_col)
        } else {
            (display_row, display_col)
        }
    }

    /// Rows in display order
    pub fn rows(&self) -> impl Iterator<Item = &[SquareView]> {
        self.squares.chunks(8)
    }
}

/// A move we sent and expect the server to broadcast back
#[derive(Clone, Debug)]
struct PendingEcho {
    mv: MoveSpec,
    promoted: bool,
}

impl PendingEcho {
    /// Same squares; the promotion piece only counts for promoting moves
    fn matches(&self, other: &MoveSpec) -> bool {
        if self.mv.from != other.from || self.mv.to != other.to {
            return false;
        }
        if !self.promoted {
            return true;
        }
        let ours = self.mv.promotion.as_deref().map(str::to_lowercase);
        let theirs = other.promotion.as_deref().map(str::to_lowercase);
        ours == theirs
    }
}

pub struct BoardSession<E: RulesEngine, T: Transport> {
    rules: E,
    transport: T,
    role: Option<PlayerRole>,
    drag: Option<DragSession>,
    grid: BoardGrid,
    /// Number of renders so far
    revision: u64,
    /// Blocking notice for the user, shown until dismissed
    alert: Option<String>,
    connected: bool,
    /// Last move we emitted, so the server's echo of it is not replayed
    pending_echo: Option<PendingEcho>,
    /// SAN of the moves applied since the last full position load
    move_log: Vec<String>,
}

impl<E: RulesEngine, T: Transport> BoardSession<E, T> {
    pub fn new(rules: E, transport: T) -> Self {
        let mut session = Self {
            rules,
            transport,
            role: None,
            drag: None,
            grid: BoardGrid::default(),
            revision: 0,
            alert: None,
            connected: false,
            pending_echo: None,
            move_log: Vec::new(),
        };
        session.render();
        session
    }

    pub fn grid(&self) -> &BoardGrid {
        &self.grid
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn role(&self) -> Option<PlayerRole> {
        self.role
    }

    pub fn turn(&self) -> PieceColor {
        self.rules.turn()
    }

    pub fn fen(&self) -> String {
        self.rules.fen()
    }

    pub fn drag(&self) -> Option<DragSession> {
        self.drag
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn move_log(&self) -> &[String] {
        &self.move_log
    }

    #[cfg(test)]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Rebuild the whole grid from the rules engine and the current role
    pub fn render(&mut self) {
        let board = self.rules.board();
        let turn = self.rules.turn();
        let movable = self.role.and_then(PlayerRole::color);
        let flipped = self.role == Some(PlayerRole::Player(PieceColor::Black));

        let mut grid = BoardGrid {
            flipped,
            squares: Vec::with_capacity(64),
        };
        for display_row in 0..8 {
            for display_col in 0..8 {
                let (row, col) = grid.to_board(display_row, display_col);
                let piece = board[row][col];
                let draggable =
                    piece.is_some_and(|p| movable == Some(p.color) && turn == p.color);
                grid.squares.push(SquareView {
                    row,
                    col,
                    name: grid_to_algebraic(row, col).unwrap_or_default(),
                    piece,
                    draggable,
                    light: (row + col) % 2 == 0,
                });
            }
        }

        self.grid = grid;
        self.revision += 1;
    }

    /// Pick up the piece on a square. Returns false if it may not be dragged.
    pub fn on_drag_start(&mut self, row: usize, col: usize) -> bool {
        if self.alert.is_some() {
            return false;
        }
        let Some(square) = self.grid.at(row, col) else {
            return false;
        };
        match (square.draggable, square.piece) {
            (true, Some(piece)) => {
                self.drag = Some(DragSession {
                    piece,
                    from_row: row,
                    from_col: col,
                });
                true
            }
            _ => false,
        }
    }

    pub fn on_drag_end(&mut self) {
        self.drag = None;
    }

    /// Drop the dragged piece on a square and try the resulting move
    pub fn on_drop(&mut self, row: usize, col: usize) {
        let Some(drag) = self.drag.take() else {
            return;
        };
        let (Some(from), Some(to)) = (
            grid_to_algebraic(drag.from_row, drag.from_col),
            grid_to_algebraic(row, col),
        ) else {
            debug!(row, col, "drop outside the board");
            return;
        };
        let mv = MoveSpec::new(&from, &to, Some(DEFAULT_PROMOTION));
        // rejection is already logged; a failed drop has no visible effect
        let _ = self.attempt_move(&mv);
    }

    /// Validate a move locally; on success send it to the server and re-render
    pub fn attempt_move(&mut self, mv: &MoveSpec) -> Result<(), InvalidMove> {
        match self.rules.play(mv) {
            Ok(san) => {
                info!(%mv, %san, "move played");
                self.pending_echo = Some(PendingEcho {
                    mv: mv.clone(),
                    promoted: san.contains('='),
                });
                self.move_log.push(san);
                self.transport.emit(ClientEvent::Move(mv.clone()));
                self.render();
                Ok(())
            }
            Err(e) => {
                info!(%mv, error = %e, "invalid move");
                Err(e)
            }
        }
    }

    /// Apply an event pushed by the server
    pub fn handle(&mut self, event: ServerEvent) {
        debug!(event = event.name(), "server event");
        match event {
            ServerEvent::PlayerRole(code) => match parse_role(&code) {
                Ok(role) => {
                    info!(role = role.label(), "role assigned");
                    self.role = Some(role);
                    self.drag = None;
                    self.render();
                }
                Err(e) => {
                    // a push always replaces the role; an unknown one moves nothing
                    warn!(error = %e, "unknown role assigned");
                    self.role = None;
                    self.drag = None;
                    self.render();
                }
            },
            ServerEvent::SpectatorRole => {
                info!("spectating");
                self.role = Some(PlayerRole::Spectator);
                self.drag = None;
                self.render();
            }
            ServerEvent::BoardState(fen) => match self.rules.load(&fen) {
                Ok(()) => {
                    debug!(%fen, "position loaded");
                    self.move_log.clear();
                    self.drag = None;
                    self.pending_echo = None;
                    self.render();
                }
                Err(e) => warn!(error = %e, "ignoring board state"),
            },
            ServerEvent::Move(mv) => {
                if self.pending_echo.take().is_some_and(|echo| echo.matches(&mv)) {
                    debug!(%mv, "echo of our own move");
                    return;
                }
                match self.rules.play(&mv) {
                    Ok(san) => {
                        self.move_log.push(san);
                        self.render();
                    }
                    Err(e) => {
                        warn!(%mv, error = %e, "server move rejected locally, requesting resync");
                        self.transport.emit(ClientEvent::RequestBoardState);
                    }
                }
            }
            ServerEvent::InvalidMove(mv) => {
                warn!(%mv, "server rejected move");
                self.alert = Some(format!("Invalid move {}. Please try again.", mv));
            }
        }
    }

    /// The connection is (re)established; the server state is authoritative
    pub fn on_connected(&mut self) {
        info!("connected");
        self.connected = true;
        self.transport.emit(ClientEvent::RequestBoardState);
    }

    pub fn on_disconnected(&mut self, reason: &str) {
        warn!(reason, "disconnected");
        self.connected = false;
        self.drag = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ShakmatyRules;
    use crate::domain::chess::PieceKind;

    const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
    const AFTER_E4: &str = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1";

    #[derive(Default)]
    struct Recorder {
        sent: Vec<ClientEvent>,
    }

    impl Transport for Recorder {
        fn emit(&mut self, event: ClientEvent) {
            self.sent.push(event);
        }
    }

    fn session() -> BoardSession<ShakmatyRules, Recorder> {
        BoardSession::new(ShakmatyRules::new(), Recorder::default())
    }

    fn white_session() -> BoardSession<ShakmatyRules, Recorder> {
        let mut s = session();
        s.handle(ServerEvent::PlayerRole("w".to_string()));
        s
    }

    fn e2e4() -> MoveSpec {
        MoveSpec::new("e2", "e4", Some("q"))
    }

    #[test]
    fn test_initial_render() {
        let s = session();
        assert_eq!(s.revision(), 1);
        assert_eq!(s.grid().squares.len(), 64);
        assert!(!s.grid().flipped);
        assert!(s.grid().squares.iter().all(|sq| !sq.draggable));
        assert_eq!(s.grid().squares[0].name, "a8");
        assert_eq!(s.grid().squares[63].name, "h1");
    }

    #[test]
    fn test_render_idempotent() {
        let mut s = white_session();
        s.render();
        let first = s.grid().clone();
        s.render();
        assert_eq!(&first, s.grid());
    }

    #[test]
    fn test_draggable_only_own_color_on_turn() {
        let mut s = white_session();
        let white_pawn = s.grid().at(6, 4).unwrap();
        assert!(white_pawn.draggable);
        let black_pawn = s.grid().at(1, 4).unwrap();
        assert!(!black_pawn.draggable);

        s.attempt_move(&e2e4()).unwrap();
        // black to move now, nothing white is draggable
        assert!(s.grid().squares.iter().all(|sq| !sq.draggable));
    }

    #[test]
    fn test_black_pieces_draggable_on_black_turn() {
        let mut s = session();
        s.handle(ServerEvent::PlayerRole("B".to_string()));
        assert!(!s.grid().at(1, 4).unwrap().draggable);
        s.handle(ServerEvent::BoardState(AFTER_E4.to_string()));
        assert!(s.grid().at(1, 4).unwrap().draggable);
        assert!(!s.grid().at(4, 4).unwrap().draggable);
    }

    #[test]
    fn test_spectator_never_drags() {
        let mut s = session();
        s.handle(ServerEvent::SpectatorRole);
        assert_eq!(s.role(), Some(PlayerRole::Spectator));
        assert!(s.grid().squares.iter().all(|sq| !sq.draggable));
        assert!(!s.on_drag_start(6, 4));
    }

    #[test]
    fn test_orientation() {
        let mut s = session();
        assert!(!s.grid().flipped);
        s.handle(ServerEvent::PlayerRole("b".to_string()));
        assert!(s.grid().flipped);
        assert_eq!(s.grid().squares[0].name, "h1");
        assert_eq!(s.grid().squares[63].name, "a8");
        assert_eq!(s.grid().at(0, 0).unwrap().name, "a8");

        s.handle(ServerEvent::PlayerRole("w".to_string()));
        assert!(!s.grid().flipped);
        s.handle(ServerEvent::SpectatorRole);
        assert!(!s.grid().flipped);
    }

    #[test]
    fn test_legal_move_emits_once_and_renders_once() {
        let mut s = white_session();
        let before = s.revision();
        s.attempt_move(&e2e4()).unwrap();
        assert_eq!(s.revision(), before + 1);
        assert_eq!(s.transport().sent, vec![ClientEvent::Move(e2e4())]);
        assert_eq!(s.fen(), AFTER_E4);
        assert_eq!(s.move_log(), ["e4"]);
    }

    #[test]
    fn test_illegal_move_no_effect() {
        let mut s = white_session();
        let before = s.revision();
        let mv = MoveSpec::new("e2", "e5", Some("q"));
        assert!(s.attempt_move(&mv).is_err());
        assert_eq!(s.revision(), before);
        assert!(s.transport().sent.is_empty());
        assert_eq!(s.fen(), START_FEN);
    }

    #[test]
    fn test_drag_and_drop() {
        let mut s = white_session();
        assert!(s.on_drag_start(6, 4));
        assert_eq!(
            s.drag().map(|d| d.piece.kind),
            Some(PieceKind::Pawn)
        );
        s.on_drop(4, 4);
        assert_eq!(s.drag(), None);
        assert_eq!(s.transport().sent, vec![ClientEvent::Move(e2e4())]);
    }

    #[test]
    fn test_drop_without_drag_is_noop() {
        let mut s = white_session();
        let before = s.revision();
        s.on_drop(4, 4);
        assert_eq!(s.revision(), before);
        assert!(s.transport().sent.is_empty());
    }

    #[test]
    fn test_drag_end_clears_session() {
        let mut s = white_session();
        assert!(s.on_drag_start(7, 6));
        s.on_drag_end();
        assert_eq!(s.drag(), None);
        s.on_drop(5, 5);
        assert!(s.transport().sent.is_empty());
    }

    #[test]
    fn test_cancelled_drag_cannot_replay() {
        let mut s = white_session();
        assert!(s.on_drag_start(6, 4));
        s.on_drag_end();
        // next press lands on an empty square, then releases on e4
        assert!(!s.on_drag_start(4, 4));
        s.on_drop(4, 4);
        assert!(s.transport().sent.is_empty());
        assert_eq!(s.fen(), START_FEN);
    }

    #[test]
    fn test_illegal_drop_clears_drag() {
        let mut s = white_session();
        assert!(s.on_drag_start(6, 4));
        s.on_drop(3, 4);
        assert_eq!(s.drag(), None);
        assert!(s.transport().sent.is_empty());
        assert_eq!(s.fen(), START_FEN);
    }

    #[test]
    fn test_cannot_drag_opponent_piece() {
        let mut s = white_session();
        assert!(!s.on_drag_start(1, 4));
        assert!(!s.on_drag_start(4, 4));
        assert_eq!(s.drag(), None);
    }

    #[test]
    fn test_board_state_replaces_everything() {
        let mut s = white_session();
        s.attempt_move(&e2e4()).unwrap();
        // not a continuation of the current game
        let fen = "4k3/8/8/8/8/8/8/4K2R w K - 0 1";
        s.handle(ServerEvent::BoardState(fen.to_string()));
        assert_eq!(s.fen(), fen);
        assert!(s.move_log().is_empty());
        assert_eq!(s.grid().at(7, 7).unwrap().piece.map(|p| p.kind), Some(PieceKind::Rook));
    }

    #[test]
    fn test_bad_board_state_keeps_position() {
        let mut s = white_session();
        let before = s.revision();
        s.handle(ServerEvent::BoardState("garbage".to_string()));
        assert_eq!(s.fen(), START_FEN);
        assert_eq!(s.revision(), before);
    }

    #[test]
    fn test_inbound_move_applied() {
        let mut s = session();
        s.handle(ServerEvent::Move(MoveSpec::new("g1", "f3", None)));
        assert_eq!(s.turn(), PieceColor::Black);
        assert_eq!(s.move_log(), ["Nf3"]);
        assert!(s.transport().sent.is_empty());
    }

    #[test]
    fn test_inbound_move_rejected_requests_resync() {
        let mut s = session();
        let before = s.revision();
        s.handle(ServerEvent::Move(MoveSpec::new("e7", "e5", None)));
        assert_eq!(s.revision(), before);
        assert_eq!(s.fen(), START_FEN);
        assert_eq!(s.transport().sent, vec![ClientEvent::RequestBoardState]);
    }

    #[test]
    fn test_echo_of_own_move_ignored() {
        let mut s = white_session();
        s.attempt_move(&e2e4()).unwrap();
        s.handle(ServerEvent::Move(e2e4()));
        assert_eq!(s.fen(), AFTER_E4);
        assert_eq!(s.transport().sent.len(), 1);

        s.handle(ServerEvent::Move(MoveSpec::new("e7", "e5", None)));
        assert_eq!(s.move_log(), ["e4", "e5"]);
    }

    #[test]
    fn test_invalid_move_notice_blocks_drag() {
        let mut s = white_session();
        let before = s.revision();
        s.handle(ServerEvent::InvalidMove(e2e4()));
        assert!(s.alert().is_some());
        assert_eq!(s.revision(), before);
        assert_eq!(s.fen(), START_FEN);
        assert!(!s.on_drag_start(6, 4));

        s.dismiss_alert();
        assert!(s.on_drag_start(6, 4));
    }

    #[test]
    fn test_unknown_role_clears_role() {
        let mut s = white_session();
        assert!(s.on_drag_start(6, 4));
        s.handle(ServerEvent::PlayerRole("red".to_string()));
        assert_eq!(s.role(), None);
        assert_eq!(s.drag(), None);
        assert!(s.grid().squares.iter().all(|sq| !sq.draggable));
    }

    #[test]
    fn test_role_change_cancels_drag() {
        let mut s = white_session();
        assert!(s.on_drag_start(6, 4));
        s.handle(ServerEvent::PlayerRole("b".to_string()));
        assert_eq!(s.drag(), None);
        s.on_drop(4, 4);
        assert!(s.transport().sent.is_empty());
        assert_eq!(s.fen(), START_FEN);
    }

    #[test]
    fn test_echo_without_promotion_field_ignored() {
        let mut s = white_session();
        s.attempt_move(&e2e4()).unwrap();
        s.handle(ServerEvent::Move(MoveSpec::new("e2", "e4", None)));
        assert_eq!(s.fen(), AFTER_E4);
        assert_eq!(s.transport().sent, vec![ClientEvent::Move(e2e4())]);
    }

    #[test]
    fn test_promotion_echo_must_match_piece() {
        let mut s = white_session();
        s.handle(ServerEvent::BoardState("8/4P3/8/8/8/8/k7/4K3 w - - 0 1".to_string()));
        s.attempt_move(&MoveSpec::new("e7", "e8", Some("q"))).unwrap();
        s.handle(ServerEvent::Move(MoveSpec::new("e7", "e8", Some("Q"))));
        assert_eq!(s.move_log(), ["e8=Q"]);
        assert_eq!(s.transport().sent.len(), 1);
    }

    #[test]
    fn test_connect_requests_board_state() {
        let mut s = session();
        s.on_connected();
        assert!(s.is_connected());
        assert_eq!(s.transport().sent, vec![ClientEvent::RequestBoardState]);

        s.handle(ServerEvent::PlayerRole("w".to_string()));
        assert!(s.on_drag_start(6, 4));
        s.on_disconnected("closed");
        assert!(!s.is_connected());
        assert_eq!(s.drag(), None);
    }
}
