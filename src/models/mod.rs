pub mod board;
pub mod session;
pub mod transport;

pub use board::BoardModel;
pub use session::SquareView;
pub use transport::{ConnectionConfig, ConnectionHandle, TransportEvent};
