//! Server connection - a WebSocket carrying named JSON events.
//!
//! Architecture:
//! - Socket I/O runs on one OS thread that owns a blocking tungstenite socket
//! - Outbound events reach the thread through a command channel
//! - Inbound events are decoded on the thread and sent back over an event
//!   channel, which the GPUI board model polls
//! - A short read timeout lets the thread interleave reads with writes
//! - When the socket drops the thread reconnects until the handle is dropped

use std::io::ErrorKind;
use std::net::TcpStream;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context as _;
use tracing::{debug, info, warn};
use tungstenite::stream::MaybeTlsStream;
use tungstenite::{Message, WebSocket};

use crate::domain::protocol::{decode, encode};
use crate::domain::{ClientEvent, ServerEvent};

/// How long a read may block before outbound events are drained again
const READ_TIMEOUT: Duration = Duration::from_millis(20);

/// Fire-and-forget sink for outbound events
pub trait Transport {
    fn emit(&mut self, event: ClientEvent);
}

/// Where and how to connect
#[derive(Clone, Debug)]
pub struct ConnectionConfig {
    pub url: String,
    pub reconnect_delay: Duration,
}

/// Messages sent from the connection thread to the model
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// The socket is open (first connect or reconnect)
    Connected,
    /// An event pushed by the server
    Event(ServerEvent),
    /// An open socket went away
    Disconnected(String),
}

enum Command {
    Send(ClientEvent),
    Shutdown,
}

enum PumpExit {
    Shutdown,
    Closed(String),
}

type Socket = WebSocket<MaybeTlsStream<TcpStream>>;

/// Handle to the connection thread. Dropping it shuts the thread down.
pub struct ConnectionHandle {
    commands: Sender<Command>,
}

impl ConnectionHandle {
    /// Start the connection thread
    pub fn spawn(config: ConnectionConfig) -> anyhow::Result<(Self, Receiver<TransportEvent>)> {
        let (event_tx, event_rx) = mpsc::channel::<TransportEvent>();
        let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();

        thread::Builder::new()
            .name("server-connection".to_string())
            .spawn(move || run_connection(config, cmd_rx, event_tx))
            .context("failed to spawn connection thread")?;

        Ok((Self { commands: cmd_tx }, event_rx))
    }
}

impl Transport for ConnectionHandle {
    fn emit(&mut self, event: ClientEvent) {
        if self.commands.send(Command::Send(event)).is_err() {
            warn!("connection thread is gone, event dropped");
        }
    }
}

impl Drop for ConnectionHandle {
    fn drop(&mut self) {
        let _ = self.commands.send(Command::Shutdown);
    }
}

fn run_connection(
    config: ConnectionConfig,
    commands: Receiver<Command>,
    events: Sender<TransportEvent>,
) {
    loop {
        match open_socket(&config.url) {
            Ok(mut socket) => {
                info!(url = %config.url, "socket open");
                if events.send(TransportEvent::Connected).is_err() {
                    return;
                }
                match pump(&mut socket, &commands, &events) {
                    PumpExit::Shutdown => {
                        let _ = socket.close(None);
                        let _ = socket.flush();
                        return;
                    }
                    PumpExit::Closed(reason) => {
                        if events.send(TransportEvent::Disconnected(reason)).is_err() {
                            return;
                        }
                    }
                }
            }
            Err(e) => {
                let error = format!("{:#}", e);
                warn!(%error, "connect failed");
            }
        }

        if !wait_before_reconnect(&commands, config.reconnect_delay) {
            return;
        }
    }
}

fn open_socket(url: &str) -> anyhow::Result<Socket> {
    let (socket, _response) =
        tungstenite::connect(url).with_context(|| format!("failed to connect to {}", url))?;
    let tcp = match socket.get_ref() {
        MaybeTlsStream::Plain(stream) => Some(stream),
        MaybeTlsStream::Rustls(stream) => Some(&stream.sock),
        _ => None,
    };
    if let Some(tcp) = tcp {
        tcp.set_read_timeout(Some(READ_TIMEOUT))
            .context("failed to set read timeout")?;
    }
    Ok(socket)
}

/// Shuttle frames until the socket closes or the handle is dropped
fn pump(
    socket: &mut Socket,
    commands: &Receiver<Command>,
    events: &Sender<TransportEvent>,
) -> PumpExit {
    loop {
        loop {
            match commands.try_recv() {
                Ok(Command::Send(event)) => match encode(&event) {
                    Ok(text) => {
                        if let Err(e) = socket.send(Message::Text(text)) {
                            return PumpExit::Closed(e.to_string());
                        }
                    }
                    Err(e) => warn!(error = %e, "failed to encode event"),
                },
                Ok(Command::Shutdown) | Err(TryRecvError::Disconnected) => {
                    return PumpExit::Shutdown;
                }
                Err(TryRecvError::Empty) => break,
            }
        }

        match socket.read() {
            Ok(Message::Text(text)) => match decode(&text) {
                Ok(event) => {
                    if events.send(TransportEvent::Event(event)).is_err() {
                        return PumpExit::Shutdown;
                    }
                }
                Err(e) => warn!(error = %e, frame = %text, "skipping frame"),
            },
            Ok(Message::Close(_)) => return PumpExit::Closed("closed by server".to_string()),
            Ok(_) => {}
            Err(tungstenite::Error::Io(e))
                if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {}
            Err(e) => return PumpExit::Closed(e.to_string()),
        }
    }
}

/// Sleep out the reconnect delay. Outbound events queued meanwhile are
/// dropped: the server resends the position on reconnect anyway.
/// Returns false if the handle was dropped.
fn wait_before_reconnect(commands: &Receiver<Command>, delay: Duration) -> bool {
    let deadline = Instant::now() + delay;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return true;
        }
        match commands.recv_timeout(remaining) {
            Ok(Command::Send(event)) => debug!(?event, "not connected, event dropped"),
            Ok(Command::Shutdown) | Err(RecvTimeoutError::Disconnected) => return false,
            Err(RecvTimeoutError::Timeout) => return true,
        }
    }
}
