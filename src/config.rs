//! Command line and environment configuration.

use std::time::Duration;

use clap::Parser;

use crate::models::ConnectionConfig;

pub const DEFAULT_SERVER_URL: &str = "ws://127.0.0.1:3000/ws";

#[derive(Parser, Debug, Clone)]
#[command(name = "socket-chess", about = "Chess board client for a real-time game server")]
pub struct Config {
    /// WebSocket endpoint of the game server (ws:// or wss://)
    #[arg(long, env = "CHESS_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
    pub server_url: String,

    /// Delay between reconnect attempts, in milliseconds
    #[arg(long, env = "CHESS_RECONNECT_DELAY_MS", default_value_t = 2000)]
    pub reconnect_delay_ms: u64,

    /// Print the JSON schema of the wire protocol and exit
    #[arg(long)]
    pub print_protocol_schema: bool,
}

impl Config {
    pub fn connection(&self) -> ConnectionConfig {
        ConnectionConfig {
            url: self.server_url.clone(),
            reconnect_delay: Duration::from_millis(self.reconnect_delay_ms),
        }
    }
}
