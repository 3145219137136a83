mod app;
mod config;
mod domain;
mod error;
mod models;
mod ui;

use clap::Parser;
use gpui::{App, Application};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::domain::protocol::protocol_schema;
use crate::models::ConnectionHandle;

fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("socket_chess=info")),
        )
        .init();

    if config.print_protocol_schema {
        println!("{}", serde_json::to_string_pretty(&protocol_schema())?);
        return Ok(());
    }

    tracing::info!(url = %config.server_url, "starting board client");
    let (connection, events) = ConnectionHandle::spawn(config.connection())?;

    Application::new().run(move |cx: &mut App| {
        app::run(cx, connection, events);
    });

    Ok(())
}
