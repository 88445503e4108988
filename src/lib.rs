//! # quiz-room
//!
//! A terminal client for live multiplayer quiz rooms.
//!
//! A game master picks a question pack and opens a room; players join with
//! the room code, answer shuffled multiple-choice questions against a
//! countdown and watch a shared scoreboard. Rooms are driven by a quiz
//! server speaking Socket.IO over WebSocket.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use quiz_room::config::{Overrides, Settings};
//! use quiz_room::route::Route;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), quiz_room::ClientError> {
//!     let settings = Settings::load(None, None, Overrides::default())?;
//!     quiz_room::client::run(settings, Route::Join).await
//! }
//! ```

pub mod client;
pub mod config;
pub mod game;
pub mod logging;
pub mod net;
pub mod protocol;
pub mod route;
pub mod sound;
pub mod terminal;

use std::io;
use std::path::PathBuf;

use thiserror::Error;
use tokio_tungstenite::tungstenite;

use protocol::PacketError;

/// Errors surfaced by the client.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed packet: {0}")]
    Packet(#[from] PacketError),

    #[error("invalid server URL {url}: {reason}")]
    ServerUrl { url: String, reason: String },

    #[error("failed to read {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid settings: {0}")]
    Config(#[from] toml::de::Error),

    #[error("failed to write preferences: {0}")]
    PrefsWrite(#[from] toml::ser::Error),

    #[error("server rejected the connection: {0}")]
    Rejected(String),

    #[error("disconnected: {0}")]
    Disconnected(String),
}
