//! Quiz room client.
//!
//! Terminal front end for the game master and the players: connects to the
//! server's event channel and renders the room as events arrive.

mod client;
mod state;
mod ui;

pub use client::run;
