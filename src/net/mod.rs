//! Network access to the quiz server: the realtime event channel and the
//! HTTP pack catalogue.

pub mod api;
pub mod socket;

pub use api::list_packs;
pub use socket::{SocketClient, connect, socket_url};
