//! Protocol for client-server communication.
//!
//! Frames are Socket.IO text packets over a WebSocket; payloads are JSON.

pub mod events;
pub mod packet;

pub use events::{
    Ack, Bonus, ClientRequest, PackInfo, PackList, Player, Question, Reveal, Room, RoomStatus,
    ServerEvent, ThemeEffects, ThemeSpec,
};
pub use packet::{EnginePacket, Handshake, PacketError, SocketPacket};

/// Default quiz server address.
pub const DEFAULT_SERVER: &str = "http://localhost:3000";
