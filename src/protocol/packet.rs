//! Text framing for the realtime event channel.
//!
//! The quiz server speaks Socket.IO (protocol 5) on top of Engine.IO
//! (protocol 4). Over a WebSocket every frame carries exactly one engine
//! packet, so only the text encoding is needed here.

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Errors produced while decoding a frame.
#[derive(Debug, Error, PartialEq)]
pub enum PacketError {
    #[error("empty frame")]
    Empty,
    #[error("unknown engine packet type {0:?}")]
    UnknownEngineType(char),
    #[error("unknown socket packet type {0:?}")]
    UnknownSocketType(char),
    #[error("binary socket packets are not supported")]
    Binary,
    #[error("invalid JSON payload: {0}")]
    Json(String),
    #[error("event payload must be an array starting with the event name")]
    MissingEventName,
    #[error("ack packet without an id")]
    MissingAckId,
}

impl From<serde_json::Error> for PacketError {
    fn from(err: serde_json::Error) -> Self {
        PacketError::Json(err.to_string())
    }
}

/// Handshake sent by the server in the engine `open` packet.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Handshake {
    pub sid: String,
    #[serde(default)]
    pub upgrades: Vec<String>,
    #[serde(default = "default_ping_interval")]
    pub ping_interval: u64,
    #[serde(default = "default_ping_timeout")]
    pub ping_timeout: u64,
    #[serde(default)]
    pub max_payload: Option<u64>,
}

impl Handshake {
    /// Silence longer than this means the server is gone.
    pub fn heartbeat_timeout(&self) -> Duration {
        Duration::from_millis(self.ping_interval.saturating_add(self.ping_timeout))
    }
}

fn default_ping_interval() -> u64 {
    25_000
}

fn default_ping_timeout() -> u64 {
    20_000
}

/// One engine-level packet.
#[derive(Debug, Clone, PartialEq)]
pub enum EnginePacket {
    Open(Handshake),
    Close,
    Ping(Option<String>),
    Pong(Option<String>),
    Message(SocketPacket),
    Upgrade,
    Noop,
}

/// One socket-level packet, carried inside an engine message.
#[derive(Debug, Clone, PartialEq)]
pub enum SocketPacket {
    Connect {
        namespace: Option<String>,
        data: Option<Value>,
    },
    Disconnect {
        namespace: Option<String>,
    },
    Event {
        namespace: Option<String>,
        id: Option<u64>,
        name: String,
        args: Vec<Value>,
    },
    Ack {
        namespace: Option<String>,
        id: u64,
        args: Vec<Value>,
    },
    ConnectError {
        namespace: Option<String>,
        data: Option<Value>,
    },
}

impl SocketPacket {
    /// An event on the default namespace.
    pub fn event(name: impl Into<String>, id: Option<u64>, args: Vec<Value>) -> Self {
        SocketPacket::Event {
            namespace: None,
            id,
            name: name.into(),
            args,
        }
    }

    /// Connect request for the default namespace.
    pub fn connect() -> Self {
        SocketPacket::Connect {
            namespace: None,
            data: None,
        }
    }
}

impl EnginePacket {
    /// Encode into the text form sent over the WebSocket.
    pub fn encode(&self) -> String {
        match self {
            // Only servers send the open packet; the client never encodes one
            // with real content, but keep the mapping total.
            EnginePacket::Open(hs) => format!("0{{\"sid\":{}}}", Value::String(hs.sid.clone())),
            EnginePacket::Close => "1".to_string(),
            EnginePacket::Ping(data) => format!("2{}", data.as_deref().unwrap_or("")),
            EnginePacket::Pong(data) => format!("3{}", data.as_deref().unwrap_or("")),
            EnginePacket::Message(packet) => format!("4{}", encode_socket(packet)),
            EnginePacket::Upgrade => "5".to_string(),
            EnginePacket::Noop => "6".to_string(),
        }
    }

    /// Decode one text frame.
    pub fn decode(frame: &str) -> Result<Self, PacketError> {
        let mut chars = frame.chars();
        let kind = chars.next().ok_or(PacketError::Empty)?;
        let rest = chars.as_str();

        match kind {
            '0' => Ok(EnginePacket::Open(serde_json::from_str(rest)?)),
            '1' => Ok(EnginePacket::Close),
            '2' => Ok(EnginePacket::Ping(non_empty(rest))),
            '3' => Ok(EnginePacket::Pong(non_empty(rest))),
            '4' => Ok(EnginePacket::Message(decode_socket(rest)?)),
            '5' => Ok(EnginePacket::Upgrade),
            '6' => Ok(EnginePacket::Noop),
            other => Err(PacketError::UnknownEngineType(other)),
        }
    }
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

fn encode_socket(packet: &SocketPacket) -> String {
    let mut out = String::new();

    let (kind, namespace) = match packet {
        SocketPacket::Connect { namespace, .. } => ('0', namespace),
        SocketPacket::Disconnect { namespace } => ('1', namespace),
        SocketPacket::Event { namespace, .. } => ('2', namespace),
        SocketPacket::Ack { namespace, .. } => ('3', namespace),
        SocketPacket::ConnectError { namespace, .. } => ('4', namespace),
    };
    out.push(kind);

    if let Some(nsp) = namespace.as_deref().filter(|n| *n != "/") {
        out.push_str(nsp);
        out.push(',');
    }

    match packet {
        SocketPacket::Connect { data, .. } | SocketPacket::ConnectError { data, .. } => {
            if let Some(data) = data {
                out.push_str(&data.to_string());
            }
        }
        SocketPacket::Disconnect { .. } => {}
        SocketPacket::Event { id, name, args, .. } => {
            if let Some(id) = id {
                out.push_str(&id.to_string());
            }
            let mut items = Vec::with_capacity(args.len() + 1);
            items.push(Value::String(name.clone()));
            items.extend(args.iter().cloned());
            out.push_str(&Value::Array(items).to_string());
        }
        SocketPacket::Ack { id, args, .. } => {
            out.push_str(&id.to_string());
            out.push_str(&Value::Array(args.clone()).to_string());
        }
    }

    out
}

fn decode_socket(input: &str) -> Result<SocketPacket, PacketError> {
    let mut chars = input.chars();
    let kind = chars.next().ok_or(PacketError::Empty)?;
    let mut rest = chars.as_str();

    let namespace = if rest.starts_with('/') {
        match rest.find(',') {
            Some(comma) => {
                let nsp = rest[..comma].to_string();
                rest = &rest[comma + 1..];
                Some(nsp)
            }
            None => {
                let nsp = rest.to_string();
                rest = "";
                Some(nsp)
            }
        }
    } else {
        None
    };

    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    let id = if digits > 0 {
        rest[..digits].parse::<u64>().ok()
    } else {
        None
    };
    let body = &rest[digits..];

    match kind {
        '0' => Ok(SocketPacket::Connect {
            namespace,
            data: parse_optional(body)?,
        }),
        '1' => Ok(SocketPacket::Disconnect { namespace }),
        '2' => {
            let mut items = parse_array(body)?;
            if items.is_empty() {
                return Err(PacketError::MissingEventName);
            }
            let Value::String(name) = items.remove(0) else {
                return Err(PacketError::MissingEventName);
            };
            Ok(SocketPacket::Event {
                namespace,
                id,
                name,
                args: items,
            })
        }
        '3' => Ok(SocketPacket::Ack {
            namespace,
            id: id.ok_or(PacketError::MissingAckId)?,
            args: parse_array(body)?,
        }),
        '4' => Ok(SocketPacket::ConnectError {
            namespace,
            data: parse_optional(body)?,
        }),
        '5' | '6' => Err(PacketError::Binary),
        other => Err(PacketError::UnknownSocketType(other)),
    }
}

fn parse_optional(body: &str) -> Result<Option<Value>, PacketError> {
    if body.is_empty() {
        Ok(None)
    } else {
        Ok(Some(serde_json::from_str(body)?))
    }
}

fn parse_array(body: &str) -> Result<Vec<Value>, PacketError> {
    match serde_json::from_str::<Value>(body)? {
        Value::Array(items) => Ok(items),
        _ => Err(PacketError::MissingEventName),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_open_handshake() {
        let frame = r#"0{"sid":"lv_VI97HAXpY6yYWAAAC","upgrades":[],"pingInterval":25000,"pingTimeout":5000,"maxPayload":1000000}"#;
        let EnginePacket::Open(hs) = EnginePacket::decode(frame).unwrap() else {
            panic!("expected open packet");
        };
        assert_eq!(hs.sid, "lv_VI97HAXpY6yYWAAAC");
        assert_eq!(hs.ping_interval, 25000);
        assert_eq!(hs.ping_timeout, 5000);
        assert_eq!(hs.max_payload, Some(1_000_000));
    }

    #[test]
    fn test_decode_event_with_payload() {
        let frame = r#"42["room:update",{"code":"7H6GQ2","status":"lobby"}]"#;
        let packet = EnginePacket::decode(frame).unwrap();
        assert_eq!(
            packet,
            EnginePacket::Message(SocketPacket::Event {
                namespace: None,
                id: None,
                name: "room:update".to_string(),
                args: vec![json!({"code": "7H6GQ2", "status": "lobby"})],
            })
        );
    }

    #[test]
    fn test_decode_ack_with_namespace() {
        let frame = r#"43/admin,12[{"ok":true}]"#;
        let packet = EnginePacket::decode(frame).unwrap();
        assert_eq!(
            packet,
            EnginePacket::Message(SocketPacket::Ack {
                namespace: Some("/admin".to_string()),
                id: 12,
                args: vec![json!({"ok": true})],
            })
        );
    }

    #[test]
    fn test_encode_event_with_ack_id() {
        let packet = EnginePacket::Message(SocketPacket::event(
            "gm:start",
            Some(3),
            vec![json!({"code": "ABC"})],
        ));
        assert_eq!(packet.encode(), r#"423["gm:start",{"code":"ABC"}]"#);
    }

    #[test]
    fn test_connect_and_heartbeat_frames() {
        assert_eq!(EnginePacket::Message(SocketPacket::connect()).encode(), "40");
        assert_eq!(EnginePacket::Pong(None).encode(), "3");
        assert_eq!(EnginePacket::decode("2").unwrap(), EnginePacket::Ping(None));
        assert_eq!(
            EnginePacket::decode("2probe").unwrap(),
            EnginePacket::Ping(Some("probe".to_string()))
        );
    }

    #[test]
    fn test_event_without_args_decodes() {
        let packet = EnginePacket::decode(r#"42["game:ended"]"#).unwrap();
        let EnginePacket::Message(SocketPacket::Event { name, args, .. }) = packet else {
            panic!("expected event");
        };
        assert_eq!(name, "game:ended");
        assert!(args.is_empty());
    }

    #[test]
    fn test_malformed_frames_are_errors() {
        assert_eq!(EnginePacket::decode(""), Err(PacketError::Empty));
        assert_eq!(EnginePacket::decode("9"), Err(PacketError::UnknownEngineType('9')));
        assert_eq!(EnginePacket::decode("42[1,2]"), Err(PacketError::MissingEventName));
        assert_eq!(EnginePacket::decode("42[]"), Err(PacketError::MissingEventName));
        assert_eq!(EnginePacket::decode("43[]"), Err(PacketError::MissingAckId));
        assert_eq!(EnginePacket::decode("45-[\"x\"]"), Err(PacketError::Binary));
        assert!(matches!(
            EnginePacket::decode("42[\"x\","),
            Err(PacketError::Json(_))
        ));
    }
}
