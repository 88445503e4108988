//! Realtime event channel to the quiz server.
//!
//! [`SocketClient`] is a cheap, cloneable handle. A background reader task
//! decodes frames into [`ServerEvent`]s and resolves pending acknowledgements;
//! a writer task owns the sending half of the WebSocket.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures_util::{SinkExt, Stream, StreamExt};
use reqwest::Url;
use tokio::sync::{Mutex, mpsc, oneshot};
use tokio_tungstenite::tungstenite::{self, Message};
use tracing::{debug, info, warn};

use crate::ClientError;
use crate::protocol::{Ack, ClientRequest, EnginePacket, ServerEvent, SocketPacket};

/// How long a request waits for the server's acknowledgement.
const ACK_TIMEOUT: Duration = Duration::from_secs(10);

/// How long the initial handshake may take.
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

type PendingAcks = Arc<Mutex<HashMap<u64, oneshot::Sender<Ack>>>>;

/// Handle used to send requests over the event channel.
#[derive(Clone)]
pub struct SocketClient {
    outgoing: mpsc::UnboundedSender<String>,
    pending: PendingAcks,
    next_id: Arc<AtomicU64>,
}

/// Build the WebSocket endpoint for a server base URL.
pub fn socket_url(server: &str) -> Result<Url, ClientError> {
    let invalid = |reason: &str| ClientError::ServerUrl {
        url: server.to_string(),
        reason: reason.to_string(),
    };

    let mut url = Url::parse(server).map_err(|e| invalid(&e.to_string()))?;
    let scheme = match url.scheme() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        _ => return Err(invalid("scheme must be http(s) or ws(s)")),
    };
    url.set_scheme(scheme)
        .map_err(|_| invalid("cannot switch to a websocket scheme"))?;
    url.set_path("/socket.io/");
    url.set_query(Some("EIO=4&transport=websocket"));
    url.set_fragment(None);
    Ok(url)
}

/// Connect to the server and join the default namespace.
///
/// Returns the request handle and the stream of inbound events. The stream
/// ends with [`ServerEvent::Disconnected`] when the connection drops.
pub async fn connect(
    server: &str,
) -> Result<(SocketClient, mpsc::UnboundedReceiver<ServerEvent>), ClientError> {
    let url = socket_url(server)?;
    info!(%url, "connecting to event channel");

    let (mut ws_stream, _) = tokio_tungstenite::connect_async(url.as_str()).await?;

    let handshake = tokio::time::timeout(HANDSHAKE_TIMEOUT, async {
        let EnginePacket::Open(handshake) = next_packet(&mut ws_stream).await? else {
            return Err(ClientError::Disconnected(
                "server did not open the session".to_string(),
            ));
        };

        let connect = EnginePacket::Message(SocketPacket::connect()).encode();
        ws_stream.send(Message::Text(connect.into())).await?;

        loop {
            match next_packet(&mut ws_stream).await? {
                EnginePacket::Message(SocketPacket::Connect { .. }) => break,
                EnginePacket::Message(SocketPacket::ConnectError { data, .. }) => {
                    let reason = data
                        .and_then(|d| d.get("message").and_then(|m| m.as_str()).map(String::from))
                        .unwrap_or_else(|| "connection refused".to_string());
                    return Err(ClientError::Rejected(reason));
                }
                EnginePacket::Ping(data) => {
                    ws_stream
                        .send(Message::Text(EnginePacket::Pong(data).encode().into()))
                        .await?;
                }
                other => debug!(?other, "ignoring packet during handshake"),
            }
        }

        Ok::<_, ClientError>(handshake)
    })
    .await
    .map_err(|_| ClientError::Disconnected("handshake timed out".to_string()))??;

    info!(sid = %handshake.sid, ping_interval = handshake.ping_interval, "event channel open");

    let (mut ws_sender, ws_receiver) = ws_stream.split();
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<String>();
    let (event_tx, event_rx) = mpsc::unbounded_channel::<ServerEvent>();
    let pending: PendingAcks = Arc::new(Mutex::new(HashMap::new()));

    tokio::spawn(async move {
        while let Some(frame) = out_rx.recv().await {
            if ws_sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
        let _ = ws_sender.close().await;
    });

    let _ = event_tx.send(ServerEvent::Connected);
    tokio::spawn(read_loop(
        ws_receiver,
        handshake.heartbeat_timeout(),
        out_tx.clone(),
        event_tx,
        Arc::clone(&pending),
    ));

    Ok((
        SocketClient {
            outgoing: out_tx,
            pending,
            next_id: Arc::new(AtomicU64::new(0)),
        },
        event_rx,
    ))
}

impl SocketClient {
    /// Emit a request and wait for its acknowledgement.
    ///
    /// Never fails: a closed channel, a timeout or a garbled reply all come
    /// back as an ack with `ok == false`.
    pub async fn request(&self, request: &ClientRequest) -> Ack {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let payload = match serde_json::to_value(request) {
            Ok(v) => v,
            Err(e) => return Ack::failed(e.to_string()),
        };
        let frame = EnginePacket::Message(SocketPacket::event(
            request.event_name(),
            Some(id),
            vec![payload],
        ))
        .encode();

        let (tx, rx) = oneshot::channel();
        self.pending.lock().await.insert(id, tx);

        debug!(id, event = request.event_name(), "emit");
        if self.outgoing.send(frame).is_err() {
            self.pending.lock().await.remove(&id);
            return Ack::failed("not connected");
        }

        match tokio::time::timeout(ACK_TIMEOUT, rx).await {
            Ok(Ok(ack)) => ack,
            Ok(Err(_)) => Ack::failed("connection closed"),
            Err(_) => {
                self.pending.lock().await.remove(&id);
                warn!(id, event = request.event_name(), "ack timed out");
                Ack::failed("timed out")
            }
        }
    }

    /// Ask the server to end the session.
    pub fn close(&self) {
        let _ = self.outgoing.send(EnginePacket::Close.encode());
    }
}

async fn next_packet<S>(stream: &mut S) -> Result<EnginePacket, ClientError>
where
    S: Stream<Item = Result<Message, tungstenite::Error>> + Unpin,
{
    loop {
        match stream.next().await {
            Some(Ok(Message::Text(text))) => return Ok(EnginePacket::decode(text.as_str())?),
            Some(Ok(Message::Close(_))) | None => {
                return Err(ClientError::Disconnected(
                    "connection closed by server".to_string(),
                ));
            }
            Some(Ok(_)) => continue,
            Some(Err(e)) => return Err(e.into()),
        }
    }
}

async fn read_loop<S>(
    mut stream: S,
    heartbeat: Duration,
    outgoing: mpsc::UnboundedSender<String>,
    events: mpsc::UnboundedSender<ServerEvent>,
    pending: PendingAcks,
) where
    S: Stream<Item = Result<Message, tungstenite::Error>> + Unpin,
{
    let reason = loop {
        // Any frame, even a malformed one, counts as a sign of life.
        let packet = match tokio::time::timeout(heartbeat, next_packet(&mut stream)).await {
            Ok(Ok(packet)) => packet,
            Ok(Err(ClientError::Packet(e))) => {
                warn!(error = %e, "dropping malformed frame");
                continue;
            }
            Ok(Err(e)) => break e.to_string(),
            Err(_) => break "ping timeout".to_string(),
        };

        match packet {
            EnginePacket::Ping(data) => {
                let _ = outgoing.send(EnginePacket::Pong(data).encode());
            }
            EnginePacket::Close => break "connection closed by server".to_string(),
            EnginePacket::Message(SocketPacket::Event { name, args, .. }) => {
                match ServerEvent::from_named(&name, &args) {
                    Ok(Some(event)) => {
                        if events.send(event).is_err() {
                            break "client shut down".to_string();
                        }
                    }
                    Ok(None) => debug!(%name, "unhandled event"),
                    Err(e) => warn!(%name, error = %e, "bad event payload"),
                }
            }
            EnginePacket::Message(SocketPacket::Ack { id, args, .. }) => {
                match pending.lock().await.remove(&id) {
                    Some(tx) => {
                        let _ = tx.send(Ack::from_args(&args));
                    }
                    None => debug!(id, "ack for unknown request"),
                }
            }
            EnginePacket::Message(SocketPacket::Disconnect { .. }) => {
                break "disconnected by server".to_string();
            }
            other => debug!(?other, "ignoring packet"),
        }
    };

    info!(%reason, "event channel closed");

    for (_, tx) in pending.lock().await.drain() {
        let _ = tx.send(Ack::failed(reason.clone()));
    }
    let _ = events.send(ServerEvent::Disconnected(reason));
}
