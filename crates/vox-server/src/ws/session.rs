//! WebSocket session lifecycle — one connected client from upgrade
//! through disconnect.

use std::collections::VecDeque;
use std::pin::pin;
use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};
use vox_core::RelayEvent;
use vox_llm::provider::TextProvider;

use super::connection::ClientConnection;
use super::registry::ConnectionRegistry;
use super::relay::handle_transcript;
use crate::config::ServerConfig;

/// Outbound channel depth per connection.
const SEND_QUEUE_DEPTH: usize = 256;

/// What one inbound frame amounts to.
enum Frame {
    /// A data frame carrying a request payload.
    Request(String),
    /// A control frame (or a rejected payload); nothing to dispatch.
    Control,
    /// The client is closing the connection.
    Closed,
}

/// Classify an inbound frame, with the side effects that belong to it:
/// pings/pongs mark the connection alive, a non-UTF8 binary payload is
/// reported to the client as a malformed request.
fn classify_frame(msg: Message, connection: &ClientConnection) -> Frame {
    match msg {
        Message::Text(t) => Frame::Request(t.to_string()),
        Message::Binary(data) => match std::str::from_utf8(&data) {
            Ok(s) => Frame::Request(s.to_string()),
            Err(_) => {
                debug!(len = data.len(), "rejected non-UTF8 binary frame");
                let _ = connection.send_event(&RelayEvent::error(
                    "invalid request: frame is not valid UTF-8",
                ));
                Frame::Control
            }
        },
        Message::Close(_) => Frame::Closed,
        Message::Ping(_) | Message::Pong(_) => {
            connection.mark_alive();
            Frame::Control
        }
    }
}

/// Run a WebSocket session for a connected client.
///
/// 1. Splits the socket; all writes go through a dedicated outbound task
/// 2. Dispatches each inbound data frame as a transcript request, one at
///    a time — a request runs to its terminal event before the next data
///    frame is dispatched, while the socket keeps being read so control
///    frames are never starved
/// 3. Sends periodic Ping frames and disconnects unresponsive clients
/// 4. Deregisters on disconnect
#[instrument(skip_all, fields(conn_id = %client_id))]
pub async fn run_ws_session(
    ws: WebSocket,
    client_id: String,
    provider: Arc<dyn TextProvider>,
    registry: Arc<ConnectionRegistry>,
    config: ServerConfig,
) {
    let (mut ws_tx, mut ws_rx) = ws.split();

    let (send_tx, mut send_rx) = mpsc::channel::<String>(SEND_QUEUE_DEPTH);
    let connection = Arc::new(ClientConnection::new(client_id.clone(), send_tx));

    registry.add(connection.clone());
    info!("client connected");

    // Outbound task: forwards queued frames and owns the heartbeat.
    let outbound_conn = connection.clone();
    let pong_timeout = config.pong_timeout();
    let outbound = tokio::spawn(async move {
        let mut ping_interval = tokio::time::interval(config.ping_interval());
        // Skip the immediate first tick
        let _ = ping_interval.tick().await;

        loop {
            tokio::select! {
                msg = send_rx.recv() => {
                    match msg {
                        Some(text) => {
                            if ws_tx.send(Message::Text(text.into())).await.is_err() {
                                break;
                            }
                        }
                        None => break,
                    }
                }
                _ = ping_interval.tick() => {
                    if !outbound_conn.check_alive()
                        && outbound_conn.last_pong_elapsed() > pong_timeout
                    {
                        warn!("client unresponsive for {pong_timeout:?}, disconnecting");
                        break;
                    }
                    if ws_tx.send(Message::Ping(vec![].into())).await.is_err() {
                        break;
                    }
                }
            }
        }
    });

    // Inbound loop. Data frames are dispatched in order, one request at a
    // time; frames arriving mid-request are still read, so pongs keep the
    // heartbeat fed while an upstream stream is running. Pipelined data
    // frames queue up behind the in-flight request.
    let mut pending: VecDeque<String> = VecDeque::new();
    'session: loop {
        let text = match pending.pop_front() {
            Some(text) => text,
            None => loop {
                let Some(Ok(msg)) = ws_rx.next().await else {
                    break 'session;
                };
                match classify_frame(msg, &connection) {
                    Frame::Request(text) => break text,
                    Frame::Control => {}
                    Frame::Closed => {
                        info!("client sent close frame");
                        break 'session;
                    }
                }
            },
        };

        connection.mark_alive();
        let mut request = pin!(handle_transcript(&text, provider.as_ref(), &connection));
        loop {
            tokio::select! {
                () = &mut request => break,
                frame = ws_rx.next() => {
                    let Some(Ok(msg)) = frame else {
                        break 'session;
                    };
                    match classify_frame(msg, &connection) {
                        Frame::Request(queued) => pending.push_back(queued),
                        Frame::Control => {}
                        Frame::Closed => {
                            // Drops the in-flight request and, with it,
                            // the upstream stream.
                            info!("client sent close frame");
                            break 'session;
                        }
                    }
                }
            }
        }
    }

    outbound.abort();
    let _ = registry.remove(&client_id);
    info!(
        age_secs = connection.age().as_secs(),
        dropped = connection.drop_count(),
        "client disconnected"
    );
}
