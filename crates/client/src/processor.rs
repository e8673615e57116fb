//! WebSocket frame processing loop.
//!
//! Reads raw frames from a live jobs connection, decodes text frames via
//! [`decode_event`], and fans decoded events out on the broadcast
//! channel. Returns when the connection closes or a receive error
//! occurs; the caller decides whether to reconnect.

use futures::StreamExt;
use tokio::sync::broadcast;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use crate::events::{decode_event, JobEvent};

/// Process frames from a jobs connection until it drops.
///
/// Frames that do not decode to a recognized event are discarded without
/// surfacing an error — unrecognized traffic must never unwind this loop.
/// Binary frames (raw preview blobs outside the JSON protocol) and
/// ping/pong are ignored.
pub async fn process_frames(
    ws_stream: &mut WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>,
    event_tx: &broadcast::Sender<JobEvent>,
) {
    while let Some(msg_result) = ws_stream.next().await {
        match msg_result {
            Ok(Message::Text(text)) => match decode_event(&text) {
                Some(event) => {
                    tracing::debug!(job_id = %event.job_id(), "Decoded job event");
                    // SendError only means there are zero subscribers.
                    let _ = event_tx.send(event);
                }
                None => {
                    tracing::debug!(raw_frame = %text, "Discarding unrecognized frame");
                }
            },
            Ok(Message::Binary(_)) => {
                tracing::trace!("Ignoring binary frame");
            }
            Ok(Message::Ping(_) | Message::Pong(_)) => {
                // Handled automatically by tungstenite.
            }
            Ok(Message::Close(frame)) => {
                tracing::info!(?frame, "Jobs stream closed by server");
                break;
            }
            Ok(Message::Frame(_)) => {}
            Err(e) => {
                tracing::warn!(error = %e, "Jobs stream receive error");
                break;
            }
        }
    }
}
