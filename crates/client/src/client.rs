//! WebSocket client for the worker's jobs event endpoint.
//!
//! [`JobsClient`] holds the connection configuration for one worker.
//! Call [`JobsClient::connect`] to establish a live [`JobsConnection`]
//! over WebSocket.

use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

/// Path of the jobs event endpoint on the worker.
const JOBS_WS_PATH: &str = "/ws/jobs";

/// Connection configuration for one worker's event stream.
///
/// Built from the worker's HTTP base URL; the WebSocket URL is derived by
/// upgrading the scheme (`http` -> `ws`, `https` -> `wss`) and appending
/// [`JOBS_WS_PATH`], so an encrypted API origin gets an encrypted event
/// stream.
#[derive(Debug, Clone)]
pub struct JobsClient {
    ws_url: String,
}

/// A live WebSocket connection to the worker's jobs endpoint.
pub struct JobsConnection {
    /// The raw WebSocket stream for reading frames.
    pub ws_stream: WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>,
}

impl JobsClient {
    /// Create a client from the worker's HTTP base URL.
    ///
    /// * `base_url` - e.g. `http://127.0.0.1:7860`.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base = base_url.trim_end_matches('/');
        let ws_base = if let Some(rest) = base.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = base.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        };

        Ok(Self {
            ws_url: format!("{ws_base}{JOBS_WS_PATH}"),
        })
    }

    /// The derived WebSocket URL (e.g. `ws://127.0.0.1:7860/ws/jobs`).
    pub fn ws_url(&self) -> &str {
        &self.ws_url
    }

    /// Connect to the jobs WebSocket endpoint.
    pub async fn connect(&self) -> Result<JobsConnection, ClientError> {
        let (ws_stream, _response) = connect_async(&self.ws_url).await.map_err(|e| {
            ClientError::Connection(format!("Failed to connect to {}: {e}", self.ws_url))
        })?;

        tracing::info!(url = %self.ws_url, "Connected to jobs event stream");

        Ok(JobsConnection { ws_stream })
    }
}

/// Errors that can occur when working with the WebSocket client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The base URL does not use a recognized scheme.
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// Failed to establish the WebSocket connection.
    #[error("Connection error: {0}")]
    Connection(String),
}
