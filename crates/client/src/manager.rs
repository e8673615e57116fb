//! Supervised connection to the worker's jobs event stream.
//!
//! [`ConnectionManager`] owns exactly one logical connection to the jobs
//! WebSocket endpoint. [`connect`](ConnectionManager::connect) spawns a
//! supervision task (connect -> process frames -> backoff -> reconnect)
//! that keeps the link alive until [`disconnect`](ConnectionManager::disconnect)
//! cancels it. Decoded [`JobEvent`]s are fanned out via a
//! [`tokio::sync::broadcast`] channel; call
//! [`subscribe`](ConnectionManager::subscribe) to receive them.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, Mutex};
use tokio_util::sync::CancellationToken;

use crate::client::JobsClient;
use crate::events::JobEvent;
use crate::processor::process_frames;
use crate::reconnect::{next_delay, ReconnectConfig};

/// Broadcast channel capacity for decoded events.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// How long to wait for a supervision task to wind down.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Observable state of the link to the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    /// No supervision task is running; nothing will reconnect.
    Disconnected = 0,
    /// A connection attempt is in flight.
    Connecting = 1,
    /// The link is open and frames are being processed.
    Connected = 2,
    /// The link dropped; a retry is scheduled after the current delay.
    Retrying = 3,
}

impl LinkState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Connecting,
            2 => Self::Connected,
            3 => Self::Retrying,
            _ => Self::Disconnected,
        }
    }
}

/// Manages the single persistent connection to the jobs endpoint.
///
/// Absent an explicit `disconnect`, the link is always open, opening, or
/// scheduled to be retried. Events lost while the link is down are not
/// buffered; consumers self-heal through later events or by polling job
/// status over HTTP.
pub struct ConnectionManager {
    client: JobsClient,
    config: ReconnectConfig,
    event_tx: broadcast::Sender<JobEvent>,
    state: Arc<AtomicU8>,
    supervision: Mutex<Option<Supervision>>,
}

/// Bookkeeping for the currently-running supervision task.
struct Supervision {
    handle: tokio::task::JoinHandle<()>,
    cancel: CancellationToken,
}

impl ConnectionManager {
    /// Create a manager with the default backoff configuration.
    pub fn new(client: JobsClient) -> Self {
        Self::with_config(client, ReconnectConfig::default())
    }

    /// Create a manager with explicit backoff tuning.
    pub fn with_config(client: JobsClient, config: ReconnectConfig) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            client,
            config,
            event_tx,
            state: Arc::new(AtomicU8::new(LinkState::Disconnected as u8)),
            supervision: Mutex::new(None),
        }
    }

    /// Subscribe to decoded job events.
    ///
    /// Every subscriber receives every event, in delivery order. Dropping
    /// the receiver unsubscribes.
    pub fn subscribe(&self) -> broadcast::Receiver<JobEvent> {
        self.event_tx.subscribe()
    }

    /// Current state of the link.
    pub fn state(&self) -> LinkState {
        LinkState::from_u8(self.state.load(Ordering::SeqCst))
    }

    /// Start (or restart) supervision of the connection.
    ///
    /// Idempotent while the link is open or opening. If a retry is
    /// pending, the sleeping supervision task is replaced so the new
    /// attempt starts immediately with the delay reset to its floor.
    pub async fn connect(&self) {
        let mut guard = self.supervision.lock().await;

        if let Some(sup) = guard.as_ref() {
            if !sup.handle.is_finished() {
                match self.state() {
                    LinkState::Connected | LinkState::Connecting => return,
                    LinkState::Retrying | LinkState::Disconnected => {}
                }
            }
        }

        // Replace any previous run (a pending retry, or a finished task).
        if let Some(sup) = guard.take() {
            sup.cancel.cancel();
            let _ = tokio::time::timeout(SHUTDOWN_TIMEOUT, sup.handle).await;
        }

        self.state
            .store(LinkState::Connecting as u8, Ordering::SeqCst);

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run_supervision(
            self.client.clone(),
            self.config.clone(),
            self.event_tx.clone(),
            Arc::clone(&self.state),
            cancel.clone(),
        ));

        *guard = Some(Supervision { handle, cancel });
    }

    /// Mark the link intentionally closed and stop supervision.
    ///
    /// Cancels any pending retry, closes the live connection if one
    /// exists, and suppresses reconnection until `connect` is called
    /// again.
    pub async fn disconnect(&self) {
        let mut guard = self.supervision.lock().await;

        if let Some(sup) = guard.take() {
            sup.cancel.cancel();
            let _ = tokio::time::timeout(SHUTDOWN_TIMEOUT, sup.handle).await;
        }

        self.state
            .store(LinkState::Disconnected as u8, Ordering::SeqCst);
        tracing::info!("Jobs event stream disconnected");
    }
}

/// Core supervision loop: connect -> process frames -> backoff -> retry.
///
/// Runs until the cancellation token is triggered. A transport error on
/// an open connection ends frame processing and takes the same single
/// reconnect path as a server-side close, so the two can never schedule
/// competing retries. The backoff delay resets to its floor on every
/// successful open and widens on each consecutive failure.
async fn run_supervision(
    client: JobsClient,
    config: ReconnectConfig,
    event_tx: broadcast::Sender<JobEvent>,
    state: Arc<AtomicU8>,
    cancel: CancellationToken,
) {
    let mut delay = config.initial_delay;

    loop {
        state.store(LinkState::Connecting as u8, Ordering::SeqCst);

        tokio::select! {
            _ = cancel.cancelled() => return,
            result = client.connect() => match result {
                Ok(conn) => {
                    delay = config.initial_delay;
                    state.store(LinkState::Connected as u8, Ordering::SeqCst);

                    let mut ws_stream = conn.ws_stream;
                    tokio::select! {
                        _ = cancel.cancelled() => return,
                        _ = process_frames(&mut ws_stream, &event_tx) => {}
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Connection attempt failed");
                }
            }
        }

        if cancel.is_cancelled() {
            return;
        }

        state.store(LinkState::Retrying as u8, Ordering::SeqCst);
        tracing::info!(
            delay_ms = delay.as_millis() as u64,
            "Jobs stream down, scheduling reconnect",
        );

        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = tokio::time::sleep(delay) => {}
        }

        delay = next_delay(delay, &config);
    }
}
