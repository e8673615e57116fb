//! Event-to-registry routing loop.
//!
//! [`route_events`] binds a [`ConnectionManager`](crate::manager::ConnectionManager)
//! subscription to a [`JobRegistry`]: every decoded event is applied to
//! the registry in delivery order. Spawned once by the composition root.

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::events::JobEvent;
use crate::registry::JobRegistry;

/// Apply every received event to the registry until the stream closes.
///
/// A lagged receiver skips the overwritten events and keeps going — the
/// registry absorbs the resulting gaps the same way it absorbs events
/// lost during a transport outage. Exits when the sending side (the
/// connection manager) is dropped.
pub async fn route_events(registry: Arc<JobRegistry>, mut receiver: broadcast::Receiver<JobEvent>) {
    loop {
        match receiver.recv().await {
            Ok(event) => registry.apply_event(&event).await,
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Job event router lagged");
            }
            Err(broadcast::error::RecvError::Closed) => {
                tracing::info!("Event stream closed, job router shutting down");
                break;
            }
        }
    }
}
