//! Job lifecycle synchronization engine for the Easel worker.
//!
//! Provides the persistent event transport with automatic reconnection,
//! the typed event codec, the client-side job registry, and the HTTP
//! submission path:
//!
//! - [`ConnectionManager`] — one supervised WebSocket connection to the
//!   worker's `/ws/jobs` endpoint, with exponential-backoff reconnect and
//!   broadcast fan-out of decoded events.
//! - [`JobEvent`] / [`decode_event`] — the closed set of lifecycle events
//!   the worker pushes.
//! - [`JobRegistry`] — sole authority for job state transitions, tolerant
//!   of duplicate and out-of-order delivery.
//! - [`GenerationApi`] / [`SubmissionCoordinator`] — request/response
//!   surface and the submit-then-register flow.

pub mod api;
pub mod client;
pub mod events;
pub mod manager;
pub mod processor;
pub mod reconnect;
pub mod registry;
pub mod router;
pub mod submit;

pub use api::{ApiError, GenerateRequest, GenerationApi, JobDescriptor};
pub use client::{ClientError, JobsClient};
pub use events::{decode_event, JobEvent};
pub use manager::{ConnectionManager, LinkState};
pub use reconnect::ReconnectConfig;
pub use registry::{JobRegistry, RegistryError};
pub use router::route_events;
pub use submit::{SubmissionCoordinator, SubmitError};
