//! Shared domain types for the Easel generation client.
//!
//! This crate defines the vocabulary the rest of the workspace speaks:
//!
//! - [`JobStatus`], [`JobRecord`] — client-side job lifecycle state.
//! - [`GeneratedImage`], [`ProgressUpdate`] — result and progress payloads
//!   as the worker reports them.
//! - [`GenerationParams`] — user-facing generation parameters with the
//!   worker's defaults.

pub mod job;
pub mod params;
pub mod types;

pub use job::{GeneratedImage, JobRecord, JobStatus, ProgressUpdate};
pub use params::GenerationParams;
pub use types::{JobId, Timestamp};
