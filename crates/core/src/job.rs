//! Client-side job lifecycle state.
//!
//! A [`JobRecord`] tracks one generation job from submission through its
//! terminal outcome. Records are created when the worker acknowledges a
//! submission and mutated only by the registry's lifecycle operations.

use serde::{Deserialize, Serialize};

use crate::types::JobId;

/// Lifecycle status of a generation job.
///
/// Transitions move forward only: `Queued -> Running -> {Completed, Failed}`.
/// `Cancelled` is reached through the HTTP cancellation cycle, never through
/// a pushed event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Accepted by the worker, not yet executing.
    Queued,
    /// The worker is executing the job.
    Running,
    /// Finished successfully; results are available.
    Completed,
    /// Finished with an error.
    Failed,
    /// Cancelled before completion.
    Cancelled,
}

impl JobStatus {
    /// Whether no further lifecycle event may change the job.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }
}

/// Descriptor of a single generated image as reported by the worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedImage {
    pub id: String,
    /// Path of the full-resolution image on the worker.
    pub file_path: String,
    /// Path of the thumbnail rendition on the worker.
    pub thumbnail_path: String,
    pub width: u32,
    pub height: u32,
    /// The seed that actually produced this image (resolved from -1).
    pub seed: i64,
}

/// Transient progress payload pushed by the worker during execution.
///
/// Applied to the matching [`JobRecord`] and discarded; never stored on
/// its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub job_id: JobId,
    /// Current sampling step.
    pub step: u32,
    pub total_steps: u32,
    /// Completion percentage (0-100).
    pub percentage: f64,
    /// Base64-encoded preview frame, when the worker sends one.
    pub preview_image: Option<String>,
}

/// One tracked generation job.
#[derive(Debug, Clone, PartialEq)]
pub struct JobRecord {
    /// Worker-assigned identifier, unique for the registry's lifetime.
    pub id: JobId,
    pub status: JobStatus,
    /// The prompt text as submitted.
    pub prompt: String,
    pub step: u32,
    pub total_steps: u32,
    /// Completion percentage (0-100); meaningful while running.
    pub progress: f64,
    /// Most recent preview frame, retained across updates without one.
    pub preview_image: Option<String>,
    /// Result descriptors, populated on completion.
    pub images: Vec<GeneratedImage>,
    /// Error message, present only when failed.
    pub error: Option<String>,
    /// Wall-clock duration, present only when completed.
    pub elapsed_seconds: Option<f64>,
}

impl JobRecord {
    /// Create a freshly-queued record for an acknowledged submission.
    pub fn new(id: impl Into<JobId>, prompt: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: JobStatus::Queued,
            prompt: prompt.into(),
            step: 0,
            total_steps: 0,
            progress: 0.0,
            preview_image: None,
            images: Vec::new(),
            error: None,
            elapsed_seconds: None,
        }
    }
}
