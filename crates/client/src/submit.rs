//! Submission flow: translate parameters into a generation request and
//! register the resulting job.
//!
//! [`SubmissionCoordinator`] performs the HTTP submission and, only
//! after the worker acknowledges it, records the job in the registry —
//! the registry never shows a job the worker does not know about. The
//! matching `job:started` event may race the HTTP response in either
//! order; the registry tolerates both.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use easel_core::{GenerationParams, JobId};

use crate::api::{ApiError, GenerateRequest, GenerationApi};
use crate::registry::{JobRegistry, RegistryError};

/// Errors surfaced to the user when a submission fails.
///
/// No automatic retry is attempted; the user resubmits. The `Display`
/// form is the user-visible message.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// The generation request itself failed (network or worker error).
    #[error("Failed to submit generation: {0}")]
    Request(#[from] ApiError),

    /// The worker returned an ID the registry already tracks.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Coordinates parameter submission against the worker.
pub struct SubmissionCoordinator {
    api: Arc<GenerationApi>,
    registry: Arc<JobRegistry>,
    submitting: AtomicBool,
}

impl SubmissionCoordinator {
    pub fn new(api: Arc<GenerationApi>, registry: Arc<JobRegistry>) -> Self {
        Self {
            api,
            registry,
            submitting: AtomicBool::new(false),
        }
    }

    /// Whether a submission request is currently in flight.
    ///
    /// Covers the UI's disable-while-submitting behaviour.
    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::SeqCst)
    }

    /// Submit the given parameter set as a new generation job.
    ///
    /// On success the job is registered as queued and its ID returned.
    /// On failure nothing is registered.
    pub async fn submit(&self, params: &GenerationParams) -> Result<JobId, SubmitError> {
        self.submitting.store(true, Ordering::SeqCst);
        let result = self.perform(params).await;
        self.submitting.store(false, Ordering::SeqCst);
        result
    }

    async fn perform(&self, params: &GenerationParams) -> Result<JobId, SubmitError> {
        let request = GenerateRequest::from(params);
        let descriptor = self.api.generate(&request).await?;

        self.registry
            .add_job(descriptor.id.clone(), params.prompt.as_str())
            .await?;

        tracing::info!(job_id = %descriptor.id, "Generation job submitted");
        Ok(descriptor.id)
    }
}
