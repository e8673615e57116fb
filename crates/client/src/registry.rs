//! Client-side job registry.
//!
//! [`JobRegistry`] is the sole authority for job state transitions. It
//! holds the ordered collection of [`JobRecord`]s (insertion order is
//! meaningful — the most recent submission is last) plus the identifier
//! of the currently active job, and is shared as `Arc<JobRegistry>`
//! between the submission flow and the event router.
//!
//! Events arrive at least once and possibly out of order, so every
//! mutation is total: an unknown ID or an event that would regress a
//! terminal job is absorbed as a no-op rather than an error. Only
//! [`add_job`](JobRegistry::add_job) rejects — a duplicate ID there
//! means a submission bug, not transport noise.

use tokio::sync::RwLock;

use easel_core::{GeneratedImage, JobId, JobRecord, JobStatus, ProgressUpdate};

use crate::events::JobEvent;

/// Progress value assigned on completion.
const FULL_PROGRESS: f64 = 100.0;

/// Ordered collection of tracked jobs with active-job bookkeeping.
pub struct JobRegistry {
    inner: RwLock<RegistryState>,
}

#[derive(Default)]
struct RegistryState {
    jobs: Vec<JobRecord>,
    active_job_id: Option<JobId>,
}

/// Errors surfaced by registry mutations.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// A job with this ID is already tracked.
    #[error("Job {0} is already tracked")]
    Duplicate(JobId),
}

impl JobRegistry {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(RegistryState::default()),
        }
    }

    /// Append a freshly-queued job for an acknowledged submission.
    ///
    /// Rejects duplicate IDs loudly: submissions are at-most-once per
    /// user action, so a collision is a caller bug.
    pub async fn add_job(
        &self,
        id: impl Into<JobId>,
        prompt: impl Into<String>,
    ) -> Result<(), RegistryError> {
        let id = id.into();
        let mut state = self.inner.write().await;
        if state.jobs.iter().any(|j| j.id == id) {
            return Err(RegistryError::Duplicate(id));
        }
        state.jobs.push(JobRecord::new(id, prompt));
        Ok(())
    }

    /// Transition a job to `Running` and mark it active.
    ///
    /// No-op if the ID is unknown or the job is already terminal;
    /// idempotent when the job is already running.
    pub async fn start_job(&self, id: &str) {
        let mut state = self.inner.write().await;
        let Some(job) = state.jobs.iter_mut().find(|j| j.id == id) else {
            return;
        };
        if job.status.is_terminal() {
            return;
        }
        job.status = JobStatus::Running;
        state.active_job_id = Some(id.to_string());
    }

    /// Merge a progress update into the matching job.
    ///
    /// The preview image is replaced only when the update carries one;
    /// otherwise the previous preview is retained.
    pub async fn apply_progress(&self, update: &ProgressUpdate) {
        let mut state = self.inner.write().await;
        let Some(job) = state.jobs.iter_mut().find(|j| j.id == update.job_id) else {
            return;
        };
        job.step = update.step;
        job.total_steps = update.total_steps;
        job.progress = update.percentage;
        if let Some(preview) = &update.preview_image {
            job.preview_image = Some(preview.clone());
        }
    }

    /// Transition a job to `Completed` with its results.
    ///
    /// Ignored when the job is unknown or already terminal. Clears
    /// active-job tracking if this job was the active one.
    pub async fn complete_job(&self, id: &str, images: Vec<GeneratedImage>, elapsed_seconds: f64) {
        let mut state = self.inner.write().await;
        let Some(job) = state.jobs.iter_mut().find(|j| j.id == id) else {
            return;
        };
        if job.status.is_terminal() {
            return;
        }
        job.status = JobStatus::Completed;
        job.progress = FULL_PROGRESS;
        job.images = images;
        job.elapsed_seconds = Some(elapsed_seconds);
        if state.active_job_id.as_deref() == Some(id) {
            state.active_job_id = None;
        }
    }

    /// Transition a job to `Failed` with its error message.
    ///
    /// Ignored when the job is unknown or already terminal. Clears
    /// active-job tracking if this job was the active one.
    pub async fn fail_job(&self, id: &str, error: &str) {
        let mut state = self.inner.write().await;
        let Some(job) = state.jobs.iter_mut().find(|j| j.id == id) else {
            return;
        };
        if job.status.is_terminal() {
            return;
        }
        job.status = JobStatus::Failed;
        job.error = Some(error.to_string());
        if state.active_job_id.as_deref() == Some(id) {
            state.active_job_id = None;
        }
    }

    /// Remove a single job from the collection. No-op on unknown ID.
    pub async fn remove_job(&self, id: &str) {
        let mut state = self.inner.write().await;
        state.jobs.retain(|j| j.id != id);
    }

    /// Remove every terminal job, keeping queued and running ones.
    pub async fn clear_finished(&self) {
        let mut state = self.inner.write().await;
        state.jobs.retain(|j| !j.status.is_terminal());
    }

    /// Apply one decoded lifecycle event.
    ///
    /// The match is exhaustive: a new event kind cannot be added without
    /// deciding its registry semantics here.
    pub async fn apply_event(&self, event: &JobEvent) {
        match event {
            JobEvent::Started(data) => self.start_job(&data.job_id).await,
            JobEvent::Progress(update) => self.apply_progress(update).await,
            JobEvent::Completed(data) => {
                self.complete_job(&data.job_id, data.images.clone(), data.elapsed_seconds)
                    .await
            }
            JobEvent::Failed(data) => self.fail_job(&data.job_id, &data.error).await,
        }
    }

    /// Snapshot of all tracked jobs in insertion order.
    pub async fn jobs(&self) -> Vec<JobRecord> {
        self.inner.read().await.jobs.clone()
    }

    /// Snapshot of a single job.
    pub async fn job(&self, id: &str) -> Option<JobRecord> {
        self.inner
            .read()
            .await
            .jobs
            .iter()
            .find(|j| j.id == id)
            .cloned()
    }

    /// The most recently started, not-yet-terminal job, if any.
    pub async fn active_job_id(&self) -> Option<JobId> {
        self.inner.read().await.active_job_id.clone()
    }

    /// Number of tracked jobs.
    pub async fn len(&self) -> usize {
        self.inner.read().await.jobs.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.jobs.is_empty()
    }
}

impl Default for JobRegistry {
    fn default() -> Self {
        Self::new()
    }
}
