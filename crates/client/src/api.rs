//! REST client for the worker's HTTP endpoints.
//!
//! Wraps the worker's request/response API (job submission, status
//! polling, cancellation, model and gallery listing) using [`reqwest`].
//! The event stream is separate — see
//! [`ConnectionManager`](crate::manager::ConnectionManager).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use easel_core::{GeneratedImage, GenerationParams, JobId, JobStatus};

/// Generation mode for plain text-to-image requests.
pub const MODE_TXT2IMG: &str = "txt2img";

/// HTTP client for a single worker.
pub struct GenerationApi {
    client: reqwest::Client,
    base_url: String,
}

/// Request body for `POST /api/generate`.
///
/// A pass-through mapping of [`GenerationParams`]; the worker owns
/// validation.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    pub mode: String,
    pub prompt: String,
    pub negative_prompt: String,
    pub model_id: String,
    pub width: u32,
    pub height: u32,
    pub steps: u32,
    pub cfg_scale: f64,
    pub seed: i64,
    pub sampler: String,
    pub batch_size: u32,
}

impl From<&GenerationParams> for GenerateRequest {
    fn from(params: &GenerationParams) -> Self {
        Self {
            mode: MODE_TXT2IMG.into(),
            prompt: params.prompt.clone(),
            negative_prompt: params.negative_prompt.clone(),
            model_id: params.model_id.clone(),
            width: params.width,
            height: params.height,
            steps: params.steps,
            cfg_scale: params.cfg_scale,
            seed: params.seed,
            sampler: params.sampler.clone(),
            batch_size: params.batch_size,
        }
    }
}

/// A job as the worker describes it over HTTP.
///
/// Returned by `POST /api/generate` (echoing the accepted parameters)
/// and by `GET /api/jobs/{id}` when polling.
#[derive(Debug, Clone, Deserialize)]
pub struct JobDescriptor {
    pub id: JobId,
    pub status: JobStatus,
    pub mode: String,
    pub prompt: String,
    pub negative_prompt: String,
    pub model_id: String,
    pub width: u32,
    pub height: u32,
    pub steps: u32,
    pub cfg_scale: f64,
    pub seed: i64,
    pub sampler: String,
    #[serde(default)]
    pub images: Vec<GeneratedImage>,
    #[serde(default)]
    pub error_message: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

/// One installed model file.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    pub name: String,
    pub filename: String,
    /// Model kind: checkpoint, lora, vae, controlnet, upscaler.
    #[serde(rename = "type")]
    pub kind: String,
    pub size_bytes: u64,
}

/// Response of `GET /api/models`.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelList {
    pub models: Vec<ModelInfo>,
    pub active_model: Option<String>,
}

/// One image in the historical gallery.
#[derive(Debug, Clone, Deserialize)]
pub struct GalleryImage {
    pub id: String,
    pub job_id: JobId,
    pub file_path: String,
    pub thumbnail_path: String,
    pub width: u32,
    pub height: u32,
    pub seed: i64,
    pub prompt: String,
    pub negative_prompt: String,
    pub model_id: String,
    pub is_favorite: bool,
    pub created_at: DateTime<Utc>,
}

/// One page of `GET /api/gallery`.
#[derive(Debug, Clone, Deserialize)]
pub struct GalleryPage {
    pub images: Vec<GalleryImage>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

/// Errors from the worker's REST API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The worker returned a non-2xx status code.
    #[error("Worker API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

impl GenerationApi {
    /// Create a new API client for a worker.
    ///
    /// * `base_url` - Base HTTP URL, e.g. `http://127.0.0.1:7860`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create an API client reusing an existing [`reqwest::Client`]
    /// (for connection pooling or a configured request timeout).
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// Submit a generation job.
    ///
    /// Sends `POST /api/generate`. On success the worker has queued the
    /// job and assigned it an ID; lifecycle updates follow over the
    /// event stream.
    pub async fn generate(&self, request: &GenerateRequest) -> Result<JobDescriptor, ApiError> {
        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(request)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Fetch the current state of a job.
    ///
    /// Sends `GET /api/jobs/{id}`. Used to recover after event-stream
    /// gaps — the descriptor carries the authoritative status.
    pub async fn get_job(&self, id: &str) -> Result<JobDescriptor, ApiError> {
        let response = self
            .client
            .get(format!("{}/api/jobs/{id}", self.base_url))
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Request cancellation of a queued or running job.
    ///
    /// Sends `POST /api/jobs/{id}/cancel`. Cancellation is confirmed
    /// through the job descriptor, not through a pushed event.
    pub async fn cancel_job(&self, id: &str) -> Result<(), ApiError> {
        let response = self
            .client
            .post(format!("{}/api/jobs/{id}/cancel", self.base_url))
            .send()
            .await?;

        Self::check_status(response).await
    }

    /// List the models installed on the worker.
    ///
    /// Sends `GET /api/models`.
    pub async fn list_models(&self) -> Result<ModelList, ApiError> {
        let response = self
            .client
            .get(format!("{}/api/models", self.base_url))
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Fetch one page of the historical gallery.
    ///
    /// Sends `GET /api/gallery` with pagination query parameters.
    pub async fn gallery(
        &self,
        page: u32,
        page_size: u32,
        favorites_only: bool,
    ) -> Result<GalleryPage, ApiError> {
        let response = self
            .client
            .get(format!("{}/api/gallery", self.base_url))
            .query(&[
                ("page", page.to_string()),
                ("page_size", page_size.to_string()),
                ("favorites_only", favorites_only.to_string()),
            ])
            .send()
            .await?;

        Self::parse_response(response).await
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or an [`ApiError::Api`] containing
    /// the status and body text on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ApiError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }

    /// Assert the response has a success status code, discarding the body.
    async fn check_status(response: reqwest::Response) -> Result<(), ApiError> {
        Self::ensure_success(response).await?;
        Ok(())
    }
}
