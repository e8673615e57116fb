//! Easel command-line client: submit a generation job and follow its
//! lifecycle over the worker's event stream until it finishes.
//!
//! This binary is the composition root — it owns the HTTP client, the
//! job registry, and the connection manager, and wires the event router
//! between them.

mod config;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use easel_client::{
    route_events, ConnectionManager, GenerationApi, JobEvent, JobRegistry, JobsClient,
    SubmissionCoordinator,
};
use easel_core::GenerationParams;

use config::ClientConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "easel=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let prompt = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    if prompt.trim().is_empty() {
        anyhow::bail!("Usage: easel <prompt>");
    }

    let config = ClientConfig::from_env();
    tracing::info!(server_url = %config.server_url, "Loaded client configuration");

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()
        .expect("Failed to build HTTP client");
    let api = Arc::new(GenerationApi::with_client(http, config.server_url.clone()));
    let registry = Arc::new(JobRegistry::new());

    let jobs_client = JobsClient::new(&config.server_url)?;
    let manager = ConnectionManager::new(jobs_client);

    // The router keeps the registry in sync with pushed events; this
    // process also follows the stream directly for console output.
    let router_handle = tokio::spawn(route_events(Arc::clone(&registry), manager.subscribe()));
    let mut events = manager.subscribe();

    manager.connect().await;

    let coordinator = SubmissionCoordinator::new(Arc::clone(&api), Arc::clone(&registry));
    let params = GenerationParams {
        prompt,
        ..Default::default()
    };

    let job_id = match coordinator.submit(&params).await {
        Ok(id) => id,
        Err(e) => {
            manager.disconnect().await;
            anyhow::bail!("{e}");
        }
    };
    println!("Submitted job {job_id}");

    follow_job(&job_id, &mut events, &api).await;

    manager.disconnect().await;
    router_handle.abort();
    Ok(())
}

/// Follow one job's events until it reaches a terminal state.
///
/// Ctrl-C requests cancellation over HTTP and returns; the worker
/// confirms through the job descriptor, not through a pushed event.
async fn follow_job(
    job_id: &str,
    events: &mut broadcast::Receiver<JobEvent>,
    api: &GenerationApi,
) {
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!(%job_id, "Interrupted, requesting cancellation");
                if let Err(e) = api.cancel_job(job_id).await {
                    tracing::warn!(error = %e, "Cancellation request failed");
                }
                return;
            }
            event = events.recv() => match event {
                Ok(event) if event.job_id() == job_id => {
                    if report_event(&event) {
                        return;
                    }
                }
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Event receiver lagged");
                }
                Err(broadcast::error::RecvError::Closed) => return,
            }
        }
    }
}

/// Print one lifecycle event; returns `true` once the job is terminal.
fn report_event(event: &JobEvent) -> bool {
    match event {
        JobEvent::Started(_) => {
            println!("Job started");
            false
        }
        JobEvent::Progress(update) => {
            println!(
                "  step {}/{} ({:.0}%)",
                update.step, update.total_steps, update.percentage
            );
            false
        }
        JobEvent::Completed(data) => {
            println!("Completed in {:.1}s:", data.elapsed_seconds);
            for image in &data.images {
                println!(
                    "  {} ({}x{}, seed {})",
                    image.file_path, image.width, image.height, image.seed
                );
            }
            true
        }
        JobEvent::Failed(data) => {
            println!("Failed: {}", data.error);
            true
        }
    }
}
