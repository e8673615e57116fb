//! Integration tests for the event router.
//!
//! These feed decoded events through a broadcast channel — exactly what
//! the connection manager does — and verify the registry converges to
//! the expected state.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;

use easel_client::events::{CompletedData, StartedData};
use easel_client::{route_events, JobEvent, JobRegistry};
use easel_core::{JobStatus, ProgressUpdate};

/// Poll the registry until the job reaches the given status.
async fn wait_for_status(registry: &JobRegistry, id: &str, status: JobStatus) {
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            if registry.job(id).await.map(|j| j.status) == Some(status) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap_or_else(|_| panic!("Job {id} never reached {status:?}"));
}

// ---------------------------------------------------------------------------
// Test: a started/progress/completed sequence flows into the registry
// ---------------------------------------------------------------------------

#[tokio::test]
async fn event_sequence_flows_into_registry() {
    let registry = Arc::new(JobRegistry::new());
    let (tx, _) = broadcast::channel(16);

    let router = tokio::spawn(route_events(Arc::clone(&registry), tx.subscribe()));

    registry.add_job("A", "a fox").await.unwrap();

    tx.send(JobEvent::Started(StartedData { job_id: "A".into() }))
        .unwrap();
    tx.send(JobEvent::Progress(ProgressUpdate {
        job_id: "A".into(),
        step: 15,
        total_steps: 30,
        percentage: 50.0,
        preview_image: None,
    }))
    .unwrap();
    tx.send(JobEvent::Completed(CompletedData {
        job_id: "A".into(),
        images: vec![],
        elapsed_seconds: 4.0,
    }))
    .unwrap();

    wait_for_status(&registry, "A", JobStatus::Completed).await;

    let job = registry.job("A").await.unwrap();
    assert_eq!(job.step, 15);
    assert_eq!(job.progress, 100.0);
    assert_eq!(job.elapsed_seconds, Some(4.0));

    // Dropping the sender closes the stream and stops the router.
    drop(tx);
    tokio::time::timeout(Duration::from_secs(2), router)
        .await
        .expect("Router should shut down when the stream closes")
        .unwrap();
}

// ---------------------------------------------------------------------------
// Test: events for unknown jobs do not disturb the router or registry
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_job_events_do_not_disturb_routing() {
    let registry = Arc::new(JobRegistry::new());
    let (tx, _) = broadcast::channel(16);

    let _router = tokio::spawn(route_events(Arc::clone(&registry), tx.subscribe()));

    tx.send(JobEvent::Started(StartedData {
        job_id: "ghost".into(),
    }))
    .unwrap();

    registry.add_job("A", "real").await.unwrap();
    tx.send(JobEvent::Started(StartedData { job_id: "A".into() }))
        .unwrap();

    wait_for_status(&registry, "A", JobStatus::Running).await;
    assert_eq!(registry.len().await, 1);
}
