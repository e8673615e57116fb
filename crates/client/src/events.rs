//! Job lifecycle event types and codec.
//!
//! The worker pushes JSON text frames of the shape
//! `{"type": "job:<kind>", ...}` over the jobs WebSocket. This module
//! deserializes them into a strongly-typed [`JobEvent`] enum via the
//! internally-tagged `"type"` field.

use serde::{Deserialize, Serialize};

use easel_core::{GeneratedImage, JobId, ProgressUpdate};

/// All recognized job lifecycle events.
///
/// The set is closed: adding a variant is a compile-visible change at
/// every dispatch site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum JobEvent {
    /// The worker began executing a job.
    #[serde(rename = "job:started")]
    Started(StartedData),

    /// Step-level progress, optionally carrying a preview frame.
    #[serde(rename = "job:progress")]
    Progress(ProgressUpdate),

    /// The job finished successfully with its result images.
    #[serde(rename = "job:completed")]
    Completed(CompletedData),

    /// The job finished with an error.
    #[serde(rename = "job:failed")]
    Failed(FailedData),
}

impl JobEvent {
    /// The job this event refers to.
    pub fn job_id(&self) -> &str {
        match self {
            Self::Started(data) => &data.job_id,
            Self::Progress(update) => &update.job_id,
            Self::Completed(data) => &data.job_id,
            Self::Failed(data) => &data.job_id,
        }
    }
}

/// Payload for `job:started` events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartedData {
    pub job_id: JobId,
}

/// Payload for `job:completed` events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedData {
    pub job_id: JobId,
    pub images: Vec<GeneratedImage>,
    pub elapsed_seconds: f64,
}

/// Payload for `job:failed` events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedData {
    pub job_id: JobId,
    pub error: String,
}

/// Decode a raw text frame into a [`JobEvent`], or nothing.
///
/// Malformed JSON, a missing mandatory field, and an unrecognized `type`
/// all yield `None`. The caller's contract is "event or nothing" — this
/// function never panics and never returns an error that could unwind
/// the receive loop.
pub fn decode_event(text: &str) -> Option<JobEvent> {
    serde_json::from_str(text).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_started() {
        let event = decode_event(r#"{"type":"job:started","job_id":"abc"}"#).unwrap();
        match event {
            JobEvent::Started(data) => assert_eq!(data.job_id, "abc"),
            other => panic!("Expected Started, got {other:?}"),
        }
    }

    #[test]
    fn decode_progress() {
        let json = r#"{"type":"job:progress","job_id":"abc","step":10,"total_steps":20,"percentage":50.0,"preview_image":null}"#;
        let event = decode_event(json).unwrap();
        match event {
            JobEvent::Progress(update) => {
                assert_eq!(update.job_id, "abc");
                assert_eq!(update.step, 10);
                assert_eq!(update.total_steps, 20);
                assert_eq!(update.percentage, 50.0);
                assert!(update.preview_image.is_none());
            }
            other => panic!("Expected Progress, got {other:?}"),
        }
    }

    #[test]
    fn decode_progress_with_preview() {
        let json = r#"{"type":"job:progress","job_id":"abc","step":1,"total_steps":4,"percentage":25.0,"preview_image":"aGVsbG8="}"#;
        let event = decode_event(json).unwrap();
        match event {
            JobEvent::Progress(update) => {
                assert_eq!(update.preview_image.as_deref(), Some("aGVsbG8="));
            }
            other => panic!("Expected Progress, got {other:?}"),
        }
    }

    #[test]
    fn decode_completed() {
        let json = r#"{"type":"job:completed","job_id":"abc","images":[{"id":"i1","file_path":"out/i1.png","thumbnail_path":"thumbs/i1.jpg","width":512,"height":512,"seed":42}],"elapsed_seconds":3.5}"#;
        let event = decode_event(json).unwrap();
        match event {
            JobEvent::Completed(data) => {
                assert_eq!(data.job_id, "abc");
                assert_eq!(data.images.len(), 1);
                assert_eq!(data.images[0].seed, 42);
                assert_eq!(data.elapsed_seconds, 3.5);
            }
            other => panic!("Expected Completed, got {other:?}"),
        }
    }

    #[test]
    fn decode_failed() {
        let json = r#"{"type":"job:failed","job_id":"abc","error":"out of memory"}"#;
        let event = decode_event(json).unwrap();
        match event {
            JobEvent::Failed(data) => {
                assert_eq!(data.job_id, "abc");
                assert_eq!(data.error, "out of memory");
            }
            other => panic!("Expected Failed, got {other:?}"),
        }
    }

    #[test]
    fn unknown_type_decodes_to_nothing() {
        assert!(decode_event(r#"{"type":"job:paused","job_id":"abc"}"#).is_none());
    }

    #[test]
    fn missing_mandatory_field_decodes_to_nothing() {
        // started without job_id
        assert!(decode_event(r#"{"type":"job:started"}"#).is_none());
        // progress without step counters
        assert!(decode_event(r#"{"type":"job:progress","job_id":"abc"}"#).is_none());
        // failed without error
        assert!(decode_event(r#"{"type":"job:failed","job_id":"abc"}"#).is_none());
    }

    #[test]
    fn non_object_payloads_decode_to_nothing() {
        assert!(decode_event("not json at all").is_none());
        assert!(decode_event("42").is_none());
        assert!(decode_event(r#""job:started""#).is_none());
        assert!(decode_event("[]").is_none());
    }

    #[test]
    fn round_trip_preserves_structure() {
        let events = [
            JobEvent::Started(StartedData {
                job_id: "a".into(),
            }),
            JobEvent::Progress(ProgressUpdate {
                job_id: "a".into(),
                step: 3,
                total_steps: 30,
                percentage: 10.0,
                preview_image: Some("cHJldmlldw==".into()),
            }),
            JobEvent::Completed(CompletedData {
                job_id: "a".into(),
                images: vec![GeneratedImage {
                    id: "i1".into(),
                    file_path: "out/i1.png".into(),
                    thumbnail_path: "thumbs/i1.jpg".into(),
                    width: 768,
                    height: 512,
                    seed: 1234,
                }],
                elapsed_seconds: 12.25,
            }),
            JobEvent::Failed(FailedData {
                job_id: "a".into(),
                error: "boom".into(),
            }),
        ];

        for event in events {
            let encoded = serde_json::to_string(&event).unwrap();
            let decoded = decode_event(&encoded).unwrap();
            assert_eq!(decoded, event);
        }
    }
}
