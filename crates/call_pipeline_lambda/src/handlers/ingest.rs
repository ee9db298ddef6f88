use call_pipeline_core::contract::IngestResponse;
use call_pipeline_core::csv_rows::{call_request_rows, decode_object_text, CsvRowError};
use call_pipeline_core::events::{decode_object_created, EventError, ObjectLocation};
use serde_json::Value;
use thiserror::Error;

use crate::adapters::message_queue::MessageQueue;
use crate::adapters::object_source::ObjectSource;

const COMPONENT: &str = "csv_ingest";

#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Event(#[from] EventError),
    #[error("failed to fetch s3://{bucket}/{key}: {message}")]
    Fetch {
        bucket: String,
        key: String,
        message: String,
    },
    #[error("s3://{bucket}/{key}: {source}")]
    Parse {
        bucket: String,
        key: String,
        #[source]
        source: CsvRowError,
    },
    #[error("failed to serialize call request: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to enqueue data row {row} of s3://{bucket}/{key}: {message}")]
    Send {
        bucket: String,
        key: String,
        row: usize,
        message: String,
    },
}

/// Enqueues one call request per CSV data row of every object in the
/// notification.
///
/// Rows are sent in file order as they are parsed. The first failure aborts
/// the invocation; rows already sent stay on the queue.
pub fn handle_ingest_event(
    event: Value,
    source: &impl ObjectSource,
    queue: &impl MessageQueue,
) -> Result<IngestResponse, IngestError> {
    let locations = decode_object_created(event)?;

    let mut messages_sent = 0usize;
    for location in &locations {
        let sent = ingest_object(location, source, queue).inspect_err(|error| {
            tracing::error!(
                component = COMPONENT,
                event = "ingest_failed",
                bucket = %location.bucket,
                key = %location.key,
                error = %error,
            );
        })?;
        messages_sent += sent;
    }

    tracing::info!(
        component = COMPONENT,
        event = "ingest_completed",
        objects = locations.len(),
        messages_sent,
    );
    Ok(IngestResponse::processed(locations.len(), messages_sent))
}

fn ingest_object(
    location: &ObjectLocation,
    source: &impl ObjectSource,
    queue: &impl MessageQueue,
) -> Result<usize, IngestError> {
    let body = source
        .read_object(&location.bucket, &location.key)
        .map_err(|message| IngestError::Fetch {
            bucket: location.bucket.clone(),
            key: location.key.clone(),
            message,
        })?;
    tracing::info!(
        component = COMPONENT,
        event = "object_fetched",
        bucket = %location.bucket,
        key = %location.key,
        bytes = body.len(),
    );

    let parse_error = |source: CsvRowError| IngestError::Parse {
        bucket: location.bucket.clone(),
        key: location.key.clone(),
        source,
    };
    let text = decode_object_text(&body).map_err(parse_error)?;

    let mut sent = 0usize;
    for (index, row) in call_request_rows(text).enumerate() {
        let request = row.map_err(parse_error)?;
        let message_body = serde_json::to_string(&request)?;
        queue
            .send_message(&message_body)
            .map_err(|message| IngestError::Send {
                bucket: location.bucket.clone(),
                key: location.key.clone(),
                row: index + 1,
                message,
            })?;
        sent += 1;
    }

    Ok(sent)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use call_pipeline_core::contract::CallRequest;
    use serde_json::json;

    use super::*;

    struct InMemoryObjects {
        objects: HashMap<(String, String), Vec<u8>>,
    }

    impl InMemoryObjects {
        fn with(bucket: &str, key: &str, body: &str) -> Self {
            Self {
                objects: HashMap::from([(
                    (bucket.to_string(), key.to_string()),
                    body.as_bytes().to_vec(),
                )]),
            }
        }
    }

    impl ObjectSource for InMemoryObjects {
        fn read_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, String> {
            self.objects
                .get(&(bucket.to_string(), key.to_string()))
                .cloned()
                .ok_or_else(|| format!("NoSuchKey: {key}"))
        }
    }

    struct RecordingQueue {
        bodies: Mutex<Vec<String>>,
        fail_on_send: Option<usize>,
    }

    impl RecordingQueue {
        fn new() -> Self {
            Self {
                bodies: Mutex::new(Vec::new()),
                fail_on_send: None,
            }
        }

        fn failing_on(send_number: usize) -> Self {
            Self {
                bodies: Mutex::new(Vec::new()),
                fail_on_send: Some(send_number),
            }
        }

        fn requests(&self) -> Vec<CallRequest> {
            self.bodies
                .lock()
                .expect("poisoned mutex")
                .iter()
                .map(|body| serde_json::from_str(body).expect("body should be a call request"))
                .collect()
        }
    }

    impl MessageQueue for RecordingQueue {
        fn send_message(&self, body: &str) -> Result<(), String> {
            let mut bodies = self.bodies.lock().expect("poisoned mutex");
            if self.fail_on_send == Some(bodies.len() + 1) {
                return Err("AWS.SimpleQueueService.NonExistentQueue".to_string());
            }
            bodies.push(body.to_string());
            Ok(())
        }
    }

    fn notification(bucket: &str, key: &str) -> Value {
        json!({
            "Records": [{
                "eventSource": "aws:s3",
                "eventName": "ObjectCreated:Put",
                "s3": {"bucket": {"name": bucket}, "object": {"key": key}}
            }]
        })
    }

    const THREE_ROWS: &str = "phone_number,timestamp,message\n\
        447700900001,2024-05-01T09:00:00Z,Reminder one\n\
        447700900002,2024-05-01T09:05:00Z,\"Reminder, two\"\n\
        447700900003,2024-05-01T09:10:00Z,Reminder three\n";

    #[test]
    fn enqueues_one_message_per_row_verbatim() {
        let objects = InMemoryObjects::with("uploads", "calls.csv", THREE_ROWS);
        let queue = RecordingQueue::new();

        let response = handle_ingest_event(notification("uploads", "calls.csv"), &objects, &queue)
            .expect("ingest should succeed");

        assert_eq!(response.status, "File processed");
        assert_eq!(response.messages_sent, 3);
        assert_eq!(
            queue.requests(),
            vec![
                CallRequest {
                    phone_number: "447700900001".to_string(),
                    timestamp: "2024-05-01T09:00:00Z".to_string(),
                    message: "Reminder one".to_string(),
                },
                CallRequest {
                    phone_number: "447700900002".to_string(),
                    timestamp: "2024-05-01T09:05:00Z".to_string(),
                    message: "Reminder, two".to_string(),
                },
                CallRequest {
                    phone_number: "447700900003".to_string(),
                    timestamp: "2024-05-01T09:10:00Z".to_string(),
                    message: "Reminder three".to_string(),
                },
            ]
        );
    }

    #[test]
    fn missing_column_fails_without_sending() {
        let objects = InMemoryObjects::with(
            "uploads",
            "calls.csv",
            "phone_number,message\n447700900001,hello\n",
        );
        let queue = RecordingQueue::new();

        let error = handle_ingest_event(notification("uploads", "calls.csv"), &objects, &queue)
            .expect_err("missing timestamp column should fail");

        assert!(matches!(error, IngestError::Parse { .. }));
        assert!(queue.requests().is_empty());
    }

    #[test]
    fn malformed_row_stops_after_earlier_rows_are_sent() {
        let objects = InMemoryObjects::with(
            "uploads",
            "calls.csv",
            "phone_number,timestamp,message\n\
             447700900001,2024-05-01,first\n\
             447700900002\n\
             447700900003,2024-05-01,third\n",
        );
        let queue = RecordingQueue::new();

        let error = handle_ingest_event(notification("uploads", "calls.csv"), &objects, &queue)
            .expect_err("short row should fail");

        assert!(matches!(
            error,
            IngestError::Parse {
                source: CsvRowError::Row { row: 2, .. },
                ..
            }
        ));
        let sent = queue.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].message, "first");
    }

    #[test]
    fn send_failure_aborts_remaining_rows() {
        let objects = InMemoryObjects::with("uploads", "calls.csv", THREE_ROWS);
        let queue = RecordingQueue::failing_on(2);

        let error = handle_ingest_event(notification("uploads", "calls.csv"), &objects, &queue)
            .expect_err("second send fails");

        assert!(matches!(error, IngestError::Send { row: 2, .. }));
        assert_eq!(queue.requests().len(), 1);
    }

    #[test]
    fn fetch_failure_propagates() {
        let objects = InMemoryObjects::with("uploads", "calls.csv", THREE_ROWS);
        let queue = RecordingQueue::new();

        let error = handle_ingest_event(notification("uploads", "other.csv"), &objects, &queue)
            .expect_err("unknown key");

        assert!(error.to_string().contains("failed to fetch s3://uploads/other.csv"));
        assert!(queue.requests().is_empty());
    }

    #[test]
    fn reprocessing_same_object_duplicates_messages() {
        let objects = InMemoryObjects::with("uploads", "calls.csv", THREE_ROWS);
        let queue = RecordingQueue::new();

        for _ in 0..2 {
            handle_ingest_event(notification("uploads", "calls.csv"), &objects, &queue)
                .expect("ingest should succeed");
        }

        let sent = queue.requests();
        assert_eq!(sent.len(), 6);
        assert_eq!(sent[0..3], sent[3..6]);
    }

    #[test]
    fn fetches_url_decoded_key() {
        let objects = InMemoryObjects::with("uploads", "May calls.csv", THREE_ROWS);
        let queue = RecordingQueue::new();

        let response =
            handle_ingest_event(notification("uploads", "May+calls.csv"), &objects, &queue)
                .expect("decoded key should resolve");

        assert_eq!(response.messages_sent, 3);
    }

    #[test]
    fn accepts_closure_queue() {
        let objects = InMemoryObjects::with("uploads", "calls.csv", THREE_ROWS);
        let sent = Mutex::new(0usize);
        let queue = |_: &str| -> Result<(), String> {
            *sent.lock().expect("poisoned mutex") += 1;
            Ok(())
        };

        handle_ingest_event(notification("uploads", "calls.csv"), &objects, &queue)
            .expect("ingest should succeed");

        assert_eq!(*sent.lock().expect("poisoned mutex"), 3);
    }
}
