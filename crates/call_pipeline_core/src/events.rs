//! Decoding of the two Lambda trigger payloads: S3 object-created
//! notifications and SQS message batches.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EventError {
    #[error("malformed S3 notification: {0}")]
    MalformedNotification(#[source] serde_json::Error),
    #[error("S3 notification carries no records")]
    NoRecords,
    #[error("object key '{key}' is not valid percent-encoded UTF-8")]
    KeyEncoding {
        key: String,
        #[source]
        source: std::string::FromUtf8Error,
    },
    #[error("SQS event must include Records array")]
    MissingQueueRecords,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectLocation {
    pub bucket: String,
    pub key: String,
}

#[derive(Debug, Deserialize)]
struct S3Notification {
    #[serde(rename = "Records", default)]
    records: Vec<S3NotificationRecord>,
}

#[derive(Debug, Deserialize)]
struct S3NotificationRecord {
    s3: S3Entity,
}

#[derive(Debug, Deserialize)]
struct S3Entity {
    bucket: S3Bucket,
    object: S3Object,
}

#[derive(Debug, Deserialize)]
struct S3Bucket {
    name: String,
}

#[derive(Debug, Deserialize)]
struct S3Object {
    key: String,
}

/// Extracts the objects named by an S3 notification, in record order.
pub fn decode_object_created(event: Value) -> Result<Vec<ObjectLocation>, EventError> {
    let notification: S3Notification =
        serde_json::from_value(event).map_err(EventError::MalformedNotification)?;
    if notification.records.is_empty() {
        return Err(EventError::NoRecords);
    }

    notification
        .records
        .into_iter()
        .map(|record| {
            Ok(ObjectLocation {
                bucket: record.s3.bucket.name,
                key: decode_object_key(&record.s3.object.key)?,
            })
        })
        .collect()
}

/// S3 notifications form-encode keys: spaces arrive as `+`.
pub fn decode_object_key(raw: &str) -> Result<String, EventError> {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|decoded| decoded.into_owned())
        .map_err(|source| EventError::KeyEncoding {
            key: raw.to_string(),
            source,
        })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueMessage {
    pub message_id: String,
    /// `None` when the record's body is absent or not a string.
    pub body: Option<String>,
}

pub fn decode_queue_messages(event: &Value) -> Result<Vec<QueueMessage>, EventError> {
    let records = event
        .get("Records")
        .and_then(Value::as_array)
        .ok_or(EventError::MissingQueueRecords)?;

    Ok(records
        .iter()
        .enumerate()
        .map(|(index, record)| QueueMessage {
            message_id: record
                .get("messageId")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("record-{index}")),
            body: record
                .get("body")
                .and_then(Value::as_str)
                .map(str::to_string),
        })
        .collect())
}
