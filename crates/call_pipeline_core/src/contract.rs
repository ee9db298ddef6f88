use serde::{Deserialize, Serialize};

pub const INGEST_STATUS_PROCESSED: &str = "File processed";

pub const ATTR_CALL_ID: &str = "CallID";
pub const ATTR_PHONE_NUMBER: &str = "PhoneNumber";
pub const ATTR_TIMESTAMP: &str = "Timestamp";
pub const ATTR_STATUS: &str = "Status";
pub const ATTR_MESSAGE: &str = "Message";

/// One call to be placed, as carried on the queue.
///
/// Field values are passed through verbatim from the CSV row; nothing is
/// normalized or validated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CallRequest {
    pub phone_number: String,
    pub timestamp: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CallStatus {
    Success,
}

impl CallStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "Success",
        }
    }
}

/// Persisted outcome of a placed call, keyed by the provider's call id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CallRecord {
    #[serde(rename = "CallID")]
    pub call_id: String,
    #[serde(rename = "PhoneNumber")]
    pub phone_number: String,
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
    #[serde(rename = "Status")]
    pub status: CallStatus,
    #[serde(rename = "Message")]
    pub message: String,
}

impl CallRecord {
    pub fn success(request: &CallRequest, call_id: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            phone_number: request.phone_number.clone(),
            timestamp: request.timestamp.clone(),
            status: CallStatus::Success,
            message: request.message.clone(),
        }
    }

    /// Table attributes in write order, key attribute first.
    pub fn attributes(&self) -> [(&'static str, &str); 5] {
        [
            (ATTR_CALL_ID, self.call_id.as_str()),
            (ATTR_PHONE_NUMBER, self.phone_number.as_str()),
            (ATTR_TIMESTAMP, self.timestamp.as_str()),
            (ATTR_STATUS, self.status.as_str()),
            (ATTR_MESSAGE, self.message.as_str()),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IngestResponse {
    pub status: String,
    pub objects_processed: usize,
    pub messages_sent: usize,
}

impl IngestResponse {
    pub fn processed(objects_processed: usize, messages_sent: usize) -> Self {
        Self {
            status: INGEST_STATUS_PROCESSED.to_string(),
            objects_processed,
            messages_sent,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BatchItemFailure {
    #[serde(rename = "itemIdentifier")]
    pub item_identifier: String,
}

/// SQS partial batch reply. An empty list acknowledges every record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DispatchResponse {
    #[serde(rename = "batchItemFailures")]
    pub batch_item_failures: Vec<BatchItemFailure>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DispatchSummary {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
}
