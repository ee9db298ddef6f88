use call_pipeline_core::contract::{
    BatchItemFailure, CallRecord, CallRequest, DispatchResponse, DispatchSummary,
};
use call_pipeline_core::events::{decode_queue_messages, EventError, QueueMessage};
use call_pipeline_core::ncco::CreateCallRequest;
use serde_json::Value;
use thiserror::Error;

use crate::adapters::call_store::CallRecordStore;
use crate::adapters::voice::VoiceCaller;
use crate::config::FailurePolicy;

const COMPONENT: &str = "call_dispatch";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchHandlerConfig {
    pub from_number: Option<String>,
    pub failure_policy: FailurePolicy,
}

#[derive(Debug, Error)]
pub enum DispatchRecordError {
    #[error("record body is missing or not a string")]
    MissingBody,
    #[error("malformed call request: {0}")]
    MalformedBody(#[from] serde_json::Error),
    #[error("call to {phone_number} failed: {message}")]
    Call {
        phone_number: String,
        message: String,
    },
    #[error("failed to store call record {call_id}: {message}")]
    Store { call_id: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub response: DispatchResponse,
    pub summary: DispatchSummary,
}

/// Places one call per queue record and stores a record for each success.
///
/// Only a malformed event envelope fails the invocation. Record failures are
/// logged and, under [`FailurePolicy::Redeliver`], reported back as batch item
/// failures.
pub fn handle_dispatch_event(
    event: &Value,
    config: &DispatchHandlerConfig,
    caller: &impl VoiceCaller,
    store: &impl CallRecordStore,
) -> Result<DispatchOutcome, EventError> {
    let messages = decode_queue_messages(event)?;
    Ok(dispatch_batch(&messages, config, caller, store))
}

pub fn dispatch_batch(
    messages: &[QueueMessage],
    config: &DispatchHandlerConfig,
    caller: &impl VoiceCaller,
    store: &impl CallRecordStore,
) -> DispatchOutcome {
    let mut summary = DispatchSummary {
        attempted: messages.len(),
        ..DispatchSummary::default()
    };
    let mut failed_ids = Vec::new();

    for message in messages {
        match dispatch_message(message, config, caller, store) {
            Ok(record) => {
                summary.succeeded += 1;
                tracing::info!(
                    component = COMPONENT,
                    event = "call_placed",
                    message_id = %message.message_id,
                    call_id = %record.call_id,
                    phone_number = %record.phone_number,
                );
            }
            Err(error) => {
                summary.failed += 1;
                tracing::error!(
                    component = COMPONENT,
                    event = "call_failed",
                    message_id = %message.message_id,
                    error = %error,
                );
                failed_ids.push(message.message_id.clone());
            }
        }
    }

    tracing::info!(
        component = COMPONENT,
        event = "batch_completed",
        attempted = summary.attempted,
        succeeded = summary.succeeded,
        failed = summary.failed,
    );

    let batch_item_failures = match config.failure_policy {
        FailurePolicy::Acknowledge => Vec::new(),
        FailurePolicy::Redeliver => failed_ids
            .into_iter()
            .map(|item_identifier| BatchItemFailure { item_identifier })
            .collect(),
    };

    DispatchOutcome {
        response: DispatchResponse {
            batch_item_failures,
        },
        summary,
    }
}

pub fn dispatch_message(
    message: &QueueMessage,
    config: &DispatchHandlerConfig,
    caller: &impl VoiceCaller,
    store: &impl CallRecordStore,
) -> Result<CallRecord, DispatchRecordError> {
    let body = message
        .body
        .as_deref()
        .ok_or(DispatchRecordError::MissingBody)?;
    let request: CallRequest = serde_json::from_str(body)?;

    let call = CreateCallRequest::speak(&request, config.from_number.as_deref());
    let placed = caller
        .place_call(&call)
        .map_err(|message| DispatchRecordError::Call {
            phone_number: request.phone_number.clone(),
            message,
        })?;

    let record = CallRecord::success(&request, placed.uuid);
    store
        .put_record(&record)
        .map_err(|message| DispatchRecordError::Store {
            call_id: record.call_id.clone(),
            message,
        })?;
    Ok(record)
}
