#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use call_pipeline_lambda::adapters::call_store::CallRecordStore;
use call_pipeline_lambda::adapters::message_queue::MessageQueue;
use call_pipeline_lambda::adapters::object_source::ObjectSource;
use call_pipeline_lambda::adapters::voice::VoiceCaller;
use call_pipeline_lambda::runtime::contract::CallRecord;
use call_pipeline_lambda::runtime::ncco::{CreateCallRequest, CreateCallResponse, Endpoint};
use serde_json::{json, Value};

/// Bucket contents keyed by `(bucket, key)`.
#[derive(Default)]
pub struct InMemoryBucket {
    objects: Mutex<HashMap<(String, String), Vec<u8>>>,
}

impl InMemoryBucket {
    pub fn put(&self, bucket: &str, key: &str, body: &str) {
        self.objects
            .lock()
            .expect("poisoned mutex")
            .insert((bucket.to_string(), key.to_string()), body.as_bytes().to_vec());
    }
}

impl ObjectSource for InMemoryBucket {
    fn read_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, String> {
        self.objects
            .lock()
            .expect("poisoned mutex")
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| format!("NoSuchKey: s3://{bucket}/{key}"))
    }
}

/// FIFO queue that hands its contents back as an SQS batch event.
#[derive(Default)]
pub struct InMemoryQueue {
    bodies: Mutex<Vec<String>>,
}

impl InMemoryQueue {
    pub fn bodies(&self) -> Vec<String> {
        self.bodies.lock().expect("poisoned mutex").clone()
    }

    pub fn drain_as_sqs_event(&self) -> Value {
        let bodies = std::mem::take(&mut *self.bodies.lock().expect("poisoned mutex"));
        let records: Vec<Value> = bodies
            .into_iter()
            .enumerate()
            .map(|(index, body)| {
                json!({
                    "messageId": format!("msg-{}", index + 1),
                    "eventSource": "aws:sqs",
                    "eventSourceARN": "arn:aws:sqs:us-east-1:123456789012:calls-queue",
                    "body": body,
                })
            })
            .collect();
        json!({ "Records": records })
    }
}

impl MessageQueue for InMemoryQueue {
    fn send_message(&self, body: &str) -> Result<(), String> {
        self.bodies
            .lock()
            .expect("poisoned mutex")
            .push(body.to_string());
        Ok(())
    }
}

/// Telephony fake that rejects listed numbers and hands out sequential ids.
#[derive(Default)]
pub struct FakeVoiceApi {
    rejected_numbers: Vec<String>,
    placed: Mutex<Vec<(String, String)>>,
}

impl FakeVoiceApi {
    pub fn rejecting(numbers: &[&str]) -> Self {
        Self {
            rejected_numbers: numbers.iter().map(|number| number.to_string()).collect(),
            placed: Mutex::new(Vec::new()),
        }
    }

    /// `(phone_number, call uuid)` for every accepted call.
    pub fn placed(&self) -> Vec<(String, String)> {
        self.placed.lock().expect("poisoned mutex").clone()
    }
}

impl VoiceCaller for FakeVoiceApi {
    fn place_call(&self, request: &CreateCallRequest) -> Result<CreateCallResponse, String> {
        let Endpoint::Phone { number } = &request.to[0];
        if self.rejected_numbers.contains(number) {
            return Err(format!("Vonage returned HTTP 400: invalid number {number}"));
        }
        let mut placed = self.placed.lock().expect("poisoned mutex");
        let uuid = format!("7b0d5a1e-0000-4000-8000-{:012}", placed.len() + 1);
        placed.push((number.clone(), uuid.clone()));
        Ok(CreateCallResponse {
            uuid,
            status: Some("started".to_string()),
            direction: Some("outbound".to_string()),
            conversation_uuid: None,
        })
    }
}

#[derive(Default)]
pub struct InMemoryTable {
    items: Mutex<HashMap<String, CallRecord>>,
}

impl InMemoryTable {
    pub fn len(&self) -> usize {
        self.items.lock().expect("poisoned mutex").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, call_id: &str) -> Option<CallRecord> {
        self.items
            .lock()
            .expect("poisoned mutex")
            .get(call_id)
            .cloned()
    }
}

impl CallRecordStore for InMemoryTable {
    fn put_record(&self, record: &CallRecord) -> Result<(), String> {
        self.items
            .lock()
            .expect("poisoned mutex")
            .insert(record.call_id.clone(), record.clone());
        Ok(())
    }
}

pub fn object_created(bucket: &str, key: &str) -> Value {
    json!({
        "Records": [{
            "eventVersion": "2.1",
            "eventSource": "aws:s3",
            "awsRegion": "us-east-1",
            "eventName": "ObjectCreated:Put",
            "s3": {
                "s3SchemaVersion": "1.0",
                "bucket": {"name": bucket, "arn": format!("arn:aws:s3:::{bucket}")},
                "object": {"key": key, "size": 512, "eTag": "d41d8cd98f00b204e9800998ecf8427e"}
            }
        }]
    })
}
