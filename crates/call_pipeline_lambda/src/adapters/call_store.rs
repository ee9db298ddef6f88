use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use call_pipeline_core::contract::CallRecord;

use super::block_on;

pub trait CallRecordStore {
    fn put_record(&self, record: &CallRecord) -> Result<(), String>;
}

#[derive(Debug, Clone)]
pub struct DynamoCallRecordStore {
    dynamodb_client: aws_sdk_dynamodb::Client,
    table_name: String,
}

impl DynamoCallRecordStore {
    pub fn new(dynamodb_client: aws_sdk_dynamodb::Client, table_name: impl Into<String>) -> Self {
        Self {
            dynamodb_client,
            table_name: table_name.into(),
        }
    }
}

impl CallRecordStore for DynamoCallRecordStore {
    fn put_record(&self, record: &CallRecord) -> Result<(), String> {
        let mut request = self
            .dynamodb_client
            .put_item()
            .table_name(self.table_name.clone());
        for (name, value) in record.attributes() {
            request = request.item(name, AttributeValue::S(value.to_string()));
        }

        block_on(async move {
            request.send().await.map(|_| ()).map_err(|error| {
                format!("failed to write call record: {}", DisplayErrorContext(&error))
            })
        })
    }
}
