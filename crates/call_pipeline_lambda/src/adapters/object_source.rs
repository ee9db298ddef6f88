use aws_sdk_s3::error::DisplayErrorContext;

use super::block_on;

pub trait ObjectSource {
    fn read_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, String>;
}

#[derive(Debug, Clone)]
pub struct S3ObjectSource {
    s3_client: aws_sdk_s3::Client,
}

impl S3ObjectSource {
    pub fn new(s3_client: aws_sdk_s3::Client) -> Self {
        Self { s3_client }
    }
}

impl ObjectSource for S3ObjectSource {
    fn read_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, String> {
        let client = self.s3_client.clone();
        let bucket = bucket.to_string();
        let object_key = key.to_string();

        block_on(async move {
            let output = client
                .get_object()
                .bucket(bucket)
                .key(object_key)
                .send()
                .await
                .map_err(|error| {
                    format!("failed to read object from s3: {}", DisplayErrorContext(&error))
                })?;
            let body = output
                .body
                .collect()
                .await
                .map_err(|error| format!("failed to read s3 object body: {error}"))?;
            Ok::<_, String>(body.into_bytes().to_vec())
        })
    }
}
