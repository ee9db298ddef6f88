use aws_sdk_sqs::error::DisplayErrorContext;

use super::block_on;

pub trait MessageQueue {
    fn send_message(&self, body: &str) -> Result<(), String>;
}

impl<F> MessageQueue for F
where
    F: Fn(&str) -> Result<(), String>,
{
    fn send_message(&self, body: &str) -> Result<(), String> {
        self(body)
    }
}

#[derive(Debug, Clone)]
pub struct SqsMessageQueue {
    sqs_client: aws_sdk_sqs::Client,
    queue_url: String,
}

impl SqsMessageQueue {
    pub fn new(sqs_client: aws_sdk_sqs::Client, queue_url: impl Into<String>) -> Self {
        Self {
            sqs_client,
            queue_url: queue_url.into(),
        }
    }
}

impl MessageQueue for SqsMessageQueue {
    fn send_message(&self, body: &str) -> Result<(), String> {
        let client = self.sqs_client.clone();
        let queue_url = self.queue_url.clone();
        let message_body = body.to_string();

        block_on(async move {
            client
                .send_message()
                .queue_url(queue_url)
                .message_body(message_body)
                .send()
                .await
                .map(|_| ())
                .map_err(|error| {
                    format!("failed to enqueue call request: {}", DisplayErrorContext(&error))
                })
        })
    }
}
