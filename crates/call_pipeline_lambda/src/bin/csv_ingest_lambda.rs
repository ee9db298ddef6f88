use call_pipeline_lambda::adapters::message_queue::SqsMessageQueue;
use call_pipeline_lambda::adapters::object_source::S3ObjectSource;
use call_pipeline_lambda::config::IngestConfig;
use call_pipeline_lambda::handlers::ingest::handle_ingest_event;
use call_pipeline_lambda::logging::{init_logging, DEFAULT_FILTER};
use call_pipeline_lambda::runtime::contract::IngestResponse;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;

struct IngestDependencies {
    source: S3ObjectSource,
    queue: SqsMessageQueue,
}

async fn handle_request(
    event: LambdaEvent<Value>,
    deps: &IngestDependencies,
) -> Result<IngestResponse, Error> {
    handle_ingest_event(event.payload, &deps.source, &deps.queue)
        .map_err(|error| Error::from(error.to_string()))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_logging(DEFAULT_FILTER);

    let config = IngestConfig::from_env();
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let deps = IngestDependencies {
        source: S3ObjectSource::new(aws_sdk_s3::Client::new(&aws_config)),
        queue: SqsMessageQueue::new(aws_sdk_sqs::Client::new(&aws_config), &config.queue_url),
    };
    tracing::info!(
        component = "csv_ingest",
        event = "cold_start",
        queue_url = %config.queue_url,
    );

    let deps = &deps;
    lambda_runtime::run(service_fn(move |event| handle_request(event, deps))).await
}
