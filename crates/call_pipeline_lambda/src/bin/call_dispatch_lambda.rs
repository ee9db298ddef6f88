use call_pipeline_lambda::adapters::call_store::DynamoCallRecordStore;
use call_pipeline_lambda::adapters::voice::VonageVoiceClient;
use call_pipeline_lambda::config::DispatchConfig;
use call_pipeline_lambda::handlers::dispatch::{handle_dispatch_event, DispatchHandlerConfig};
use call_pipeline_lambda::logging::{init_logging, DEFAULT_FILTER};
use call_pipeline_lambda::runtime::contract::DispatchResponse;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;

struct DispatchDependencies {
    handler_config: DispatchHandlerConfig,
    caller: VonageVoiceClient,
    store: DynamoCallRecordStore,
}

async fn handle_request(
    event: LambdaEvent<Value>,
    deps: &DispatchDependencies,
) -> Result<DispatchResponse, Error> {
    let outcome =
        handle_dispatch_event(&event.payload, &deps.handler_config, &deps.caller, &deps.store)
            .map_err(|error| Error::from(error.to_string()))?;
    Ok(outcome.response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_logging(DEFAULT_FILTER);

    let config = DispatchConfig::from_env()?;
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let deps = DispatchDependencies {
        handler_config: DispatchHandlerConfig {
            from_number: config.from_number.clone(),
            failure_policy: config.failure_policy,
        },
        caller: VonageVoiceClient::new(&config.api_base_url, config.credentials.clone())?,
        store: DynamoCallRecordStore::new(
            aws_sdk_dynamodb::Client::new(&aws_config),
            &config.table_name,
        ),
    };
    tracing::info!(
        component = "call_dispatch",
        event = "cold_start",
        table_name = %config.table_name,
        api_base_url = %config.api_base_url,
        failure_policy = ?config.failure_policy,
    );

    let deps = &deps;
    lambda_runtime::run(service_fn(move |event| handle_request(event, deps))).await
}
