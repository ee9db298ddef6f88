//! AWS-facing handlers and adapters for the CSV-to-voice-call pipeline.
//!
//! `handlers` holds the per-invocation logic for both Lambdas and talks to the
//! outside world only through the traits in `adapters`. The binaries under
//! `src/bin` wire those traits to S3, SQS, DynamoDB and the Vonage Voice API.

pub mod adapters;
pub mod config;
pub mod handlers;
pub mod logging;

pub use call_pipeline_core as runtime;
