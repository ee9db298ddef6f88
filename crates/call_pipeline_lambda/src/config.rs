//! Environment configuration for both Lambdas, read once per cold start.

use std::str::FromStr;

use thiserror::Error;

use crate::adapters::voice::{VonageCredentials, DEFAULT_API_BASE_URL};

pub const QUEUE_URL_ENV: &str = "CALLS_QUEUE_URL";
pub const TABLE_NAME_ENV: &str = "CALL_DETAILS_TABLE";
pub const APPLICATION_ID_ENV: &str = "VONAGE_APPLICATION_ID";
pub const PRIVATE_KEY_ENV: &str = "VONAGE_PRIVATE_KEY";
pub const PRIVATE_KEY_PATH_ENV: &str = "VONAGE_PRIVATE_KEY_PATH";
pub const API_BASE_URL_ENV: &str = "VONAGE_API_BASE_URL";
pub const FROM_NUMBER_ENV: &str = "VONAGE_FROM_NUMBER";
pub const FAILURE_POLICY_ENV: &str = "CALL_FAILURE_POLICY";

pub const DEFAULT_QUEUE_URL: &str =
    "https://sqs.us-east-1.amazonaws.com/YOUR_ACCOUNT_ID/calls-queue";
pub const DEFAULT_TABLE_NAME: &str = "CallDetails";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be configured")]
    Missing(&'static str),
    #[error("{name} has unsupported value '{value}'")]
    Invalid { name: &'static str, value: String },
    #[error("failed to read private key from {path}: {message}")]
    KeyFile { path: String, message: String },
}

/// What happens to queue records whose call could not be completed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Log the failure and let the whole batch be deleted from the queue.
    #[default]
    Acknowledge,
    /// Report failed message ids back so only those records are redelivered.
    Redeliver,
}

impl FromStr for FailurePolicy {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "acknowledge" => Ok(Self::Acknowledge),
            "redeliver" => Ok(Self::Redeliver),
            _ => Err(ConfigError::Invalid {
                name: FAILURE_POLICY_ENV,
                value: value.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestConfig {
    pub queue_url: String,
}

impl IngestConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            queue_url: configured(&lookup, QUEUE_URL_ENV)
                .unwrap_or_else(|| DEFAULT_QUEUE_URL.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchConfig {
    pub table_name: String,
    pub api_base_url: String,
    pub from_number: Option<String>,
    pub credentials: VonageCredentials,
    pub failure_policy: FailurePolicy,
}

impl DispatchConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let application_id = configured(&lookup, APPLICATION_ID_ENV)
            .ok_or(ConfigError::Missing(APPLICATION_ID_ENV))?;
        let private_key_pem = match configured(&lookup, PRIVATE_KEY_ENV) {
            Some(inline) => unescape_newlines(&inline),
            None => {
                let path = configured(&lookup, PRIVATE_KEY_PATH_ENV)
                    .ok_or(ConfigError::Missing(PRIVATE_KEY_ENV))?;
                std::fs::read_to_string(&path).map_err(|error| ConfigError::KeyFile {
                    path,
                    message: error.to_string(),
                })?
            }
        };
        let failure_policy = match configured(&lookup, FAILURE_POLICY_ENV) {
            Some(value) => value.parse()?,
            None => FailurePolicy::default(),
        };

        Ok(Self {
            table_name: configured(&lookup, TABLE_NAME_ENV)
                .unwrap_or_else(|| DEFAULT_TABLE_NAME.to_string()),
            api_base_url: configured(&lookup, API_BASE_URL_ENV)
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            from_number: configured(&lookup, FROM_NUMBER_ENV),
            credentials: VonageCredentials {
                application_id,
                private_key_pem,
            },
            failure_policy,
        })
    }
}

fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn configured(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

// Keys pasted into a single-line env var usually arrive with literal "\n".
fn unescape_newlines(pem: &str) -> String {
    if pem.contains('\n') {
        pem.to_string()
    } else {
        pem.replace("\\n", "\n")
    }
}
