//! Request and response bodies for the Vonage Voice `POST /v1/calls` API.

use serde::{Deserialize, Serialize};

use crate::contract::CallRequest;

/// One step of a call-control script.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum NccoAction {
    Talk { text: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Endpoint {
    Phone { number: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateCallRequest {
    pub to: Vec<Endpoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<Endpoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub random_from_number: Option<bool>,
    pub ncco: Vec<NccoAction>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateCallResponse {
    pub uuid: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub direction: Option<String>,
    #[serde(default)]
    pub conversation_uuid: Option<String>,
}

pub fn talk_script(text: &str) -> Vec<NccoAction> {
    vec![NccoAction::Talk {
        text: text.to_string(),
    }]
}

impl CreateCallRequest {
    /// Builds a call that speaks the request's message to its phone number.
    ///
    /// Without a caller number the provider picks one from the application's
    /// linked numbers.
    pub fn speak(request: &CallRequest, from_number: Option<&str>) -> Self {
        let from = from_number.map(|number| Endpoint::Phone {
            number: number.to_string(),
        });
        Self {
            to: vec![Endpoint::Phone {
                number: request.phone_number.clone(),
            }],
            random_from_number: from.is_none().then_some(true),
            from,
            ncco: talk_script(&request.message),
        }
    }
}
