//! Error types for the API client.

use std::fmt;

use serde_json::{Map, Value};

use crate::validation::ValidationError;

/// Name used when describing the provider in error messages.
const PROVIDER_NAME: &str = "Eligible";

/// Placeholder for descriptions the provider left out of an error response.
const NOT_PROVIDED: &str = "not provided";

/// Errors that can occur when validating, sending, or interpreting a request.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A client-side failure described by a message only.
    #[error("{0}")]
    Domain(String),
    /// The request did not match the request schema. Nothing was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The provider answered with an `error` object in the response body.
    #[error(transparent)]
    Provider(Box<ProviderErrorResponse>),
    /// The response body was not valid JSON. Displays as the raw body so
    /// provider text (HTML error pages, plain-text auth failures) is kept.
    #[error("{raw}")]
    Parse { raw: String },
    /// JSON handling failed for a reason other than malformed input.
    #[error(transparent)]
    Json(serde_json::Error),
    /// The endpoint and parameters did not form a valid URL.
    #[error("Invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// Connection-level failure, passed through from the HTTP client.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

impl From<ProviderErrorResponse> for Error {
    fn from(e: ProviderErrorResponse) -> Self {
        Self::Provider(Box::new(e))
    }
}

/// A logical rejection reported by the provider inside an otherwise normal
/// response, e.g. an unknown subscriber id.
///
/// Keeps every top-level field of the provider's body and the raw body text
/// so callers can inspect or log exactly what came back.
#[derive(Debug, Clone)]
pub struct ProviderErrorResponse {
    message: String,
    reject_reason_description: Option<String>,
    follow_up_action_description: Option<String>,
    fields: Map<String, Value>,
    raw: String,
}

impl ProviderErrorResponse {
    /// Builds the error from the parsed provider body and the text it was parsed from.
    pub fn new(response: Value, raw: impl Into<String>) -> Self {
        let error = response.get("error");
        let reject_reason_description = match error {
            Some(Value::String(description)) if !description.is_empty() => {
                Some(description.clone())
            }
            Some(error) => text_field(error, "reject_reason_description"),
            None => None,
        };
        // The provider spells this key with either an underscore or a hyphen.
        let follow_up_action_description = error.and_then(|error| {
            text_field(error, "follow_up_action_description")
                .or_else(|| text_field(error, "follow-up_action_description"))
        });

        let message = format!(
            "{} returned an error-response\nDescription: {}\nRecommended follow-up: {}",
            PROVIDER_NAME,
            reject_reason_description.as_deref().unwrap_or(NOT_PROVIDED),
            follow_up_action_description
                .as_deref()
                .unwrap_or(NOT_PROVIDED),
        );

        let fields = match response {
            Value::Object(fields) => fields,
            _ => Map::new(),
        };

        Self {
            message,
            reject_reason_description,
            follow_up_action_description,
            fields,
            raw: raw.into(),
        }
    }

    /// Human-readable summary of the rejection.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn reject_reason_description(&self) -> Option<&str> {
        self.reject_reason_description.as_deref()
    }

    pub fn follow_up_action_description(&self) -> Option<&str> {
        self.follow_up_action_description.as_deref()
    }

    /// Every top-level field of the provider's response body.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// A single top-level field of the provider's response body.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// The response body exactly as received.
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for ProviderErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ProviderErrorResponse {}

fn text_field(error: &Value, key: &str) -> Option<String> {
    match error.get(key)? {
        Value::Null => None,
        Value::String(text) if text.is_empty() => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}
