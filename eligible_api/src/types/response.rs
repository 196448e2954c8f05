//! Successful provider responses.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::Error;

/// A successful response body.
///
/// The provider defines the shape, so the body is kept as parsed JSON. In
/// debug mode the raw text is kept alongside it, outside the parsed body, so a
/// provider field named `raw` is never shadowed.
#[derive(Clone, Debug, PartialEq)]
pub struct CostEstimateResponse {
    body: Value,
    raw: Option<String>,
}

impl CostEstimateResponse {
    pub fn new(body: Value, raw: Option<String>) -> Self {
        Self { body, raw }
    }

    /// A top-level field of the body. `None` when the body is not an object.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.body.get(name)
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    /// The unparsed body. Only present when the client runs in debug mode.
    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }

    /// Deserializes the body into a caller-defined type.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, Error> {
        T::deserialize(&self.body).map_err(Error::Json)
    }

    /// The body with `raw` merged in beside the parsed fields.
    ///
    /// A `raw` field sent by the provider is kept as is. Non-object bodies are
    /// returned unchanged.
    pub fn into_value(self) -> Value {
        match (self.body, self.raw) {
            (Value::Object(mut fields), Some(raw)) => {
                fields.entry("raw").or_insert(Value::String(raw));
                Value::Object(fields)
            }
            (body, _) => body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;
    use std::collections::BTreeMap;

    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Estimates {
        cost_estimates: BTreeMap<String, f64>,
    }

    #[test]
    fn into_value_merges_raw() {
        let raw = r#"{"a":1}"#.to_string();
        let response = CostEstimateResponse::new(json!({"a": 1}), Some(raw.clone()));
        assert_eq!(response.into_value(), json!({"a": 1, "raw": raw}));
    }

    #[test]
    fn into_value_without_raw() {
        let response = CostEstimateResponse::new(json!({"a": 1}), None);
        assert_eq!(response.into_value(), json!({"a": 1}));
    }

    #[test]
    fn provider_raw_field_is_not_shadowed() {
        let response =
            CostEstimateResponse::new(json!({"raw": "provider"}), Some("{...}".to_string()));
        assert_eq!(response.get("raw"), Some(&json!("provider")));
        assert_eq!(response.raw(), Some("{...}"));
        assert_eq!(response.into_value(), json!({"raw": "provider"}));
    }

    #[test]
    fn non_object_body() {
        let response = CostEstimateResponse::new(json!([1, 2]), Some("[1,2]".to_string()));
        assert_eq!(response.get("raw"), None);
        assert_eq!(response.into_value(), json!([1, 2]));
    }

    #[test]
    fn deserialize_into_typed_struct() {
        let response = CostEstimateResponse::new(
            json!({"costEstimates": {"100": 20.0, "500": 100.0}}),
            None,
        );
        let estimates: Estimates = response.deserialize().unwrap();
        assert_eq!(estimates.cost_estimates["500"], 100.0);
        assert!(response.deserialize::<Vec<u8>>().is_err());
    }
}
