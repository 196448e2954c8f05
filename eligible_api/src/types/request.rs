//! The cost-estimate request built by callers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::enums::{Level, NetworkContext};
use crate::{validation, Error};

/// A value the provider accepts either alone or as a comma-joined list.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl From<f64> for OneOrMany<f64> {
    fn from(value: f64) -> Self {
        OneOrMany::One(value)
    }
}

impl From<Vec<f64>> for OneOrMany<f64> {
    fn from(values: Vec<f64>) -> Self {
        OneOrMany::Many(values)
    }
}

impl From<&[f64]> for OneOrMany<f64> {
    fn from(values: &[f64]) -> Self {
        OneOrMany::Many(values.to_vec())
    }
}

impl<const N: usize> From<[f64; N]> for OneOrMany<f64> {
    fn from(values: [f64; N]) -> Self {
        OneOrMany::Many(values.to_vec())
    }
}

impl From<&str> for OneOrMany<String> {
    fn from(value: &str) -> Self {
        OneOrMany::One(value.to_string())
    }
}

impl From<String> for OneOrMany<String> {
    fn from(value: String) -> Self {
        OneOrMany::One(value)
    }
}

impl From<Vec<String>> for OneOrMany<String> {
    fn from(values: Vec<String>) -> Self {
        OneOrMany::Many(values)
    }
}

impl From<Vec<&str>> for OneOrMany<String> {
    fn from(values: Vec<&str>) -> Self {
        OneOrMany::Many(values.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for OneOrMany<String> {
    fn from(values: [&str; N]) -> Self {
        OneOrMany::Many(values.iter().map(|v| v.to_string()).collect())
    }
}

/// The rendering provider whose prices are being estimated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderData {
    pub first_name: String,
    pub last_name: String,
    /// National Provider Identifier.
    pub npi: String,
}

impl ProviderData {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        npi: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            npi: npi.into(),
        }
    }
}

/// A request for an out-of-pocket cost estimate.
///
/// Serializes to the camelCase document the request schema in
/// [`crate::validation`] describes.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CostEstimateRequest {
    pub payer_id: String,

    /// Prices charged by the provider, one estimate is computed per price.
    pub provider_prices: OneOrMany<f64>,

    /// Service type codes, e.g. `"1"` for medical care.
    pub service_types: OneOrMany<String>,

    pub provider_first_name: String,

    pub provider_last_name: String,

    pub provider_npi: String,

    pub network: NetworkContext,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_first_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_last_name: Option<String>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "member_dob"
    )]
    pub member_date_of_birth: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<Level>,

    /// Place of service code. Accepts a number or a string on input.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "scalar_string"
    )]
    pub place_of_service: Option<String>,
}

impl CostEstimateRequest {
    /// Creates a request with every mandatory field set and no optional fields.
    pub fn new(
        payer_id: impl Into<String>,
        service_types: impl Into<OneOrMany<String>>,
        provider: &ProviderData,
        provider_prices: impl Into<OneOrMany<f64>>,
        network: NetworkContext,
    ) -> Self {
        Self {
            payer_id: payer_id.into(),
            provider_prices: provider_prices.into(),
            service_types: service_types.into(),
            provider_first_name: provider.first_name.clone(),
            provider_last_name: provider.last_name.clone(),
            provider_npi: provider.npi.clone(),
            network,
            member_id: None,
            member_first_name: None,
            member_last_name: None,
            member_date_of_birth: None,
            level: None,
            place_of_service: None,
        }
    }

    /// Validates an untyped request document and converts it into a request.
    ///
    /// Unknown fields are ignored.
    pub fn from_document(document: Value) -> Result<Self, Error> {
        validation::validate(&document)?;
        let cleaned = Value::Object(validation::clean(&document));
        serde_json::from_value(cleaned).map_err(Error::Json)
    }

    /// The camelCase JSON document this request is validated as.
    pub fn to_document(&self) -> Result<Value, Error> {
        serde_json::to_value(self).map_err(Error::Json)
    }

    /// Checks this request against the request schema.
    ///
    /// A single price or service type counts as a one-element list here.
    /// Untyped documents must still send lists.
    pub fn validate(&self) -> Result<(), Error> {
        let mut document = self.to_document()?;
        for name in ["providerPrices", "serviceTypes"] {
            if let Some(value) = document.get_mut(name) {
                if !value.is_array() {
                    *value = Value::Array(vec![value.take()]);
                }
            }
        }
        validation::validate(&document)?;
        Ok(())
    }

    pub fn with_member_id(mut self, member_id: impl Into<String>) -> Self {
        self.member_id = Some(member_id.into());
        self
    }

    pub fn with_member_first_name(mut self, first_name: impl Into<String>) -> Self {
        self.member_first_name = Some(first_name.into());
        self
    }

    pub fn with_member_last_name(mut self, last_name: impl Into<String>) -> Self {
        self.member_last_name = Some(last_name.into());
        self
    }

    pub fn with_member_date_of_birth(mut self, date_of_birth: NaiveDate) -> Self {
        self.member_date_of_birth = Some(date_of_birth);
        self
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = Some(level);
        self
    }

    pub fn with_place_of_service(mut self, place_of_service: impl ToString) -> Self {
        self.place_of_service = Some(place_of_service.to_string());
        self
    }
}

fn scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text)),
        Some(Value::Number(number)) => Ok(Some(number.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a string or number, found {}",
            other
        ))),
    }
}

mod member_dob {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::validation::parse_date;

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(date) => serializer.serialize_str(&date.format("%Y-%m-%d").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw {
            Some(text) if !text.trim().is_empty() => parse_date(&text)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid date '{}'", text))),
            _ => Ok(None),
        }
    }
}
