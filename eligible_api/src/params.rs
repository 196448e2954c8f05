//! Conversion of a [`CostEstimateRequest`] into the provider's flat query parameters.

use crate::types::{CostEstimateRequest, OneOrMany};

/// Flat, ordered wire parameters with unique keys.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormattedParameters {
    pairs: Vec<(String, String)>,
}

impl FormattedParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to `value`. An existing key keeps its position and gets the new value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = value,
            None => self.pairs.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// `key=value` pairs joined by `&`, in insertion order. Values are not escaped.
    pub fn to_query_string(&self) -> String {
        self.pairs
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl<K, V> FromIterator<(K, V)> for FormattedParameters
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = FormattedParameters::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

/// Maps a request onto the provider's parameter names.
///
/// Assumes the request already passed validation. Optional fields appear only
/// when set to a non-empty value.
pub fn format_request(request: &CostEstimateRequest, api_key: &str) -> FormattedParameters {
    let mut params = FormattedParameters::new();
    params.insert("api_key", api_key);
    params.insert(
        "provider_price",
        join(&request.provider_prices, |price| price.to_string()),
    );
    params.insert(
        "service_type",
        join(&request.service_types, |service_type| service_type.clone()),
    );
    params.insert("network", request.network.to_string());
    params.insert("payer_id", request.payer_id.as_str());
    params.insert("provider_last_name", request.provider_last_name.as_str());
    params.insert("provider_first_name", request.provider_first_name.as_str());
    params.insert("provider_npi", request.provider_npi.as_str());

    if let Some(place_of_service) = non_empty(&request.place_of_service) {
        params.insert("place_of_service", place_of_service);
    }
    if let Some(member_id) = non_empty(&request.member_id) {
        params.insert("member_id", member_id);
    }
    if let Some(first_name) = non_empty(&request.member_first_name) {
        params.insert("member_first_name", first_name.to_uppercase());
    }
    if let Some(last_name) = non_empty(&request.member_last_name) {
        params.insert("member_last_name", last_name.to_uppercase());
    }
    if let Some(date_of_birth) = request.member_date_of_birth {
        params.insert("member_dob", date_of_birth.format("%Y-%m-%d").to_string());
    }
    if let Some(level) = request.level {
        params.insert("level", level.to_string());
    }

    params
}

fn join<T>(values: &OneOrMany<T>, render: impl Fn(&T) -> String) -> String {
    match values {
        OneOrMany::One(value) => render(value),
        OneOrMany::Many(values) => values.iter().map(render).collect::<Vec<_>>().join(","),
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}
