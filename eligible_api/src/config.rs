//! Client configuration resolved from the environment.

/// Provider endpoint used when `ELIGIBLE_API_ENDPOINT` is not set.
pub const DEFAULT_ENDPOINT: &str = "https://gds.eligibleapi.com/v1.5";

/// Overrides the provider base URL.
pub const ENDPOINT_ENV: &str = "ELIGIBLE_API_ENDPOINT";

/// Attaches raw response bodies to successful results when truthy.
pub const DEBUG_ENV: &str = "ELIGIBLE_API_DEBUG";

/// Read-only settings shared by every call a [`crate::Client`] makes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL that endpoint paths are appended to.
    pub base_url: String,
    /// Keep the raw body on successful responses.
    pub debug: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_ENDPOINT.to_string(),
            debug: false,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base_url = lookup(ENDPOINT_ENV)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let debug = lookup(DEBUG_ENV).is_some_and(|value| parse_flag(&value));
        Self { base_url, debug }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
