//! HTTP client for the Eligible cost-estimate API.

use serde_json::Value;
use url::Url;

use crate::{
    config::ClientConfig,
    errors::ProviderErrorResponse,
    params::{format_request, FormattedParameters},
    types::{CostEstimateRequest, CostEstimateResponse},
    Error,
};

/// Endpoint path of the cost-estimate operation.
pub const COST_ESTIMATE_PATH: &str = "coverage/cost_estimates.json";

/// HTTP client for the Eligible REST API.
///
/// Holds only read-only configuration, so one client can serve concurrent
/// calls. Each call owns its response buffer. No retries and no timeouts are
/// applied here; callers decide both.
#[derive(Clone, Debug)]
pub struct Client {
    config: ClientConfig,
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    /// Creates a client configured from `ELIGIBLE_API_ENDPOINT` and `ELIGIBLE_API_DEBUG`.
    pub fn new() -> Self {
        Self::with_config(ClientConfig::from_env())
    }

    /// Creates a client with a custom base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str) -> Self {
        Self::with_config(ClientConfig {
            base_url: base_url.to_string(),
            ..ClientConfig::default()
        })
    }

    pub fn with_config(config: ClientConfig) -> Self {
        Self { config }
    }

    /// Enables or disables keeping the raw body on successful responses.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.config.debug = debug;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Validates, formats and sends a cost-estimate request.
    ///
    /// Invalid requests fail with [`Error::Validation`] before anything is sent.
    pub async fn cost_estimate(
        &self,
        request: &CostEstimateRequest,
        api_key: &str,
    ) -> Result<CostEstimateResponse, Error> {
        if api_key.trim().is_empty() {
            return Err(Error::Domain(
                "An API key is required to request a cost estimate".to_string(),
            ));
        }
        request.validate()?;
        let params = format_request(request, api_key);
        self.estimate(COST_ESTIMATE_PATH, &params).await
    }

    /// Sends already formatted parameters to `endpoint_path` and interprets the reply.
    pub async fn estimate(
        &self,
        endpoint_path: &str,
        params: &FormattedParameters,
    ) -> Result<CostEstimateResponse, Error> {
        let url = self.request_url(endpoint_path, params)?;
        tracing::debug!("Requesting {}", redact_api_key(&url));
        let raw = self.fetch(url).await?;
        interpret_body(raw, self.config.debug)
    }

    /// `{base_url}/{endpoint_path}?{key=value&...}` with values passed through as formatted.
    pub fn request_url(
        &self,
        endpoint_path: &str,
        params: &FormattedParameters,
    ) -> Result<Url, Error> {
        let mut url = format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint_path.trim_start_matches('/')
        );
        if !params.is_empty() {
            url.push('?');
            url.push_str(&params.to_query_string());
        }
        Url::parse(&url).map_err(|e| {
            tracing::error!("Invalid URL constructed: {}", e);
            Error::InvalidUrl(e)
        })
    }

    async fn fetch(&self, url: Url) -> Result<String, Error> {
        let client = reqwest::Client::builder().build().map_err(|e| {
            tracing::error!("Failed to build HTTP client: {}", e);
            Error::Transport(e)
        })?;
        let mut resp = client
            .get(url)
            .header("accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to reach provider: {}", e);
                Error::Transport(e)
            })?;

        let status = resp.status();
        let mut body = Vec::new();
        while let Some(chunk) = resp.chunk().await.map_err(|e| {
            tracing::error!("Failed to read response body: {}", e);
            Error::Transport(e)
        })? {
            body.extend_from_slice(&chunk);
        }
        tracing::debug!("Received status {} with {} bytes", status, body.len());

        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

/// Turns a complete response body into a result.
///
/// The HTTP status is not consulted: the provider reports logical failures
/// in the body, and non-JSON bodies are surfaced verbatim.
fn interpret_body(raw: String, debug: bool) -> Result<CostEstimateResponse, Error> {
    let body: Value = match serde_json::from_str(&raw) {
        Ok(body) => body,
        Err(e) if e.is_syntax() || e.is_eof() => {
            tracing::warn!("Provider returned a non-JSON body: {}", truncate_body(&raw));
            return Err(Error::Parse { raw });
        }
        Err(e) => return Err(Error::Json(e)),
    };

    if body.get("error").is_some_and(is_error_signal) {
        let response = ProviderErrorResponse::new(body, raw);
        tracing::warn!(
            "Provider returned an error-response: {}",
            response.reject_reason_description().unwrap_or("no description")
        );
        return Err(response.into());
    }

    Ok(CostEstimateResponse::new(body, debug.then_some(raw)))
}

/// `null`, `false`, `0` and `""` leave the `error` key unset in effect.
fn is_error_signal(error: &Value) -> bool {
    match error {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn redact_api_key(url: &Url) -> String {
    if !url.query_pairs().any(|(key, _)| key == "api_key") {
        return url.to_string();
    }
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(key, value)| {
            let value = if key == "api_key" {
                "***".to_string()
            } else {
                value.into_owned()
            };
            (key.into_owned(), value)
        })
        .collect();
    let mut redacted = url.clone();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let end = (0..=MAX)
            .rev()
            .find(|&i| body.is_char_boundary(i))
            .unwrap_or(0);
        format!("{}...[truncated]", &body[..end])
    }
}
