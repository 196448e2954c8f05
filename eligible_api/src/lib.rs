//! Client for the Eligible cost-estimate REST API.
//!
//! Requests are validated against a declarative schema, mapped onto the
//! provider's query parameters, sent, and the JSON reply is turned into a
//! [`CostEstimateResponse`] or a typed [`Error`].

mod client;
mod config;
mod errors;
mod params;
pub mod types;
pub mod validation;
pub use self::client::{Client, COST_ESTIMATE_PATH};
pub use self::config::{ClientConfig, DEBUG_ENV, DEFAULT_ENDPOINT, ENDPOINT_ENV};
pub use self::errors::{Error, ProviderErrorResponse};
pub use self::params::{format_request, FormattedParameters};
pub use self::types::{
    CostEstimateRequest, CostEstimateResponse, Level, NetworkContext, OneOrMany, ProviderData,
};
pub use self::validation::{validate, Constraint, ValidationError, ValidationViolation};
