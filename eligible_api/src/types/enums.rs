//! Enumerated request values accepted by the provider.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Network relationship between the payer and the provider.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NetworkContext {
    /// In-network.
    #[serde(rename = "IN")]
    In,
    /// Out-of-network.
    #[serde(rename = "OUT")]
    Out,
}

impl NetworkContext {
    /// Every value the provider accepts for `network`, in wire form.
    pub const WIRE_VALUES: &'static [&'static str] = &["IN", "OUT"];

    pub const fn as_str(&self) -> &'static str {
        match self {
            NetworkContext::In => "IN",
            NetworkContext::Out => "OUT",
        }
    }
}

impl std::fmt::Display for NetworkContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for NetworkContext {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "IN" => Ok(NetworkContext::In),
            "OUT" => Ok(NetworkContext::Out),
            _ => Err(Error::Domain(format!(
                "unknown network '{}'. Valid values: {}",
                s,
                Self::WIRE_VALUES.join(", ")
            ))),
        }
    }
}

/// Whose benefits the estimate is computed against.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Level {
    #[serde(rename = "INDIVIDUAL")]
    Individual,
    #[serde(rename = "FAMILY")]
    Family,
}

impl Level {
    /// Every value the provider accepts for `level`, in wire form.
    pub const WIRE_VALUES: &'static [&'static str] = &["INDIVIDUAL", "FAMILY"];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Level::Individual => "INDIVIDUAL",
            Level::Family => "FAMILY",
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Level {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "INDIVIDUAL" => Ok(Level::Individual),
            "FAMILY" => Ok(Level::Family),
            _ => Err(Error::Domain(format!(
                "unknown level '{}'. Valid values: {}",
                s,
                Self::WIRE_VALUES.join(", ")
            ))),
        }
    }
}
