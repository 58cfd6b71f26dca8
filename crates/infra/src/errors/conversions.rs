//! Conversions from external infrastructure errors into domain errors.

use playlist_bridge_domain::BridgeError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub BridgeError);

impl From<InfraError> for BridgeError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<BridgeError> for InfraError {
    fn from(value: BridgeError) -> Self {
        InfraError(value)
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → BridgeError */
/* -------------------------------------------------------------------------- */

impl From<HttpError> for InfraError {
    fn from(err: HttpError) -> Self {
        let mapped = if err.is_builder() {
            BridgeError::Config(format!("invalid HTTP client configuration: {err}"))
        } else if err.is_timeout() {
            BridgeError::Network(format!("request timed out: {err}"))
        } else if err.is_connect() {
            BridgeError::Network(format!("connection failed: {err}"))
        } else if err.is_decode() {
            BridgeError::Network(format!("failed to decode response body: {err}"))
        } else {
            BridgeError::Network(err.to_string())
        };
        InfraError(mapped)
    }
}

/* -------------------------------------------------------------------------- */
/* serde / toml / io → BridgeError */
/* -------------------------------------------------------------------------- */

impl From<serde_json::Error> for InfraError {
    fn from(err: serde_json::Error) -> Self {
        InfraError(BridgeError::Config(format!("Invalid JSON format: {err}")))
    }
}

impl From<toml::de::Error> for InfraError {
    fn from(err: toml::de::Error) -> Self {
        InfraError(BridgeError::Config(format!("Invalid TOML format: {err}")))
    }
}

impl From<std::io::Error> for InfraError {
    fn from(err: std::io::Error) -> Self {
        InfraError(BridgeError::Config(format!("Failed to read config file: {err}")))
    }
}
