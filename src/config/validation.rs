//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses, the upstream URL and the route path
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::ProxyConfig;
use crate::http::server::HEALTH_ROUTE;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is not a socket address: {value}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("upstream.base_url is invalid: {0}")]
    InvalidUpstreamUrl(String),

    #[error("listener.route must start with '/' and not be the health path: {0}")]
    InvalidRoute(String),

    #[error("upstream.timeout_secs must be greater than zero")]
    ZeroTimeout,
}

/// Check a parsed configuration, collecting every error.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if !config.listener.route.starts_with('/') || config.listener.route == HEALTH_ROUTE {
        errors.push(ValidationError::InvalidRoute(config.listener.route.clone()));
    }

    match Url::parse(&config.upstream.base_url) {
        Ok(url) if !matches!(url.scheme(), "http" | "https") => {
            errors.push(ValidationError::InvalidUpstreamUrl(format!(
                "unsupported scheme '{}'",
                url.scheme()
            )));
        }
        Ok(url) if url.query().is_some() => {
            errors.push(ValidationError::InvalidUpstreamUrl(
                "must not carry a query string".to_string(),
            ));
        }
        Ok(_) => {}
        Err(e) => errors.push(ValidationError::InvalidUpstreamUrl(e.to_string())),
    }

    if config.upstream.timeout_secs == Some(0) {
        errors.push(ValidationError::ZeroTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
