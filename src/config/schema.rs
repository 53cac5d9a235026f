//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Default upstream recordings search endpoint.
pub const DEFAULT_UPSTREAM_URL: &str = "https://www.xeno-canto.org/api/2/recordings";

/// Root configuration for the lookup proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address, route).
    pub listener: ListenerConfig,

    /// Upstream recordings API settings.
    pub upstream: UpstreamConfig,

    /// Response body rewriting.
    pub transform: TransformConfig,

    /// Response cache behaviour.
    pub cache: CacheConfig,

    /// Headers added to successful responses.
    pub response: ResponseConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Path of the lookup endpoint.
    pub route: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            route: "/api/birds".to_string(),
        }
    }
}

/// Upstream API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Search endpoint; the encoded term is appended as `?query=`.
    pub base_url: String,

    /// Whole-request timeout in seconds. Unset means the client default.
    pub timeout_secs: Option<u64>,

    /// Honour `HTTP_PROXY`/`HTTPS_PROXY` for outbound calls.
    pub use_system_proxy: bool,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_UPSTREAM_URL.to_string(),
            timeout_secs: None,
            use_system_proxy: true,
        }
    }
}

/// What to do with a 2xx upstream body that is not a recordings document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MalformedBodyPolicy {
    /// Fail the request with 502; nothing is cached.
    #[default]
    Reject,
    /// Serve and cache the raw body untouched.
    Passthrough,
}

/// Body rewriting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TransformConfig {
    /// Strip the media host from recording links before caching.
    pub enabled: bool,

    /// Handling of bodies that fail to parse.
    pub on_malformed: MalformedBodyPolicy,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            on_malformed: MalformedBodyPolicy::Reject,
        }
    }
}

/// Cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct CacheConfig {
    /// Share a single upstream fetch between concurrent misses on one term.
    pub coalesce_in_flight: bool,
}

/// Response header configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ResponseConfig {
    /// Send `Access-Control-Allow-Origin: *` on successful lookups.
    pub allow_any_origin: bool,
}

impl Default for ResponseConfig {
    fn default() -> Self {
        Self {
            allow_any_origin: true,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log line format.
    pub log_format: LogFormat,

    /// Filter directives used when `RUST_LOG` is not set.
    pub log_filter: String,

    /// Enable the Prometheus scrape endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Pretty,
            log_filter: "xeno_proxy=info,tower_http=info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ProxyConfig::default();
        assert_eq!(config.listener.route, "/api/birds");
        assert_eq!(config.upstream.base_url, DEFAULT_UPSTREAM_URL);
        assert!(config.upstream.timeout_secs.is_none());
        assert!(config.transform.enabled);
        assert_eq!(config.transform.on_malformed, MalformedBodyPolicy::Reject);
        assert!(!config.cache.coalesce_in_flight);
        assert!(config.response.allow_any_origin);
        assert!(!config.observability.metrics_enabled);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: ProxyConfig = toml::from_str(
            r#"
            [transform]
            on_malformed = "passthrough"

            [cache]
            coalesce_in_flight = true
            "#,
        )
        .unwrap();

        assert!(config.transform.enabled);
        assert_eq!(config.transform.on_malformed, MalformedBodyPolicy::Passthrough);
        assert!(config.cache.coalesce_in_flight);
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
    }

    #[test]
    fn test_json_log_format() {
        let config: ProxyConfig = toml::from_str(
            r#"
            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.observability.log_format, LogFormat::Json);
    }
}
