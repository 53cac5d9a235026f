//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML), optional
//!     → loader.rs (parse & deserialize, apply CLI overrides)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → handed to HttpServer at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, resolve_config, ConfigError, ConfigOverrides};
pub use schema::{
    CacheConfig, ListenerConfig, LogFormat, MalformedBodyPolicy, ObservabilityConfig,
    ProxyConfig, ResponseConfig, TransformConfig, UpstreamConfig,
};
