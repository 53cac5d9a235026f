//! Lookup orchestration.
//!
//! # Data Flow
//! ```text
//! raw term
//!     → cache hit? serve
//!     → miss: encode term → upstream fetch
//!     → 2xx: rewrite body (optional) → store → serve
//!     → ≥300 / transport fault: error, nothing stored
//! ```

pub mod service;

pub use service::{Lookup, LookupService, LookupSource};
