//! Response caching subsystem.
//!
//! # Data Flow
//! ```text
//! lookup(term)
//!     → store.rs (hit: serve cached body)
//!     → miss: inflight.rs (optional, share one fetch per term)
//!     → upstream fetch + rewrite
//!     → store.rs (only after a 2xx)
//! ```
//!
//! # Design Decisions
//! - Keyed by the raw term exactly as received
//! - No TTL, no size bound, no eviction
//! - Failures are never stored

pub mod inflight;
pub mod store;

pub use inflight::{FlightOutcome, InFlight};
pub use store::ResponseCache;
