//! Upstream recordings API access.

pub mod client;

pub use client::{encode_term, UpstreamFetcher};
