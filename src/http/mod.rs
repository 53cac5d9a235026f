//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, trace spans)
//!     → handlers.rs (extract term, call lookup service)
//!     → 200 + JSON body, or upstream status with empty body
//! ```

pub mod handlers;
pub mod server;

pub use server::{AppState, HttpServer};
