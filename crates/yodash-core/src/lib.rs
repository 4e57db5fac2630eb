//! Domain layer for Yodash.
//!
//! Types exchanged with the detection backends, the pure helpers that
//! shape them for display (filtering, overlay geometry, relative ages),
//! the session gate, and the ports implemented by outer layers.

pub mod config;
pub mod error;
pub mod filter;
pub mod model;
pub mod overlay;
pub mod ports;
pub mod session;
pub mod time_ago;

// Re-export common error type
pub use error::{DashError, Result};
