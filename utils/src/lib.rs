//! Shared utilities for the ballot client.

pub mod logging;

pub use logging::{init_logging, LogFormat};
