//! Config Module
//!
//! Per-instance tuning for the prop controller and the error type for
//! loading it.

pub mod prop_config;

pub use prop_config::{ConfigError, PropConfig};
