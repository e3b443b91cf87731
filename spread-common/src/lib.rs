//! Spread Common - Shared utilities for the credit-spread selection pipeline.
//!
//! This crate provides:
//! - Configuration file discovery and loading
//! - Configuration validation
//! - Error types and handling utilities
//! - Logging setup
//! - Small text utilities used by report rendering

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod logging;
pub mod util;
pub mod validation;

pub use config::{config_dir, config_path, expand_path, load_json_config, ObservabilityConfig};
pub use error::{Error, Result};
pub use logging::{init_logging, init_logging_with_exclusions};
pub use validation::{Validate, ValidationError, ValidationResult};
