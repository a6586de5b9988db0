//! Core utilities for build descriptor tooling
//!
//! This crate provides the shared functionality every descriptor loader uses:
//!
//! - **Error handling**: Coded errors with context and recovery suggestions
//! - **Configuration**: TOML-based loader configuration with defaults
//! - **Validation**: Collection of non-fatal warnings and audit findings
//!
//! # Example
//!
//! ```rust,no_run
//! use builddesc_core::config::Config;
//!
//! let config = Config::load(None).expect("unreadable builddesc.toml");
//! println!("minSdk floor: {}", config.schema.sdk.min_floor);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
#[allow(missing_docs)]
pub mod error;
pub mod validation;

pub use error::{Error, ErrorCode, Result, ResultExt};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Config, ConfigSchema};
    pub use crate::error::{exit_codes, Error, ErrorCode, Result, ResultExt};
    pub use crate::validation::{ValidationIssue, ValidationReport};
}
