//! Configuration module for Railsnap
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files.
//!
//! # Example
//!
//! ```no_run
//! use railsnap::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Daily call cap: {}", config.budget.daily_cap);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    BudgetConfig, Config, Continuation, OutputConfig, ProviderConfig, TimeConfig,
};

// Re-export parser and validation functions
pub use parser::load_config;
pub use validation::{parse_timezone, validate};
