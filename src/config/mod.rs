//! Configuration module for the harvester
//!
//! Every setting has a built-in default, so a configuration file is optional.
//! When one is given it is read as TOML, merged with command-line overrides by
//! the binary, and validated before any request is made.
//!
//! # Example
//!
//! ```no_run
//! use seoul_catalog_harvester::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Catalog page size: {}", config.paging.catalog_page_size);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{ApiConfig, HarvestConfig, HttpConfig, OutputConfig, PagingConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
