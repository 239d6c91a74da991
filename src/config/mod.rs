//! Configuration module for Gopher-Ripple
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key is optional; `Config::default()` describes a crawl of
//! gopher.floodgap.com with one crawler per core.
//!
//! # Example
//!
//! ```no_run
//! use gopher_ripple::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("gopher-ripple.toml")).unwrap();
//! println!("Crawling with {} crawlers", config.crawler.crawlers);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{BlacklistConfig, Config, CrawlerConfig, OutputConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};

pub use validation::validate;
