//! Gopher-Ripple: a gopherspace terrain mapper
//!
//! This crate crawls gopher menus starting from a bootstrap server and maps
//! which servers reference which, producing a graphviz dot description of
//! the discovered server graph.

pub mod config;
pub mod crawler;
pub mod gopher;
pub mod output;
pub mod state;

use thiserror::Error;

/// Main error type for Gopher-Ripple operations
#[derive(Debug, Error)]
pub enum GopherError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Could not parse gopher line to resource: {line:?}")]
    Parse { line: String },

    #[error("Resource is not a directory: {0}")]
    NotDirectory(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Job already {state}: {resource}")]
    DuplicateJob {
        resource: String,
        state: state::JobState,
    },

    #[error("Failed to write graph: {0}")]
    GraphWrite(#[source] std::io::Error),

    #[error("Findings channel closed")]
    FindingsClosed,
}

impl GopherError {
    /// Returns true for errors that are an expected part of a crawl and
    /// must not stop it
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateJob { .. })
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid bootstrap host: {0}")]
    InvalidHost(String),
}

/// Result type alias for Gopher-Ripple operations
pub type Result<T> = std::result::Result<T, GopherError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{run_crawl, Coordinator, Dispatcher, NetResourceOpener, ResourceOpener};
pub use gopher::{parse_gopher_line, CrawlFinding, Host, ItemType, Resource};
pub use output::{CrawlStatistics, Grapher};
pub use state::JobState;
