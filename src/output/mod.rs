//! Output module for crawl results
//!
//! This module handles:
//! - Writing the server graph as a graphviz dot file
//! - Summarizing a finished crawl

mod grapher;
pub mod stats;

pub use grapher::Grapher;
pub use stats::{print_statistics, CrawlStatistics};
