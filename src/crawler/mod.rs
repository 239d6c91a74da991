//! Crawler module for gopher menu crawling
//!
//! This module contains the core crawling logic, including:
//! - Opening gopher resources over TCP with connect and exchange deadlines
//! - Walking a single menu and reporting references to other menus
//! - Tracking each resource through the queued, active and finished states
//! - Dispatching jobs to a bounded pool of concurrent crawlers

mod coordinator;
mod dispatcher;
mod opener;
mod walker;

pub use coordinator::{Coordinator, JobCounts};
pub use dispatcher::Dispatcher;
pub use opener::{DeadlineStream, NetResourceOpener, ResourceOpener};
pub use walker::{crawl_resource, ItemAction, MAX_LINE_LENGTH};

use crate::config::{validate, Config};
use crate::gopher::Resource;
use crate::output::{CrawlStatistics, Grapher};
use crate::Result;
use std::fs::File;
use std::io::BufWriter;
use std::sync::Arc;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Validate the configuration and create the dot file it names
/// 2. Build a network opener with the configured timeouts
/// 3. Crawl from the bootstrap server until every known menu is finished
/// 4. Close the graph and return the crawl statistics
///
/// # Errors
///
/// Fails with `GopherError::Config` on an invalid configuration, and if the
/// dot file cannot be created or written.
pub async fn run_crawl(config: Config) -> Result<CrawlStatistics> {
    validate(&config)?;

    let file = File::create(&config.output.dotfile)?;
    let grapher = Grapher::new(BufWriter::new(file))?;
    let opener = NetResourceOpener::from_config(&config.crawler);

    tracing::debug!("Writing graph to {}", config.output.dotfile);

    Dispatcher::new(&config, opener, grapher)
        .with_item_action(Arc::new(|item: &Resource| {
            tracing::trace!("Item {}", item);
        }))
        .run()
        .await
}
