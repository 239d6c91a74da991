//! Crawl statistics
//!
//! This module provides the summary a dispatcher produces at the end of a
//! crawl and a helper for displaying it.

use crate::crawler::JobCounts;
use chrono::{DateTime, Utc};

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    /// When the dispatcher started
    pub started_at: DateTime<Utc>,

    /// When the dispatcher ran out of work
    pub finished_at: Option<DateTime<Utc>>,

    /// Final number of jobs in each state
    pub jobs: JobCounts,

    /// Crawls that ended in an error
    pub crawl_errors: u64,

    /// Findings dropped because their selector is blacklisted
    pub blacklisted: u64,

    /// Findings for resources the coordinator already knew
    pub duplicates: u64,

    /// Servers declared alive in the graph
    pub nodes: usize,

    /// Distinct server relations in the graph
    pub edges: usize,
}

impl CrawlStatistics {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            finished_at: None,
            jobs: JobCounts::default(),
            crawl_errors: 0,
            blacklisted: 0,
            duplicates: 0,
            nodes: 0,
            edges: 0,
        }
    }

    /// Wall-clock duration of the crawl in seconds, once finished
    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }

    /// Share of finished jobs that crawled without error, in percent
    pub fn success_rate(&self) -> f64 {
        if self.jobs.finished == 0 {
            return 0.0;
        }
        let succeeded = (self.jobs.finished as u64).saturating_sub(self.crawl_errors);
        (succeeded as f64 / self.jobs.finished as f64) * 100.0
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Run:");
    println!("  Started: {}", stats.started_at.to_rfc3339());
    if let Some(finished) = stats.finished_at {
        println!("  Finished: {}", finished.to_rfc3339());
    }
    if let Some(seconds) = stats.duration_seconds() {
        println!("  Duration: {}s", seconds);
    }
    println!();

    println!("Jobs:");
    println!("  {}", stats.jobs);
    println!("  Crawl errors: {}", stats.crawl_errors);
    println!("  Blacklisted findings: {}", stats.blacklisted);
    println!("  Duplicate findings: {}", stats.duplicates);
    println!();

    println!("Graph:");
    println!("  Servers alive: {}", stats.nodes);
    println!("  Server relations: {}", stats.edges);
    println!();

    println!(
        "Success Rate: {:.1}% ({} / {} jobs crawled without error)",
        stats.success_rate(),
        (stats.jobs.finished as u64).saturating_sub(stats.crawl_errors),
        stats.jobs.finished
    );
}
