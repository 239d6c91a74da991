//! Crawl dispatcher - main crawl loop
//!
//! The dispatcher owns the job coordinator and the grapher and is the only
//! place either of them is mutated. Crawls run as separate tasks, one per
//! busy crawler slot, and talk to the dispatcher only through channels:
//!
//! - findings: every directory reference a crawl discovers
//! - done: a crawler slot reporting that its job is over
//!
//! Both channels hold at most one message, so a crawl blocks until the
//! dispatcher has taken its previous message. A dispatcher busy writing the
//! graph therefore slows down the crawls instead of buffering without bound.
//!
//! A crawl's findings may still sit in the findings buffer when its
//! completion arrives. The dispatcher takes every buffered finding before
//! finishing a job, so no finding is lost when the last job finishes.

use crate::config::{BlacklistConfig, Config};
use crate::crawler::walker::{crawl_resource, ItemAction};
use crate::crawler::{Coordinator, ResourceOpener};
use crate::gopher::{CrawlFinding, Host, Resource};
use crate::output::{CrawlStatistics, Grapher};
use crate::{GopherError, Result};
use chrono::Utc;
use std::collections::VecDeque;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

/// Shortest period between two status log lines
const MIN_STATUS_INTERVAL: Duration = Duration::from_secs(1);

/// Report sent by a crawler slot once its job is over
#[derive(Debug)]
struct CrawledJob {
    crawler_id: usize,
    job: Option<Resource>,
    failed: bool,
}

/// Runs a crawl from the bootstrap resource until no work is left
pub struct Dispatcher<O: ResourceOpener, W: Write> {
    coordinator: Coordinator,
    grapher: Grapher<W>,
    opener: Arc<O>,
    bootstrap: Resource,
    crawlers: usize,
    status_interval: Duration,
    blacklist: BlacklistConfig,
    actions: Vec<ItemAction>,
}

impl<O: ResourceOpener, W: Write> Dispatcher<O, W> {
    /// Creates a dispatcher for the bootstrap server named in `config`
    pub fn new(config: &Config, opener: O, grapher: Grapher<W>) -> Self {
        let bootstrap = Resource::root_directory(Host::new(
            config.crawler.bootstrap.clone(),
            config.crawler.port.clone(),
        ));

        Self {
            coordinator: Coordinator::new(),
            grapher,
            opener: Arc::new(opener),
            bootstrap,
            crawlers: config.crawler.crawlers.max(1),
            status_interval: config.crawler.status_interval().max(MIN_STATUS_INTERVAL),
            blacklist: config.blacklist.clone(),
            actions: Vec::new(),
        }
    }

    /// Registers an action that every crawl calls for each referenced item
    pub fn with_item_action(mut self, action: ItemAction) -> Self {
        self.actions.push(action);
        self
    }

    /// Runs the main crawl loop
    ///
    /// The loop waits for whichever happens first:
    /// 1. A crawler slot is idle and a job is queued: start a crawl task
    /// 2. A finding arrives: queue it as a job and graph it
    /// 3. A crawl task reports completion: take any buffered findings, then
    ///    finish its job and free its slot
    /// 4. The status timer fires: log the job counts
    ///
    /// After every event the loop ends if all jobs are finished. Crawl
    /// errors are logged by the crawl tasks and never end the loop; their
    /// jobs are finished all the same.
    ///
    /// # Errors
    ///
    /// Failing to write or close the graph aborts the crawl with
    /// `GopherError::GraphWrite`, as the dot file would be incomplete.
    pub async fn run(mut self) -> Result<CrawlStatistics> {
        let mut stats = CrawlStatistics::new(Utc::now());

        tracing::info!(
            "Starting crawl of {} with {} crawlers",
            self.bootstrap,
            self.crawlers
        );

        let actions: Arc<[ItemAction]> = Arc::from(std::mem::take(&mut self.actions));
        let (findings_tx, mut findings_rx) = mpsc::channel::<CrawlFinding>(1);
        let (done_tx, mut done_rx) = mpsc::channel::<CrawledJob>(1);
        let mut idle: VecDeque<usize> = (1..=self.crawlers).collect();

        let mut ticker = tokio::time::interval(self.status_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;

        findings_tx
            .send(CrawlFinding::bootstrap(self.bootstrap.clone()))
            .await
            .map_err(|_| GopherError::FindingsClosed)?;

        loop {
            let can_dispatch = !idle.is_empty() && self.coordinator.has_queued_jobs();

            tokio::select! {
                _ = std::future::ready(()), if can_dispatch => {
                    if let Some(crawler_id) = idle.pop_front() {
                        let job = self.coordinator.queued_job();
                        self.spawn_crawler(
                            crawler_id,
                            job,
                            findings_tx.clone(),
                            done_tx.clone(),
                            Arc::clone(&actions),
                        );
                    }
                }
                Some(finding) = findings_rx.recv() => {
                    self.handle_finding(finding, &mut stats)?;
                }
                Some(crawled) = done_rx.recv() => {
                    while let Ok(finding) = findings_rx.try_recv() {
                        self.handle_finding(finding, &mut stats)?;
                    }
                    if let Some(job) = &crawled.job {
                        self.coordinator.finish_job(job);
                    }
                    if crawled.failed {
                        stats.crawl_errors += 1;
                    }
                    idle.push_back(crawled.crawler_id);
                }
                _ = ticker.tick() => {
                    tracing::info!("STATUS: {}", self.coordinator);
                }
            }

            if self.coordinator.jobs_exhausted() {
                break;
            }
        }

        stats.jobs = self.coordinator.counts();
        stats.nodes = self.grapher.node_count();
        stats.edges = self.grapher.edge_count();
        stats.finished_at = Some(Utc::now());

        self.grapher.close()?;

        tracing::info!(
            "Crawl completed: {} jobs, {} servers, {} relations",
            stats.jobs.finished,
            stats.nodes,
            stats.edges
        );

        Ok(stats)
    }

    /// Filters, queues and graphs a single finding
    fn handle_finding(&mut self, finding: CrawlFinding, stats: &mut CrawlStatistics) -> Result<()> {
        let selector = &finding.resource.selector;
        if self.blacklist.is_blacklisted(selector) {
            tracing::info!("Blacklisted: {:?}", selector);
            stats.blacklisted += 1;
            return Ok(());
        }

        match self.coordinator.queue_job(&finding.resource) {
            Ok(()) => {}
            Err(e) if e.is_duplicate() => {
                tracing::debug!("{}", e);
                stats.duplicates += 1;
            }
            Err(e) => return Err(e),
        }

        self.grapher.graph_finding(&finding)
    }

    /// Starts a crawl task bound to `crawler_id`
    ///
    /// The task always reports back on `done`, whether the crawl succeeded,
    /// failed, or there was no job at all.
    fn spawn_crawler(
        &self,
        crawler_id: usize,
        job: Option<Resource>,
        findings: mpsc::Sender<CrawlFinding>,
        done: mpsc::Sender<CrawledJob>,
        actions: Arc<[ItemAction]>,
    ) {
        let opener = Arc::clone(&self.opener);

        tokio::spawn(async move {
            let mut failed = false;

            if let Some(resource) = &job {
                tracing::info!("[{}] Crawling {}", crawler_id, resource);
                if let Err(e) =
                    crawl_resource(opener.as_ref(), resource, &findings, &actions).await
                {
                    tracing::warn!("[{}] ERR: {}", crawler_id, e);
                    failed = true;
                }
                tracing::info!("[{}] Done crawling {}", crawler_id, resource);
            }

            // only fails once the dispatcher has given up on the crawl
            let _ = done
                .send(CrawledJob {
                    crawler_id,
                    job,
                    failed,
                })
                .await;
        });
    }
}
