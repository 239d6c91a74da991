//! Crawl job coordinator
//!
//! Tracks every resource the crawl has heard of and makes sure each one is
//! handed out for crawling exactly once. A job moves from queued to active
//! when it is retrieved, and from active to finished when its crawl is done.
//! Finished jobs are remembered for the lifetime of the coordinator.
//!
//! The coordinator does no locking of its own; it is owned by the dispatcher,
//! which is the only place it is mutated.

use crate::gopher::Resource;
use crate::state::JobState;
use crate::{GopherError, Result};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Number of jobs in each state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JobCounts {
    pub queued: usize,
    pub active: usize,
    pub finished: usize,
}

impl fmt::Display for JobCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Queued:{} Active:{} Finished:{}",
            self.queued, self.active, self.finished
        )
    }
}

/// Job coordinator keyed by the canonical URI of each resource
#[derive(Debug, Default)]
pub struct Coordinator {
    queued: HashMap<String, Resource>,
    active: HashSet<String>,
    finished: HashSet<String>,
}

impl Coordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a job to crawl `resource`
    ///
    /// # Errors
    ///
    /// Returns `GopherError::DuplicateJob` if the resource is already
    /// queued, active or finished. This is the normal outcome for a resource
    /// referenced more than once and leaves the coordinator unchanged.
    pub fn queue_job(&mut self, resource: &Resource) -> Result<()> {
        let key = resource.key();

        if let Some(state) = self.state_of(&key) {
            return Err(GopherError::DuplicateJob {
                resource: key,
                state,
            });
        }

        self.queued.insert(key, resource.clone());
        Ok(())
    }

    /// Retrieves an arbitrary queued job and marks it active
    ///
    /// Returns `None` if nothing is queued.
    pub fn queued_job(&mut self) -> Option<Resource> {
        let key = self.queued.keys().next()?.clone();
        let resource = self.queued.remove(&key)?;
        self.active.insert(key);
        Some(resource)
    }

    /// Marks a job retrieved by `queued_job` as finished
    pub fn finish_job(&mut self, resource: &Resource) {
        let key = resource.key();
        self.active.remove(&key);
        self.finished.insert(key);
    }

    /// Returns true once every known job is finished
    ///
    /// At least one job has to be finished, so a coordinator that has not
    /// yet seen the bootstrap job is never exhausted.
    pub fn jobs_exhausted(&self) -> bool {
        self.queued.is_empty() && self.active.is_empty() && !self.finished.is_empty()
    }

    pub fn has_queued_jobs(&self) -> bool {
        !self.queued.is_empty()
    }

    /// Returns the state of the job for `resource`, if it is known
    pub fn job_state(&self, resource: &Resource) -> Option<JobState> {
        self.state_of(&resource.key())
    }

    pub fn counts(&self) -> JobCounts {
        JobCounts {
            queued: self.queued.len(),
            active: self.active.len(),
            finished: self.finished.len(),
        }
    }

    fn state_of(&self, key: &str) -> Option<JobState> {
        if self.queued.contains_key(key) {
            Some(JobState::Queued)
        } else if self.active.contains(key) {
            Some(JobState::Active)
        } else if self.finished.contains(key) {
            Some(JobState::Finished)
        } else {
            None
        }
    }
}

impl fmt::Display for Coordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.counts(), f)
    }
}
