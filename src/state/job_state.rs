/// Job state definitions for tracking crawl progress
///
/// Every distinct resource moves through these states exactly once:
/// queued, then active, then finished.
use std::fmt;

/// Represents the current state of a crawl job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobState {
    /// Job is known and waiting for an idle worker
    Queued,

    /// Job has been handed to a worker and is being crawled
    Active,

    /// Job has been crawled (successfully or not); it is never crawled again
    Finished,
}

impl JobState {
    /// Short lowercase name used in log and error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Active => "active",
            Self::Finished => "finished",
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
