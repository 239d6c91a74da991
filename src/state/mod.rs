//! State module for tracking crawl progress
//!
//! This module provides the lifecycle states a crawl job moves through
//! while the coordinator schedules it.
//!
//! # Components
//!
//! - `JobState`: Tracks whether a job is queued, being crawled, or done

mod job_state;

// Re-export main types
pub use job_state::JobState;
