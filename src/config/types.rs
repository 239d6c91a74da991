use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Gopher-Ripple
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub output: OutputConfig,
    pub blacklist: BlacklistConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// The first server to crawl
    pub bootstrap: String,

    /// The listening port of the first server
    pub port: String,

    /// Number of crawlers running concurrently
    pub crawlers: usize,

    /// Time allowed for establishing a connection (seconds)
    pub connect_timeout_secs: u64,

    /// Time allowed for a whole exchange once connected (seconds)
    pub read_deadline_secs: u64,

    /// Interval between status log lines (seconds)
    pub status_interval_secs: u64,
}

impl CrawlerConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn read_deadline(&self) -> Duration {
        Duration::from_secs(self.read_deadline_secs)
    }

    pub fn status_interval(&self) -> Duration {
        Duration::from_secs(self.status_interval_secs)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            bootstrap: "gopher.floodgap.com".to_string(),
            port: "70".to_string(),
            crawlers: default_crawlers(),
            connect_timeout_secs: 5,
            read_deadline_secs: 60,
            status_interval_secs: 60,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path of the generated dot file
    pub dotfile: String,

    /// Path of the log file (stderr when unset)
    pub logfile: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dotfile: "grawler.dot".to_string(),
            logfile: None,
        }
    }
}

/// Selectors that are never crawled
///
/// Any selector containing one of these substrings is dropped. They tend to
/// belong to interactive games that yield endless crawls.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BlacklistConfig {
    pub selectors: Vec<String>,
}

impl BlacklistConfig {
    /// Returns true if the selector contains a blacklisted substring
    pub fn is_blacklisted(&self, selector: &str) -> bool {
        self.selectors
            .iter()
            .any(|entry| selector.contains(entry.as_str()))
    }
}

impl Default for BlacklistConfig {
    fn default() -> Self {
        Self {
            selectors: vec![".run*".to_string(), ".cgi?".to_string()],
        }
    }
}

fn default_crawlers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
