use crate::config::types::{BlacklistConfig, Config, CrawlerConfig, OutputConfig};
use crate::{ConfigError, ConfigResult};
use url::Host;

/// Upper bound for the number of concurrent crawlers
const MAX_CRAWLERS: usize = 1024;

/// Validates the entire configuration
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_crawler_config(&config.crawler)?;
    validate_output_config(&config.output)?;
    validate_blacklist(&config.blacklist)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> ConfigResult<()> {
    validate_bootstrap_host(&config.bootstrap)?;
    validate_port(&config.port)?;

    if config.crawlers < 1 || config.crawlers > MAX_CRAWLERS {
        return Err(ConfigError::Validation(format!(
            "crawlers must be between 1 and {}, got {}",
            MAX_CRAWLERS, config.crawlers
        )));
    }

    if config.connect_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "connect-timeout-secs must be > 0".to_string(),
        ));
    }

    if config.read_deadline_secs == 0 {
        return Err(ConfigError::Validation(
            "read-deadline-secs must be > 0".to_string(),
        ));
    }

    if config.status_interval_secs == 0 {
        return Err(ConfigError::Validation(
            "status-interval-secs must be > 0".to_string(),
        ));
    }

    Ok(())
}

/// Validates the bootstrap hostname
///
/// The host must also be acceptable in a menu line, so spaces and slashes
/// are rejected before handing it to the URL host parser.
fn validate_bootstrap_host(hostname: &str) -> ConfigResult<()> {
    if hostname.is_empty() {
        return Err(ConfigError::InvalidHost(
            "bootstrap host cannot be empty".to_string(),
        ));
    }

    if hostname.contains(char::is_whitespace) || hostname.contains('/') {
        return Err(ConfigError::InvalidHost(format!(
            "'{}' contains whitespace or a slash",
            hostname
        )));
    }

    let candidate = if hostname.contains(':') && !hostname.starts_with('[') {
        format!("[{}]", hostname)
    } else {
        hostname.to_string()
    };

    Host::parse(&candidate)
        .map_err(|e| ConfigError::InvalidHost(format!("'{}': {}", hostname, e)))?;

    Ok(())
}

fn validate_port(port: &str) -> ConfigResult<()> {
    match port.parse::<u16>() {
        Ok(p) if p > 0 => Ok(()),
        _ => Err(ConfigError::Validation(format!(
            "port must be a number between 1 and 65535, got '{}'",
            port
        ))),
    }
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> ConfigResult<()> {
    if config.dotfile.is_empty() {
        return Err(ConfigError::Validation(
            "dotfile cannot be empty".to_string(),
        ));
    }

    if matches!(config.logfile.as_deref(), Some("")) {
        return Err(ConfigError::Validation(
            "logfile cannot be empty when set".to_string(),
        ));
    }

    Ok(())
}

fn validate_blacklist(config: &BlacklistConfig) -> ConfigResult<()> {
    // an empty entry would match every selector
    if config.selectors.iter().any(|s| s.is_empty()) {
        return Err(ConfigError::Validation(
            "blacklist selectors cannot be empty".to_string(),
        ));
    }
    Ok(())
}
