//! Gopher-Ripple main entry point
//!
//! This is the command-line interface for the Gopher-Ripple gopherspace mapper.

use anyhow::Context;
use clap::Parser;
use gopher_ripple::config::{load_config_with_hash, validate, Config};
use gopher_ripple::crawler::run_crawl;
use gopher_ripple::output::print_statistics;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Gopher-Ripple: A gopherspace terrain mapper
///
/// Gopher-Ripple crawls gopher menus starting from a bootstrap server and
/// records which servers reference which as a graphviz dot file.
#[derive(Parser, Debug)]
#[command(name = "gopher-ripple")]
#[command(version = "1.0.0")]
#[command(about = "A gopherspace terrain mapper", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// The first server to crawl
    #[arg(long)]
    bootstrap: Option<String>,

    /// The listening port of the first server
    #[arg(long)]
    port: Option<String>,

    /// Number of concurrent crawlers
    #[arg(long)]
    crawlers: Option<usize>,

    /// Path of the generated dot file
    #[arg(long)]
    dotfile: Option<String>,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    logfile: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    /// Applies command-line overrides on top of the loaded configuration
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(bootstrap) = &self.bootstrap {
            config.crawler.bootstrap = bootstrap.clone();
        }
        if let Some(port) = &self.port {
            config.crawler.port = port.clone();
        }
        if let Some(crawlers) = self.crawlers {
            config.crawler.crawlers = crawlers;
        }
        if let Some(dotfile) = &self.dotfile {
            config.output.dotfile = dotfile.clone();
        }
        if let Some(logfile) = &self.logfile {
            config.output.logfile = Some(logfile.clone());
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (mut config, config_hash) = match &cli.config {
        Some(path) => {
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            (config, Some(hash))
        }
        None => (Config::default(), None),
    };

    cli.apply_overrides(&mut config);
    validate(&config).context("Invalid configuration")?;

    setup_logging(cli.verbose, cli.quiet, config.output.logfile.as_deref())?;

    match (&cli.config, &config_hash) {
        (Some(path), Some(hash)) => tracing::info!(
            "Configuration loaded from {} (hash: {})",
            path.display(),
            hash
        ),
        _ => tracing::info!("Using default configuration"),
    }

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to `logfile` when one is configured, otherwise to stderr.
fn setup_logging(verbose: u8, quiet: bool, logfile: Option<&str>) -> anyhow::Result<()> {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("gopher_ripple=info,warn"),
            1 => EnvFilter::new("gopher_ripple=debug,info"),
            2 => EnvFilter::new("gopher_ripple=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false);

    match logfile {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path))?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }

    Ok(())
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &Config) {
    println!("=== Gopher-Ripple Dry Run ===\n");

    println!("Crawler Configuration:");
    println!(
        "  Bootstrap: {}:{}",
        config.crawler.bootstrap, config.crawler.port
    );
    println!("  Crawlers: {}", config.crawler.crawlers);
    println!("  Connect timeout: {}s", config.crawler.connect_timeout_secs);
    println!("  Read deadline: {}s", config.crawler.read_deadline_secs);
    println!("  Status interval: {}s", config.crawler.status_interval_secs);

    println!("\nOutput:");
    println!("  Dot file: {}", config.output.dotfile);
    match &config.output.logfile {
        Some(logfile) => println!("  Log file: {}", logfile),
        None => println!("  Log file: (stderr)"),
    }

    println!(
        "\nBlacklisted Selectors ({}):",
        config.blacklist.selectors.len()
    );
    for entry in &config.blacklist.selectors {
        println!("  - {:?}", entry);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    tracing::info!(
        "Bootstrap: {}:{}, Crawlers: {}, Blacklist: {}",
        config.crawler.bootstrap,
        config.crawler.port,
        config.crawler.crawlers,
        config.blacklist.selectors.len()
    );

    match run_crawl(config).await {
        Ok(stats) => {
            tracing::info!("Crawl completed successfully");
            print_statistics(&stats);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
