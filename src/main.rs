//! Docset-Ripple main entry point
//!
//! This is the command-line interface for the Docset-Ripple docset builder.

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use docset_ripple::config::{load_config_with_hash, Config, ConfigOverrides};
use docset_ripple::crawler::build_docset;
use docset_ripple::output::{
    load_statistics, print_build_summary, print_statistics, BuildSummary,
};
use docset_ripple::storage::SqliteIndexStore;
use docset_ripple::DocTree;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Docset-Ripple: an offline docset builder
///
/// Docset-Ripple crawls a documentation site from a seed page, saves every
/// page and resource in scope and writes a Dash docset with a search index
/// built from the configured selectors.
#[derive(Parser, Debug)]
#[command(name = "docset-ripple")]
#[command(version)]
#[command(about = "Builds Dash docsets from online documentation", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG", required_unless_present = "config_flag")]
    config: Option<PathBuf>,

    /// Path to TOML configuration file
    #[arg(short = 'c', long = "config", value_name = "FILE", conflicts_with = "config")]
    config_flag: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Directory the docset is created in
    #[arg(long)]
    path: Option<String>,

    /// Docset name
    #[arg(long)]
    name: Option<String>,

    /// Seed URL
    #[arg(long)]
    url: Option<String>,

    /// CFBundleName written to Info.plist
    #[arg(long)]
    cfbundle: Option<String>,

    /// Number of page levels to build
    #[arg(long)]
    depth: Option<u32>,

    /// Only crawl sub-pages whose path matches this regex
    #[arg(long)]
    path_regex: Option<String>,

    /// Regex applied to a page path to derive its bundle name
    #[arg(long)]
    bundle_pattern: Option<String>,

    /// Replacement template for the bundle pattern
    #[arg(long)]
    bundle_replace: Option<String>,

    /// Validate config and show what would be built without crawling
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics of the existing docset index and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

impl Cli {
    fn config_path(&self) -> Option<&PathBuf> {
        self.config.as_ref().or(self.config_flag.as_ref())
    }

    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            path: self.path.clone(),
            name: self.name.clone(),
            url: self.url.clone(),
            cfbundle: self.cfbundle.clone(),
            depth: self.depth,
            path_regex: self.path_regex.clone(),
            bundle_pattern: self.bundle_pattern.clone(),
            bundle_replace: self.bundle_replace.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config_path = cli
        .config_path()
        .context("a configuration file is required")?;
    tracing::info!("Loading configuration from: {}", config_path.display());

    let overrides = cli.overrides();
    if !overrides.is_empty() {
        tracing::debug!("Command line overrides: {:?}", overrides);
    }

    let (config, hash) = load_config_with_hash(config_path, &overrides)
        .with_context(|| format!("failed to load {}", config_path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_build(&config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("docset_ripple=info,warn"),
            1 => EnvFilter::new("docset_ripple=debug,info"),
            2 => EnvFilter::new("docset_ripple=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the resolved configuration
fn handle_dry_run(config: &Config) {
    let tree = DocTree::new(&config.docset.path, &config.docset.name);

    println!("=== Docset-Ripple Dry Run ===\n");

    println!("Docset:");
    println!("  Name: {}", config.docset.name);
    println!("  Bundle: {}", tree.bundle().display());

    println!("\nCrawler:");
    println!("  Seed: {}", config.crawler.url);
    println!("  Max depth: {}", config.crawler.max_depth);
    if let Some(regex) = &config.crawler.sub_path_regex {
        println!("  Sub-path regex: {}", regex);
    }
    if let Some(pattern) = &config.bundle_name.pattern {
        println!(
            "  Bundle name: {} -> {}",
            pattern,
            config.bundle_name.replace.as_deref().unwrap_or("")
        );
    }

    println!("\nHTTP:");
    println!("  User agent: {}", config.http.user_agent);
    println!("  Timeout: {}s", config.http.timeout_secs);

    println!("\nPlist:");
    println!("  CFBundleIdentifier: {}", config.plist.cfbundle_identifier);
    println!("  CFBundleName: {}", config.plist.cfbundle_name);
    println!("  DocSetPlatformFamily: {}", config.plist.docset_platform_family);

    println!("\nPage rules:");
    println!("  Remove selectors: {}", config.page.remove_node_selector.len());
    println!("  Attribute overrides: {}", config.page.set_attrs.len());

    println!("\nIndex rules ({}):", config.index.len());
    for rule in &config.index {
        let mode = if rule.anchor_only { " (anchor only)" } else { "" };
        println!("  - {} -> {}{}", rule.selector, rule.entry_type, mode);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the --stats mode: shows statistics of the docset index
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    let tree = DocTree::new(&config.docset.path, &config.docset.name);
    println!("Index: {}\n", tree.db().display());

    let store = SqliteIndexStore::open_existing(tree.db())
        .with_context(|| format!("failed to open {}", tree.db().display()))?;
    let stats = load_statistics(&store)?;

    print_statistics(&stats);

    Ok(())
}

/// Handles the main build operation
async fn handle_build(config: &Config) -> anyhow::Result<()> {
    tracing::info!(
        "Seed: {}, max depth: {}, index rules: {}",
        config.crawler.url,
        config.crawler.max_depth,
        config.index.len()
    );

    let started_at = Utc::now();
    let report = build_docset(config)
        .await
        .with_context(|| format!("failed to build docset {}", config.docset.name))?;
    let finished_at = Utc::now();

    tracing::info!("Build completed successfully");
    print_build_summary(&BuildSummary::new(&report, started_at, finished_at));

    Ok(())
}
