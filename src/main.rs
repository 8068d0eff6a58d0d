//! Sumi-Scout main entry point
//!
//! This is the command-line interface for the Sumi-Scout site auditor.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use sumi_scout::collaborators::MemoryUsageStore;
use sumi_scout::config::{load_config_with_hash, Config};
use sumi_scout::output::{print_report_summary, to_json, write_markdown_report};
use sumi_scout::{ComplianceGate, Orchestrator, ScoutError, ScrapeRequest};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Sumi-Scout: a compliance-gated site auditor
///
/// Sumi-Scout checks that a scrape is allowed in the given jurisdiction,
/// crawls a handful of the site's pages politely, and reports SEO defects,
/// broken links, contact leads and a 0-100 score.
#[derive(Parser, Debug)]
#[command(name = "sumi-scout")]
#[command(version = "1.0.0")]
#[command(about = "A compliance-gated site auditor", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Website to analyze
    #[arg(value_name = "URL")]
    url: String,

    /// Jurisdiction code whose rules apply (e.g. CA, NY)
    #[arg(short, long, default_value = "DEFAULT")]
    jurisdiction: String,

    /// Requests already made today in this jurisdiction
    #[arg(long, default_value_t = 0)]
    usage_today: u32,

    /// Print the report as JSON instead of a summary
    #[arg(long)]
    json: bool,

    /// Write a markdown report to this path (overrides [output] summary-path)
    #[arg(long, value_name = "PATH")]
    markdown: Option<PathBuf>,

    /// Show the configuration and compliance decision without any network I/O
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    let request = ScrapeRequest::individual(&cli.url, &cli.jurisdiction);
    let scope = ComplianceGate::from_config(&config)
        .rules()
        .lookup(&cli.jurisdiction)
        .code
        .clone();
    let usage = Arc::new(MemoryUsageStore::with_count(&scope, cli.usage_today));
    let markdown_path = cli
        .markdown
        .clone()
        .or_else(|| config.output.summary_path.as_ref().map(PathBuf::from));

    let orchestrator = Orchestrator::builder(config)
        .usage_store(usage)
        .build()
        .context("failed to build HTTP client")?;

    if cli.dry_run {
        return handle_dry_run(&orchestrator, &request).await;
    }

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling analysis");
            on_interrupt.cancel();
        }
    });

    let report = match orchestrator.run_analysis_with_cancel(&request, cancel).await {
        Ok(report) => report,
        Err(ScoutError::ComplianceRejected(decision)) => {
            tracing::error!("Request rejected by compliance gate");
            for rule in &decision.violated_rules {
                eprintln!("  ✗ {}", rule);
            }
            anyhow::bail!("compliance rejection");
        }
        Err(e) => {
            tracing::error!("Analysis failed: {}", e);
            return Err(e.into());
        }
    };

    if cli.json {
        println!("{}", to_json(&report)?);
    } else {
        print_report_summary(&report);
    }

    if let Some(path) = markdown_path {
        write_markdown_report(&report, &path)?;
        if !cli.json {
            println!("\n✓ Markdown report written to: {}", path.display());
        }
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_scout=info,warn"),
            1 => EnvFilter::new("sumi_scout=debug,info"),
            2 => EnvFilter::new("sumi_scout=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Handles the --dry-run mode: shows the configuration and the compliance decision
async fn handle_dry_run(
    orchestrator: &Orchestrator,
    request: &ScrapeRequest,
) -> anyhow::Result<()> {
    let config: &Config = orchestrator.config();
    println!("=== Sumi-Scout Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Max pages: {}", config.crawler.max_pages);
    println!("  Max concurrent pages: {}", config.crawler.max_concurrent_pages);
    println!("  Minimum interval: {}ms", config.crawler.minimum_interval);
    println!("  Page timeout: {}ms", config.crawler.page_timeout);
    println!("  Max link checks per page: {}", config.crawler.max_link_checks);
    println!("  Max redirects: {}", config.crawler.max_redirects);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nCompliance:");
    println!("  Max radius: {} miles", config.compliance.max_radius);
    println!(
        "  Max results per request: {}",
        config.compliance.max_results_per_request
    );
    println!("  Jurisdiction overrides: {}", config.jurisdictions.len());

    let decision = orchestrator.evaluate(request).await?;
    let rules = &decision.jurisdiction_rules;
    println!("\nJurisdiction {}:", rules.code);
    println!("  Requires consent: {}", rules.requires_consent);
    println!("  Max requests per day: {}", rules.max_requests_per_day);
    println!(
        "  Allowed fields: {}",
        rules
            .allowed_data_fields
            .iter()
            .map(|f| f.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    for advisory in &decision.advisories {
        println!("  ! {}", advisory);
    }

    if decision.allowed {
        println!("\n✓ Configuration is valid");
        println!("✓ Would analyze {}", request.target);
    } else {
        println!("\n✗ Request would be rejected:");
        for rule in &decision.violated_rules {
            println!("  - {}", rule);
        }
    }

    Ok(())
}
