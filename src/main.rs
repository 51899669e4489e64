mod ai;
mod cache;
mod cli;
mod config;
mod error;
mod github;
mod orchestrator;
mod report;
mod trends;

use cache::ReadmeCache;
use chrono::Local;
use clap::Parser;
use cli::{Cli, Commands};
use config::{Config, AI_API_KEY_ENV, GITHUB_TOKEN_ENV};
use error::Result;
use indicatif::{ProgressBar, ProgressStyle};
use github::query::MAX_DAYS;
use orchestrator::Orchestrator;
use report::console::{render_comparison, render_overview};
use report::markdown::MarkdownReport;
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;
use tracing::warn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use trends::analyzer::summarize;
use trends::compare::compare;
use trends::snapshot::SnapshotStore;
use trends::Snapshot;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Validate CLI arguments
    if let Err(e) = cli.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle subcommands
    if let Some(command) = &cli.command {
        return handle_command(command, &cli);
    }

    let config = load_config(&cli)?;
    let config = apply_cli_overrides(config, &cli);

    run_pipeline(config, &cli).await
}

/// Log to stderr. RUST_LOG takes precedence over `-v`.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    match &cli.config {
        Some(config_path) => Config::load_from(config_path),
        None => Config::load_or_create_default(),
    }
}

async fn run_pipeline(config: Config, cli: &Cli) -> Result<()> {
    println!("gh-trending v{}", env!("CARGO_PKG_VERSION"));
    println!("Trending GitHub repositories and how they move\n");

    // Interactive mode: prompt for missing values
    let days = match cli.days {
        Some(days) => days,
        None if cli.is_non_interactive() => config.default_days,
        None => {
            let input = prompt_with_default("Days back", &config.default_days.to_string())?;
            input
                .parse::<u32>()
                .ok()
                .filter(|d| (1..=MAX_DAYS).contains(d))
                .unwrap_or(config.default_days)
        }
    };

    let limit = match cli.limit {
        Some(limit) => limit,
        None if cli.is_non_interactive() => config.default_limit,
        None => {
            let input = prompt_with_default("Repositories", &config.default_limit.to_string())?;
            input.parse::<u32>().unwrap_or(config.default_limit)
        }
    };

    println!("\n{}", "=".repeat(60));
    println!("Window: repositories created in the last {} days", days);
    println!("Limit: {}", limit);
    println!("{}\n", "=".repeat(60));

    let mut orchestrator = Orchestrator::new(config)?;
    if cli.no_ai {
        orchestrator = orchestrator.without_ai();
    }
    if !orchestrator.ai_enabled() {
        println!(
            "AI summaries disabled (set {} or ai_api_key to enable)\n",
            AI_API_KEY_ENV
        );
    }

    // Fetch
    let fetch_spinner = ProgressBar::new_spinner();
    fetch_spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    fetch_spinner.set_message("Fetching trending repositories...");
    fetch_spinner.enable_steady_tick(Duration::from_millis(100));

    let repos = orchestrator.fetch_trending(days, limit).await;

    fetch_spinner.finish_with_message(format!("Fetched {} repositories", repos.len()));

    let snapshot = Snapshot::new(Local::now().date_naive(), repos);
    let summary = match summarize(&snapshot.repositories) {
        Some(summary) => summary,
        None => {
            println!("No repositories found. Check your network connection or GitHub rate limit.");
            return Ok(());
        }
    };

    match orchestrator.save_snapshot(&snapshot) {
        Ok(path) => println!("✓ Snapshot saved: {}\n", path.display()),
        Err(e) => warn!(error = %e, "failed to save snapshot, continuing without it"),
    }

    println!("{}", render_overview(&snapshot.repositories, &summary));

    // Enrich with AI summaries
    let progress = ProgressBar::new(snapshot.repositories.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
    );

    let mut summaries = Vec::with_capacity(snapshot.repositories.len());
    for (rank, repo) in snapshot.ranked() {
        progress.set_message(format!("#{} {}", rank, repo.name));
        summaries.push(orchestrator.summarize_repository(repo).await);
        progress.inc(1);
    }

    progress.finish_with_message("Summaries complete");

    // Compare against an earlier snapshot
    let comparison = match orchestrator.comparison_for(&snapshot, &summary, days) {
        Ok(comparison) => comparison,
        Err(e) => {
            warn!(error = %e, "trend comparison failed");
            None
        }
    };

    match comparison {
        Some(ref found) => println!(
            "\n{}",
            render_comparison(&found.comparison, found.baseline.captured_on)
        ),
        None => println!(
            "\nNo snapshot from about {} days ago (±{} days), skipping trend comparison",
            days,
            orchestrator.config().comparison_tolerance_days
        ),
    }

    // Markdown report
    let report = MarkdownReport {
        generated_on: snapshot.captured_on,
        days,
        repositories: &snapshot.repositories,
        summaries: &summaries,
        summary: &summary,
        comparison: comparison
            .as_ref()
            .map(|found| (&found.comparison, found.baseline.captured_on)),
    };

    let report_path = match &cli.output {
        Some(path) => path.clone(),
        None => report.default_path(&orchestrator.config().reports_dir),
    };
    report.write(&report_path)?;
    println!("\n✓ Report written: {}", report_path.display());

    Ok(())
}

fn handle_command(command: &Commands, cli: &Cli) -> Result<()> {
    match command {
        Commands::Init { force } => {
            let config_path = Config::default_config_path()?;

            if config_path.exists() && !force {
                eprintln!(
                    "Config file already exists at: {}",
                    config_path.display()
                );
                eprintln!("Use --force to overwrite");
                std::process::exit(1);
            }

            Config::create_default()?;
            println!("✓ Created config file at: {}", config_path.display());
            println!("\nFor README access and higher rate limits, either:");
            println!("  1. Set the {} environment variable", GITHUB_TOKEN_ENV);
            println!("  2. Add github_token to the config file");
            println!("\nFor AI summaries, set {} or add ai_api_key", AI_API_KEY_ENV);
        }
        Commands::Config => {
            let config = load_config(cli)?;
            let toml_str = toml::to_string_pretty(&config)?;
            println!("Current configuration:\n");
            println!("{}", toml_str);
        }
        Commands::ClearCache { expired } => {
            let config = load_config(cli)?;
            let cache_dir = config.cache_dir()?;
            if !cache_dir.exists() {
                println!("Cache directory does not exist");
                return Ok(());
            }

            let cache = ReadmeCache::new(&cache_dir, config.cache_ttl_hours)?;
            if *expired {
                let removed = cache.cleanup_expired()?;
                println!("✓ Removed {} expired entries", removed);
            } else {
                cache.clear()?;
                println!("✓ Cache cleared: {}", cache_dir.display());
            }
        }
        Commands::CacheStats => {
            let config = load_config(cli)?;
            let cache_dir = config.cache_dir()?;
            if !cache_dir.exists() {
                println!("Cache directory does not exist");
            } else {
                println!("Cache directory: {}", cache_dir.display());

                match ReadmeCache::new(&cache_dir, config.cache_ttl_hours) {
                    Ok(cache) => {
                        let stats = cache.stats();
                        println!("Total entries: {}", stats.total_entries);
                        println!("Database size: {}", stats.format_size());
                    }
                    Err(_) => println!("Could not open cache database"),
                }
            }
        }
        Commands::Compare { previous, current } => {
            compare_files(previous, current)?;
        }
    }
    Ok(())
}

/// Offline comparison of two snapshot files
fn compare_files(previous: &Path, current: &Path) -> Result<()> {
    let store = SnapshotStore::new(previous.parent().unwrap_or_else(|| Path::new(".")))?;
    let previous = store.load(previous)?;
    let current = store.load(current)?;

    let (previous_summary, current_summary) = match (
        summarize(&previous.repositories),
        summarize(&current.repositories),
    ) {
        (Some(p), Some(c)) => (p, c),
        _ => {
            println!("Cannot compare: one of the snapshots is empty");
            return Ok(());
        }
    };

    let comparison = compare(
        &previous_summary,
        &current_summary,
        &previous.repositories,
        &current.repositories,
    );

    if comparison.is_unchanged() {
        println!(
            "No changes between {} and {}",
            previous.captured_on, current.captured_on
        );
        return Ok(());
    }

    println!("{}", render_comparison(&comparison, previous.captured_on));
    Ok(())
}

/// Prompt user with a default value (press Enter to accept default)
fn prompt_with_default(prompt: &str, default: &str) -> Result<String> {
    print!("{} [{}]: ", prompt, default);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim();

    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input.to_string())
    }
}

fn apply_cli_overrides(mut config: Config, cli: &Cli) -> Config {
    if let Some(days) = cli.days {
        config.default_days = days;
    }

    if let Some(limit) = cli.limit {
        config.default_limit = limit;
    }

    if let Some(tolerance) = cli.tolerance {
        config.comparison_tolerance_days = tolerance;
    }

    if let Some(ref dir) = cli.data_dir {
        config.data_dir = dir.clone();
    }

    if let Some(ref dir) = cli.reports_dir {
        config.reports_dir = dir.clone();
    }

    // Override cache setting
    if cli.no_cache {
        config.cache_enabled = false;
    }

    config
}
