use crate::github::query::{MAX_DAYS, MAX_PER_PAGE};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gh-trending")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "Track trending GitHub repositories and how the ranking shifts over time",
    long_about = "gh-trending fetches the most starred GitHub repositories created in a recent \
                  window, summarizes them, stores a dated snapshot and compares it with an \
                  earlier snapshot to show star growth, language shifts, new entrants and rank moves."
)]
pub struct Cli {
    /// Look at repositories created in the last DAYS days
    #[arg(short, long, value_name = "DAYS")]
    pub days: Option<u32>,

    /// Number of repositories to fetch (1-100)
    #[arg(short, long, value_name = "N")]
    pub limit: Option<u32>,

    /// How many days the comparison snapshot may be off target
    #[arg(long, value_name = "DAYS")]
    pub tolerance: Option<u32>,

    /// Path to config file (default: ~/.config/gh-trending/config.toml)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding daily snapshots
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Directory for Markdown reports
    #[arg(long, value_name = "DIR")]
    pub reports_dir: Option<PathBuf>,

    /// Write the Markdown report to this file instead
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Run without prompting for missing values
    #[arg(long)]
    pub non_interactive: bool,

    /// Disable the README cache
    #[arg(long)]
    pub no_cache: bool,

    /// Skip AI summaries
    #[arg(long)]
    pub no_ai: bool,

    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize configuration file
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },

    /// Show current configuration
    Config,

    /// Clear the README cache
    ClearCache {
        /// Only remove entries older than the cache TTL
        #[arg(long)]
        expired: bool,
    },

    /// Show cache statistics
    CacheStats,

    /// Compare two stored snapshot files
    Compare {
        /// Earlier snapshot (data_YYYY-MM-DD.json)
        previous: PathBuf,

        /// Later snapshot (data_YYYY-MM-DD.json)
        current: PathBuf,
    },
}

impl Cli {
    /// Check if the CLI is in non-interactive mode
    pub fn is_non_interactive(&self) -> bool {
        self.non_interactive || self.output.is_some() || self.command.is_some()
    }

    /// Validate CLI arguments
    pub fn validate(&self) -> Result<(), String> {
        if let Some(days) = self.days {
            if days == 0 || days > MAX_DAYS {
                return Err(format!("--days must be between 1 and {}", MAX_DAYS));
            }
        }

        if let Some(limit) = self.limit {
            if limit == 0 || limit > MAX_PER_PAGE {
                return Err(format!("--limit must be between 1 and {}", MAX_PER_PAGE));
            }
        }

        Ok(())
    }
}
