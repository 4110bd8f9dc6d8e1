//! CLI argument parsing for blog-pulse.
//!
//! CLI flags override every other configuration source.

use clap::{Args, Parser, Subcommand};

/// Blog Pulse
///
/// Publishing cadence statistics and related-post rankings for a
/// Markdown blog.
#[derive(Parser, Debug)]
#[command(name = "blog-pulse")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default ~/.config/blog-pulse/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// Posts directory (.md/.mdx) or JSON collection file
    #[arg(short, long, global = true)]
    pub posts: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Aggregation window overrides shared by the activity commands.
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct WindowArgs {
    /// Window start (RFC 3339 or YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// Window end (RFC 3339 or YYYY-MM-DD, default: now)
    #[arg(long)]
    pub to: Option<String>,

    /// Size the window in whole weeks ending at --to
    #[arg(long)]
    pub weeks: Option<u32>,

    /// Count publications only
    #[arg(long)]
    pub no_updates: bool,

    /// IANA timezone used to cut day keys (e.g. Asia/Shanghai)
    #[arg(long)]
    pub timezone: Option<String>,
}

/// Blog Pulse commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print cadence statistics
    Stats {
        #[command(flatten)]
        window: WindowArgs,
    },

    /// Print the per-day activity ledger
    Ledger {
        #[command(flatten)]
        window: WindowArgs,

        /// Only days with at least one event
        #[arg(long)]
        active_only: bool,
    },

    /// Print activity rolled up by ISO week
    Weekly {
        #[command(flatten)]
        window: WindowArgs,
    },

    /// Rank posts related to a target post
    Related {
        /// Target post id
        id: String,

        /// Maximum results (default from config)
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Include scores and reasons
        #[arg(long)]
        explain: bool,

        /// Seed the near-tie shuffle for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// Skip the near-tie shuffle entirely
        #[arg(long)]
        no_diversify: bool,
    },

    /// Most recently published posts
    Latest {
        /// Post id to leave out
        #[arg(long)]
        exclude: Option<String>,

        /// Maximum results
        #[arg(short = 'n', long, default_value = "4")]
        limit: usize,
    },

    /// Most used tags
    Tags {
        /// Maximum results (default from config)
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Include occurrence counts
        #[arg(long)]
        counts: bool,
    },

    /// Random picks other than the target post
    Random {
        /// Target post id
        id: String,

        /// Maximum results
        #[arg(short = 'n', long, default_value = "4")]
        limit: usize,

        /// Seed for reproducible picks
        #[arg(long)]
        seed: Option<u64>,
    },
}
