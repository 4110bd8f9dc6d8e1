//! Blog Pulse
//!
//! Publishing cadence statistics and related-post rankings for a
//! Markdown blog.
//!
//! # Usage
//!
//! ```bash
//! blog-pulse stats [--from DATE] [--to DATE] [--weeks N] [--timezone TZ]
//! blog-pulse ledger --active-only
//! blog-pulse related <ID> [--limit N] [--explain] [--seed S]
//! blog-pulse latest | tags | random <ID>
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded in order (later sources override earlier):
//! 1. Built-in defaults
//! 2. Config file (~/.config/blog-pulse/config.toml)
//! 3. Environment variables (PULSE_*)
//! 4. CLI flags

use anyhow::Result;
use clap::Parser;

use pulse_cli::{run, Cli};

fn main() -> Result<()> {
    run(Cli::parse())
}
