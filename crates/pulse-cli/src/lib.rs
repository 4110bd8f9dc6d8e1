//! Blog Pulse CLI library exports.
//!
//! This crate provides the `blog-pulse` binary.
//!
//! # Modules
//!
//! - `cli`: Command-line argument parsing with clap
//! - `commands`: Command implementations (stats, ledger, related, ...)
//! - `loader`: Markdown and JSON post collection loading

pub mod cli;
pub mod commands;
pub mod loader;

pub use cli::{Cli, Commands, WindowArgs};
pub use commands::{
    execute, handle_latest, handle_ledger, handle_random, handle_related, handle_stats,
    handle_tags, handle_weekly, init_logging, run, window_config, PostSummary,
};
pub use loader::{load_documents, load_json_collection, load_markdown_dir};
