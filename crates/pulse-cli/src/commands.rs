//! Command implementations for blog-pulse.
//!
//! Handles:
//! - stats / ledger / weekly: aggregate the collection over a window
//! - related / latest / tags / random: rank and pick posts
//!
//! Every command produces a JSON value; `run` prints it to stdout and
//! sends logs to stderr.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Datelike, Utc};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use pulse_activity::{aggregate_activity, weekly_rollup, AggregationReport, AggregationWindow, WeekSummary};
use pulse_related::{
    latest_posts, random_posts, tag_frequencies, RandomTieBreaker, RelatednessScorer, TieBreaker,
};
use pulse_types::{parse_timestamp, ActivityConfig, BlogStats, DayBucket, Document, PulseError, Settings};

use crate::cli::{Cli, Commands, WindowArgs};
use crate::loader::load_documents;

/// Compact view of a post for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub pub_date: &'a str,
    pub tags: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reading_time_minutes: Option<usize>,
}

impl<'a> From<&'a Document> for PostSummary<'a> {
    fn from(document: &'a Document) -> Self {
        Self {
            id: &document.id,
            title: &document.title,
            pub_date: &document.pub_date,
            tags: &document.tags,
            reading_time_minutes: document.reading_time_minutes(),
        }
    }
}

/// Load configuration and posts, run the command and print its output.
///
/// 1. Load configuration (defaults -> file -> env -> CLI)
/// 2. Initialize logging
/// 3. Load the post collection
/// 4. Execute and print JSON
pub fn run(cli: Cli) -> Result<()> {
    let mut settings = Settings::load(cli.config.as_deref()).context("Failed to load configuration")?;

    // CLI flags take precedence
    if let Some(log_level) = cli.log_level {
        settings.log_level = log_level;
    }
    if let Some(posts) = cli.posts {
        settings.posts_path = posts;
    }

    init_logging(&settings.log_level)?;

    let posts_path = settings.expanded_posts_path();
    let documents = load_documents(&posts_path)
        .with_context(|| format!("Failed to load posts from {}", posts_path.display()))?;
    info!(documents = documents.len(), path = %posts_path.display(), "Loaded posts");

    let output = execute(&settings, &documents, cli.command, Utc::now())?;
    println!(
        "{}",
        serde_json::to_string_pretty(&output).context("Failed to render output")?
    );
    Ok(())
}

/// Log to stderr, honouring `RUST_LOG` before the configured level.
pub fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set tracing subscriber")?;
    Ok(())
}

/// Run a command against an already loaded collection.
pub fn execute(settings: &Settings, documents: &[Document], command: Commands, now: DateTime<Utc>) -> Result<Value> {
    let value = match command {
        Commands::Stats { window } => {
            let config = window_config(&settings.activity, &window)?;
            serde_json::to_value(handle_stats(documents, &config, now)?)?
        }
        Commands::Ledger { window, active_only } => {
            let config = window_config(&settings.activity, &window)?;
            serde_json::to_value(handle_ledger(documents, &config, now, active_only)?)?
        }
        Commands::Weekly { window } => {
            let config = window_config(&settings.activity, &window)?;
            serde_json::to_value(handle_weekly(documents, &config, now)?)?
        }
        Commands::Related {
            id,
            limit,
            explain,
            seed,
            no_diversify,
        } => {
            let mut config = settings.related.clone();
            if no_diversify {
                config.diversify = false;
            }
            handle_related(&RelatednessScorer::new(config), documents, &id, limit, explain, seed)?
        }
        Commands::Latest { exclude, limit } => handle_latest(documents, exclude.as_deref(), limit)?,
        Commands::Tags { limit, counts } => {
            let limit = limit.unwrap_or(settings.related.popular_tags_limit);
            handle_tags(documents, limit, counts)?
        }
        Commands::Random { id, limit, seed } => handle_random(documents, &id, limit, seed)?,
    };
    Ok(value)
}

/// Apply window flags over the configured activity settings.
pub fn window_config(base: &ActivityConfig, args: &WindowArgs) -> Result<ActivityConfig> {
    let mut config = base.clone();

    if let Some(from) = &args.from {
        config.start = Some(parse_cli_instant(from)?);
    }
    if let Some(to) = &args.to {
        config.end = Some(parse_cli_instant(to)?);
    }
    if let Some(weeks) = args.weeks {
        config.weeks = Some(weeks);
    }
    if args.no_updates {
        config.include_updates = false;
    }
    if let Some(timezone) = &args.timezone {
        config.timezone = timezone.clone();
    }

    config.validate()?;
    Ok(config)
}

fn parse_cli_instant(value: &str) -> Result<DateTime<Utc>, PulseError> {
    parse_timestamp(value).ok_or_else(|| PulseError::InvalidInput(format!("Invalid date: {value}")))
}

fn aggregate(documents: &[Document], config: &ActivityConfig, now: DateTime<Utc>) -> Result<pulse_activity::Aggregation> {
    let window = AggregationWindow::resolve(config, now)?;
    let aggregation = aggregate_activity(documents, &window);
    log_report(&aggregation.report);
    Ok(aggregation)
}

fn log_report(report: &AggregationReport) {
    info!(
        publications = report.publications,
        updates = report.updates,
        out_of_range = report.out_of_range,
        skipped = report.skipped.len(),
        "Aggregated activity"
    );
    if !report.skipped.is_empty() {
        warn!(
            skipped = report.skipped.len(),
            "Some timestamps could not be parsed; see earlier warnings"
        );
    }
}

/// Cadence statistics for the window, counting this year against `now`.
pub fn handle_stats(documents: &[Document], config: &ActivityConfig, now: DateTime<Utc>) -> Result<BlogStats> {
    let aggregation = aggregate(documents, config, now)?;
    Ok(aggregation.ledger.stats_for_year(now.year()))
}

/// Per-day buckets for the window.
pub fn handle_ledger(documents: &[Document], config: &ActivityConfig, now: DateTime<Utc>, active_only: bool) -> Result<Vec<DayBucket>> {
    let aggregation = aggregate(documents, config, now)?;
    let buckets = aggregation
        .ledger
        .buckets()
        .filter(|bucket| !active_only || bucket.is_active())
        .cloned()
        .collect();
    Ok(buckets)
}

/// ISO-week rollup for the window.
pub fn handle_weekly(documents: &[Document], config: &ActivityConfig, now: DateTime<Utc>) -> Result<Vec<WeekSummary>> {
    let aggregation = aggregate(documents, config, now)?;
    Ok(weekly_rollup(&aggregation.ledger))
}

fn find_document<'a>(documents: &'a [Document], id: &str) -> Result<&'a Document> {
    match documents.iter().find(|doc| doc.id == id) {
        Some(document) => Ok(document),
        None => bail!("No post with id '{id}'"),
    }
}

/// Related posts for `id`; scores and reasons when `explain` is set.
pub fn handle_related(
    scorer: &RelatednessScorer,
    documents: &[Document],
    id: &str,
    limit: Option<usize>,
    explain: bool,
    seed: Option<u64>,
) -> Result<Value> {
    let target = find_document(documents, id)?;
    let limit = limit.unwrap_or(scorer.config().limit);
    let probability = scorer.config().swap_probability;

    let mut tie_breaker: Box<dyn TieBreaker> = match seed {
        Some(seed) => Box::new(RandomTieBreaker::seeded(seed, probability)),
        None => Box::new(RandomTieBreaker::thread_local(probability)),
    };

    let value = if explain {
        let scores: Vec<_> = scorer
            .score_all(target, documents, tie_breaker.as_mut())
            .into_iter()
            .take(limit)
            .collect();
        serde_json::to_value(scores)?
    } else {
        let related: Vec<PostSummary<'_>> = scorer
            .related_with(target, documents, limit, tie_breaker.as_mut())
            .into_iter()
            .map(PostSummary::from)
            .collect();
        serde_json::to_value(related)?
    };
    Ok(value)
}

/// Newest posts, optionally leaving one out.
pub fn handle_latest(documents: &[Document], exclude: Option<&str>, limit: usize) -> Result<Value> {
    let exclude = exclude.map(|id| find_document(documents, id)).transpose()?;
    let latest: Vec<PostSummary<'_>> = latest_posts(documents, exclude, limit)
        .into_iter()
        .map(PostSummary::from)
        .collect();
    Ok(serde_json::to_value(latest)?)
}

/// Most used tags, with counts when `counts` is set.
pub fn handle_tags(documents: &[Document], limit: usize, counts: bool) -> Result<Value> {
    let mut frequencies = tag_frequencies(documents);
    frequencies.truncate(limit);

    let value = if counts {
        serde_json::to_value(frequencies)?
    } else {
        let names: Vec<String> = frequencies.into_iter().map(|entry| entry.tag).collect();
        serde_json::to_value(names)?
    };
    Ok(value)
}

/// Random posts other than `id`.
pub fn handle_random(documents: &[Document], id: &str, limit: usize, seed: Option<u64>) -> Result<Value> {
    let target = find_document(documents, id)?;
    let mut rng: Box<dyn RngCore> = match seed {
        Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
        None => Box::new(rand::rng()),
    };

    let picks: Vec<PostSummary<'_>> = random_posts(target, documents, limit, rng.as_mut())
        .into_iter()
        .map(PostSummary::from)
        .collect();
    Ok(serde_json::to_value(picks)?)
}
