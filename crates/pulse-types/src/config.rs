//! Configuration loading for blog-pulse.
//!
//! Layered config: defaults -> config file -> env vars -> CLI flags.
//! The default config file lives at ~/.config/blog-pulse/config.toml.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::PulseError;

/// Canonical timezone for day boundaries when none is configured.
pub const DEFAULT_TIMEZONE: &str = "Asia/Shanghai";

/// Longest default window, in days, that `lookback_days` or `weeks` may ask for.
pub const MAX_WINDOW_DAYS: u32 = 36_600;

/// Settings for the activity pipeline (bucketer, aggregator, stats).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityConfig {
    /// Window start. Defaults to `end - lookback_days` (or `end - weeks*7`).
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,

    /// Window end. Defaults to now.
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,

    /// Days covered when `start` is not set.
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,

    /// Size the default window in whole weeks instead of `lookback_days`.
    #[serde(default)]
    pub weeks: Option<u32>,

    /// Count update events alongside publications.
    #[serde(default = "default_true")]
    pub include_updates: bool,

    /// IANA timezone used to cut calendar days.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_lookback_days() -> u32 {
    365
}

fn default_true() -> bool {
    true
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            start: None,
            end: None,
            lookback_days: default_lookback_days(),
            weeks: None,
            include_updates: default_true(),
            timezone: default_timezone(),
        }
    }
}

impl ActivityConfig {
    /// Parse the configured timezone string into a `chrono_tz::Tz`.
    pub fn parse_timezone(&self) -> Result<Tz, PulseError> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| PulseError::InvalidTimezone(self.timezone.clone()))
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), PulseError> {
        self.parse_timezone()?;
        if self.weeks == Some(0) {
            return Err(PulseError::Config("weeks must be > 0".to_string()));
        }
        if self.lookback_days > MAX_WINDOW_DAYS {
            return Err(PulseError::Config(format!(
                "lookback_days must be <= {MAX_WINDOW_DAYS}, got {}",
                self.lookback_days
            )));
        }
        if let Some(weeks) = self.weeks {
            if u64::from(weeks) * 7 > u64::from(MAX_WINDOW_DAYS) {
                return Err(PulseError::Config(format!(
                    "weeks must cover at most {MAX_WINDOW_DAYS} days, got {weeks}"
                )));
            }
        }
        if let (Some(start), Some(end)) = (self.start, self.end) {
            if end < start {
                return Err(PulseError::InvalidRange { start, end });
            }
        }
        Ok(())
    }
}

/// Settings for the relatedness scorer.
///
/// Weights are additive points per factor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelatedConfig {
    /// Maximum documents returned
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Points per shared tag
    #[serde(default = "default_tag_weight")]
    pub tag_weight: f64,

    /// Points for an equal, non-empty category
    #[serde(default = "default_category_weight")]
    pub category_weight: f64,

    /// Points for an equal, non-empty author
    #[serde(default = "default_author_weight")]
    pub author_weight: f64,

    /// Publish-date distance (days) within which the recency bonus applies
    #[serde(default = "default_recency_window_days")]
    pub recency_window_days: f64,

    /// Recency bonus for same-day publication
    #[serde(default = "default_recency_max_bonus")]
    pub recency_max_bonus: f64,

    /// Bonus lost per day of distance
    #[serde(default = "default_recency_decay_per_day")]
    pub recency_decay_per_day: f64,

    /// Adjacent scores closer than this count as near-ties
    #[serde(default = "default_tie_margin")]
    pub tie_margin: f64,

    /// Near-ties are only shuffled above this score
    #[serde(default = "default_tie_threshold")]
    pub tie_threshold: f64,

    /// Chance of swapping an eligible adjacent pair
    #[serde(default = "default_swap_probability")]
    pub swap_probability: f64,

    /// Enable the near-tie swap pass
    #[serde(default = "default_true")]
    pub diversify: bool,

    /// Default size of the popular tags list
    #[serde(default = "default_popular_tags_limit")]
    pub popular_tags_limit: usize,
}

fn default_limit() -> usize {
    4
}
fn default_tag_weight() -> f64 {
    30.0
}
fn default_category_weight() -> f64 {
    20.0
}
fn default_author_weight() -> f64 {
    5.0
}
fn default_recency_window_days() -> f64 {
    90.0
}
fn default_recency_max_bonus() -> f64 {
    10.0
}
fn default_recency_decay_per_day() -> f64 {
    0.1
}
fn default_tie_margin() -> f64 {
    10.0
}
fn default_tie_threshold() -> f64 {
    50.0
}
fn default_swap_probability() -> f64 {
    0.5
}
fn default_popular_tags_limit() -> usize {
    10
}

impl Default for RelatedConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            tag_weight: default_tag_weight(),
            category_weight: default_category_weight(),
            author_weight: default_author_weight(),
            recency_window_days: default_recency_window_days(),
            recency_max_bonus: default_recency_max_bonus(),
            recency_decay_per_day: default_recency_decay_per_day(),
            tie_margin: default_tie_margin(),
            tie_threshold: default_tie_threshold(),
            swap_probability: default_swap_probability(),
            diversify: default_true(),
            popular_tags_limit: default_popular_tags_limit(),
        }
    }
}

impl RelatedConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), PulseError> {
        if !(0.0..=1.0).contains(&self.swap_probability) {
            return Err(PulseError::Config(format!(
                "swap_probability must be 0.0-1.0, got {}",
                self.swap_probability
            )));
        }
        let weights = [
            ("tag_weight", self.tag_weight),
            ("category_weight", self.category_weight),
            ("author_weight", self.author_weight),
            ("recency_window_days", self.recency_window_days),
            ("recency_max_bonus", self.recency_max_bonus),
            ("recency_decay_per_day", self.recency_decay_per_day),
            ("tie_margin", self.tie_margin),
        ];
        for (name, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(PulseError::Config(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Directory of markdown posts, or a JSON collection file
    #[serde(default = "default_posts_path")]
    pub posts_path: String,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub activity: ActivityConfig,

    #[serde(default)]
    pub related: RelatedConfig,
}

fn default_posts_path() -> String {
    "./content/blog".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            posts_path: default_posts_path(),
            log_level: default_log_level(),
            activity: ActivityConfig::default(),
            related: RelatedConfig::default(),
        }
    }
}

impl Settings {
    /// Load settings with layered precedence:
    /// 1. Built-in defaults
    /// 2. Config file (~/.config/blog-pulse/config.toml)
    /// 3. CLI-specified config file (optional)
    /// 4. Environment variables (PULSE_*, nested with `__`)
    ///
    /// CLI flags should be applied by the caller after this returns.
    pub fn load(cli_config_path: Option<&str>) -> Result<Self, PulseError> {
        let config_dir = ProjectDirs::from("", "", "blog-pulse")
            .map(|p| p.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        let default_config_path = config_dir.join("config");

        let mut builder = Config::builder()
            .set_default("posts_path", default_posts_path())
            .map_err(|e| PulseError::Config(e.to_string()))?
            .set_default("log_level", default_log_level())
            .map_err(|e| PulseError::Config(e.to_string()))?
            .set_default("activity.lookback_days", default_lookback_days() as i64)
            .map_err(|e| PulseError::Config(e.to_string()))?
            .set_default("activity.include_updates", default_true())
            .map_err(|e| PulseError::Config(e.to_string()))?
            .set_default("activity.timezone", default_timezone())
            .map_err(|e| PulseError::Config(e.to_string()))?
            .set_default("related.limit", default_limit() as i64)
            .map_err(|e| PulseError::Config(e.to_string()))?
            .add_source(File::with_name(&default_config_path.to_string_lossy()).required(false));

        if let Some(path) = cli_config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Format: PULSE_LOG_LEVEL, PULSE_ACTIVITY__TIMEZONE, PULSE_RELATED__LIMIT, etc.
        builder = builder.add_source(
            Environment::with_prefix("PULSE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| PulseError::Config(e.to_string()))?;

        let settings: Settings = config
            .try_deserialize()
            .map_err(|e| PulseError::Config(e.to_string()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<(), PulseError> {
        self.activity.validate()?;
        self.related.validate()
    }

    /// Expand ~ in posts_path to the home directory.
    pub fn expanded_posts_path(&self) -> PathBuf {
        if let Some(rest) = self.posts_path.strip_prefix("~/") {
            if let Some(home) = directories::BaseDirs::new().map(|d| d.home_dir().to_path_buf()) {
                return home.join(rest);
            }
        }
        PathBuf::from(&self.posts_path)
    }
}
