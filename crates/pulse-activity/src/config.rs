//! Aggregation window resolution.
//!
//! Turns an [`ActivityConfig`] (where every field is optional) into a
//! concrete window: start and end instants, the timezone that cuts days,
//! and whether update events are counted.

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use chrono_tz::Tz;

use pulse_types::{ActivityConfig, PulseError};

use crate::date_key::day_key;

/// Concrete aggregation window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregationWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub timezone: Tz,
    pub include_updates: bool,
}

impl AggregationWindow {
    /// Create a window, failing with `InvalidRange` if `end < start`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, timezone: Tz) -> Result<Self, PulseError> {
        if end < start {
            return Err(PulseError::InvalidRange { start, end });
        }
        Ok(Self {
            start,
            end,
            timezone,
            include_updates: true,
        })
    }

    /// Resolve configuration against `now`.
    ///
    /// - end defaults to `now`
    /// - start defaults to `end - weeks*7` days when `weeks` is set,
    ///   otherwise `end - lookback_days`
    pub fn resolve(config: &ActivityConfig, now: DateTime<Utc>) -> Result<Self, PulseError> {
        let timezone = config.parse_timezone()?;
        let end = config.end.unwrap_or(now);
        let start = match config.start {
            Some(start) => start,
            None => {
                let days = match config.weeks {
                    Some(weeks) => i64::from(weeks) * 7,
                    None => i64::from(config.lookback_days),
                };
                TimeDelta::try_days(days)
                    .and_then(|span| end.checked_sub_signed(span))
                    .ok_or_else(|| {
                        PulseError::Config(format!("a {days}-day window before {end} is out of range"))
                    })?
            }
        };

        Ok(Self::new(start, end, timezone)?.with_updates(config.include_updates))
    }

    /// Resolve configuration against the current time.
    pub fn from_config(config: &ActivityConfig) -> Result<Self, PulseError> {
        Self::resolve(config, Utc::now())
    }

    pub fn with_updates(mut self, include_updates: bool) -> Self {
        self.include_updates = include_updates;
        self
    }

    /// True when `instant` lies in `[start, end]`.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant <= self.end
    }

    /// Calendar day of the window start.
    pub fn first_day(&self) -> NaiveDate {
        day_key(self.start, self.timezone)
    }

    /// Calendar day of the window end.
    pub fn last_day(&self) -> NaiveDate {
        day_key(self.end, self.timezone)
    }

    /// Day key of `instant` in this window's timezone.
    pub fn day_of(&self, instant: DateTime<Utc>) -> NaiveDate {
        day_key(instant, self.timezone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_new_rejects_inverted_range() {
        let result = AggregationWindow::new(at(2026, 2, 1, 0), at(2026, 1, 1, 0), chrono_tz::UTC);
        assert!(matches!(result, Err(PulseError::InvalidRange { .. })));
    }

    #[test]
    fn test_new_accepts_single_instant() {
        let window = AggregationWindow::new(at(2026, 1, 1, 0), at(2026, 1, 1, 0), chrono_tz::UTC).unwrap();
        assert_eq!(window.first_day(), window.last_day());
    }

    #[test]
    fn test_resolve_defaults_to_lookback() {
        let now = at(2026, 10, 17, 12);
        let window = AggregationWindow::resolve(&ActivityConfig::default(), now).unwrap();
        assert_eq!(window.end, now);
        assert_eq!(window.start, now - TimeDelta::days(365));
        assert_eq!(window.timezone, chrono_tz::Asia::Shanghai);
        assert!(window.include_updates);
    }

    #[test]
    fn test_resolve_with_weeks() {
        let now = at(2026, 10, 17, 12);
        let config = ActivityConfig {
            weeks: Some(4),
            include_updates: false,
            timezone: "UTC".to_string(),
            ..Default::default()
        };
        let window = AggregationWindow::resolve(&config, now).unwrap();
        assert_eq!(window.start, now - TimeDelta::days(28));
        assert!(!window.include_updates);
    }

    #[test]
    fn test_resolve_explicit_bounds_win() {
        let config = ActivityConfig {
            start: Some(at(2026, 1, 1, 0)),
            end: Some(at(2026, 1, 31, 0)),
            weeks: Some(2),
            ..Default::default()
        };
        let window = AggregationWindow::resolve(&config, at(2026, 10, 17, 0)).unwrap();
        assert_eq!(window.start, at(2026, 1, 1, 0));
        assert_eq!(window.end, at(2026, 1, 31, 0));
    }

    #[test]
    fn test_resolve_start_after_now_is_invalid() {
        let config = ActivityConfig {
            start: Some(at(2027, 1, 1, 0)),
            ..Default::default()
        };
        let result = AggregationWindow::resolve(&config, at(2026, 10, 17, 0));
        assert!(matches!(result, Err(PulseError::InvalidRange { .. })));
    }

    #[test]
    fn test_resolve_huge_lookback_is_config_error() {
        let config = ActivityConfig {
            lookback_days: 200_000_000,
            ..Default::default()
        };
        assert!(matches!(
            AggregationWindow::resolve(&config, at(2026, 10, 17, 0)),
            Err(PulseError::Config(_))
        ));

        let config = ActivityConfig {
            weeks: Some(u32::MAX),
            ..Default::default()
        };
        assert!(matches!(
            AggregationWindow::resolve(&config, at(2026, 10, 17, 0)),
            Err(PulseError::Config(_))
        ));
    }

    #[test]
    fn test_resolve_bad_timezone() {
        let config = ActivityConfig {
            timezone: "Mars/Olympus".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            AggregationWindow::resolve(&config, Utc::now()),
            Err(PulseError::InvalidTimezone(_))
        ));
    }

    #[test]
    fn test_contains_is_inclusive() {
        let window = AggregationWindow::new(at(2026, 1, 1, 0), at(2026, 1, 2, 0), chrono_tz::UTC).unwrap();
        assert!(window.contains(at(2026, 1, 1, 0)));
        assert!(window.contains(at(2026, 1, 2, 0)));
        assert!(!window.contains(at(2026, 1, 2, 1)));
        assert!(!window.contains(at(2025, 12, 31, 23)));
    }

    #[test]
    fn test_days_follow_timezone() {
        let window = AggregationWindow::new(
            at(2026, 1, 1, 20),
            at(2026, 1, 3, 20),
            chrono_tz::Asia::Shanghai,
        )
        .unwrap();
        assert_eq!(window.first_day(), NaiveDate::from_ymd_opt(2026, 1, 2).unwrap());
        assert_eq!(window.last_day(), NaiveDate::from_ymd_opt(2026, 1, 4).unwrap());
    }
}
