use std::env;
use std::net::SocketAddr;
use std::str::FromStr;

use chrono::{FixedOffset, Offset, Utc};

use crate::error::AppError;
use crate::services::InsightThresholds;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    /// Minutes east of UTC used for calendar-day math when a request does
    /// not supply its own offset.
    pub default_tz_offset_minutes: i32,
    /// `0` disables the reminder scheduler.
    pub reminder_interval_secs: u64,
    pub insight_thresholds: InsightThresholds,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = InsightThresholds::default();

        let database_url = lookup("DATABASE_URL")
            .unwrap_or_else(|| "sqlite://overdue.db?mode=rwc".to_string());
        let bind_addr = parse_var(&lookup, "BIND_ADDR", "127.0.0.1:3000".parse().ok())?;
        let default_tz_offset_minutes = parse_var(&lookup, "DEFAULT_TZ_OFFSET_MINUTES", Some(0))?;
        tz_offset(default_tz_offset_minutes).map_err(|e| AppError::Config(e.to_string()))?;

        let insight_thresholds = InsightThresholds {
            high_completion_rate: parse_var(
                &lookup,
                "INSIGHT_HIGH_COMPLETION_RATE",
                Some(defaults.high_completion_rate),
            )?,
            low_completion_rate: parse_var(
                &lookup,
                "INSIGHT_LOW_COMPLETION_RATE",
                Some(defaults.low_completion_rate),
            )?,
            busy_week_threshold: parse_var(
                &lookup,
                "INSIGHT_BUSY_WEEK_THRESHOLD",
                Some(defaults.busy_week_threshold),
            )?,
            active_streak_days: parse_var(
                &lookup,
                "INSIGHT_ACTIVE_STREAK_DAYS",
                Some(defaults.active_streak_days),
            )?,
            min_samples_for_average: parse_var(
                &lookup,
                "INSIGHT_MIN_SAMPLES_FOR_AVERAGE",
                Some(defaults.min_samples_for_average),
            )?,
        };

        Ok(Self {
            database_url,
            bind_addr,
            default_tz_offset_minutes,
            reminder_interval_secs: parse_var(&lookup, "REMINDER_INTERVAL_SECS", Some(900))?,
            insight_thresholds,
        })
    }

    pub fn default_offset(&self) -> FixedOffset {
        tz_offset(self.default_tz_offset_minutes).unwrap_or_else(|_| Utc.fix())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            default_tz_offset_minutes: 0,
            reminder_interval_secs: 0,
            insight_thresholds: InsightThresholds::default(),
        }
    }
}

/// Converts minutes east of UTC into an offset, rejecting anything beyond
/// a day in either direction.
pub fn tz_offset(minutes: i32) -> Result<FixedOffset, AppError> {
    minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| AppError::BadRequest(format!("tz_offset out of range: {}", minutes)))
}

fn parse_var<F, T>(lookup: &F, key: &str, default: Option<T>) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{} has an invalid value: {}", key, raw))),
        None => default.ok_or_else(|| AppError::Config(format!("{} is not set", key))),
    }
}
