use anyhow::{Context, Result};
use chrono::{FixedOffset, Local, Offset, Utc};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub twitter_bearer_token: String,
    pub twitter_username: String,
    pub tweets_per_day: i64,
    pub max_attempts: u32,
    pub retry_delay_ms: u64,
    /// Cron expression (with seconds) used by `bot schedule`
    pub schedule: String,
    /// Zone whose calendar date counts as "today"
    pub utc_offset: FixedOffset,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            twitter_bearer_token: env::var("TWITTER_BEARER_TOKEN")
                .context("TWITTER_BEARER_TOKEN must be set")?,
            twitter_username: env::var("TWITTER_USERNAME")
                .context("TWITTER_USERNAME must be set")?,
            tweets_per_day: env::var("TWEETS_PER_DAY")
                .unwrap_or_else(|_| "3".to_string())
                .parse()
                .context("TWEETS_PER_DAY must be a valid number")?,
            max_attempts: env::var("RUN_MAX_ATTEMPTS")
                .unwrap_or_else(|_| "3".to_string())
                .parse()
                .context("RUN_MAX_ATTEMPTS must be a valid number")?,
            retry_delay_ms: env::var("RUN_RETRY_DELAY_MS")
                .unwrap_or_else(|_| "2000".to_string())
                .parse()
                .context("RUN_RETRY_DELAY_MS must be a valid number")?,
            schedule: env::var("RUN_SCHEDULE")
                .unwrap_or_else(|_| "0 0 14,18,22 * * *".to_string()),
            utc_offset: match env::var("RUN_UTC_OFFSET_MINUTES") {
                Ok(minutes) => parse_utc_offset(&minutes)?,
                Err(_) => *Local::now().offset(),
            },
        })
    }

    /// The part of the configuration the run orchestrator needs
    pub fn run_settings(&self) -> RunSettings {
        RunSettings {
            tweets_per_day: self.tweets_per_day,
            max_attempts: self.max_attempts.max(1),
            retry_delay: Duration::from_millis(self.retry_delay_ms),
            utc_offset: self.utc_offset,
        }
    }
}

/// Parse an offset east of UTC given in minutes (`480` for UTC+8)
fn parse_utc_offset(minutes: &str) -> Result<FixedOffset> {
    let minutes: i32 = minutes
        .trim()
        .parse()
        .context("RUN_UTC_OFFSET_MINUTES must be a valid number")?;
    minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .context("RUN_UTC_OFFSET_MINUTES is out of range")
}

/// Limits applied to each invocation of the bot
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub tweets_per_day: i64,
    pub max_attempts: u32,
    pub retry_delay: Duration,
    pub utc_offset: FixedOffset,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            tweets_per_day: 3,
            max_attempts: 3,
            retry_delay: Duration::from_secs(2),
            utc_offset: Utc.fix(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utc_offset_is_given_in_minutes() {
        assert_eq!(parse_utc_offset("480").unwrap().local_minus_utc(), 8 * 3600);
        assert_eq!(parse_utc_offset(" -300 ").unwrap().local_minus_utc(), -5 * 3600);
        assert_eq!(parse_utc_offset("0").unwrap(), Utc.fix());
    }

    #[test]
    fn bad_utc_offsets_are_rejected() {
        assert!(parse_utc_offset("eight").is_err());
        assert!(parse_utc_offset("1440").is_err());
    }
}
