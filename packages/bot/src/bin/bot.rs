//! Mandarin word bot CLI
//!
//! - `bot run`: one invocation (for an external scheduler)
//! - `bot schedule`: long-running process firing runs on `RUN_SCHEDULE`
//! - `bot load <file>`: queue words from a `word, pinyin[, annotation]` file

use anyhow::{Context, Result};
use bot_core::domains::queue::models::{Setting, UnprocessedWord, QUEUE_CURSOR};
use bot_core::domains::runs::RunOrchestrator;
use bot_core::kernel::scheduled_tasks::start_scheduler;
use bot_core::kernel::{BaseWordStore, BotDeps, PostgresWordStore, TwitterAdapter};
use bot_core::Config;
use chrono::Utc;
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use twitter::{TwitterOptions, TwitterService};

#[derive(Parser)]
#[command(name = "bot")]
#[command(about = "Tweets one unseen Mandarin word with links to earlier ones")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run once and exit (exit code 2 when the queue is empty)
    Run,

    /// Keep running, firing a run on the configured cron schedule
    Schedule,

    /// Queue words from a file with one `word, pinyin[, annotation]` per line
    Load { file: PathBuf },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,bot_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;

    // Connect to database
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::debug!("Migrations complete");

    match cli.command {
        Commands::Run => {
            let orchestrator = build_orchestrator(&config, pool);
            let report = orchestrator.run_once().await;
            if report.is_success() {
                Ok(ExitCode::SUCCESS)
            } else if report.is_queue_exhausted() {
                Ok(ExitCode::from(2))
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
        Commands::Schedule => {
            let orchestrator = Arc::new(build_orchestrator(&config, pool));
            let mut scheduler = start_scheduler(orchestrator, &config.schedule).await?;

            tokio::signal::ctrl_c()
                .await
                .context("Failed to listen for shutdown signal")?;
            tracing::info!("Shutting down scheduler");
            scheduler.shutdown().await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Load { file } => {
            load_words(&file, pool).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn build_orchestrator(config: &Config, pool: PgPool) -> RunOrchestrator {
    let twitter = TwitterService::new(TwitterOptions {
        bearer_token: config.twitter_bearer_token.clone(),
        username: config.twitter_username.clone(),
    });
    let deps = BotDeps::new(
        Arc::new(PostgresWordStore::new(pool)),
        Arc::new(TwitterAdapter::new(Arc::new(twitter))),
    );
    RunOrchestrator::new(deps, config.run_settings())
}

/// Parse a `word, pinyin[, annotation]` line. Commas inside the annotation
/// are kept.
fn parse_line(line: &str) -> Option<(String, String, Option<String>)> {
    let mut parts = line.splitn(3, ',').map(str::trim);
    let word = parts.next().filter(|w| !w.is_empty())?;
    let pinyin = parts.next().filter(|p| !p.is_empty())?;
    let annotation = parts.next().filter(|a| !a.is_empty()).map(str::to_string);
    Some((word.to_string(), pinyin.to_string(), annotation))
}

/// Timestamp for the first line of a new load; each later line adds one.
///
/// Microseconds since the epoch, pushed past everything already queued and
/// past the cursor so a quick second load neither collides with the first
/// nor lands behind the cursor where it would never be selected.
fn first_insertion_timestamp(now_micros: i64, newest_queued: Option<i64>, cursor: i64) -> i64 {
    let after_existing = newest_queued.unwrap_or(0).max(cursor).saturating_add(1);
    now_micros.max(after_existing)
}

async fn load_words(file: &Path, pool: PgPool) -> Result<()> {
    let contents = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let store = PostgresWordStore::new(pool.clone());

    let newest_queued = UnprocessedWord::max_insertion_timestamp(&pool).await?;
    let cursor = Setting::find_by_name(QUEUE_CURSOR, &pool)
        .await?
        .map(|s| s.value)
        .unwrap_or(0);
    let base = first_insertion_timestamp(Utc::now().timestamp_micros(), newest_queued, cursor);
    let mut inserted = 0;
    let mut skipped = 0;

    for (idx, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let Some((characters, pinyin, annotation)) = parse_line(line) else {
            tracing::warn!(line = idx + 1, "Invalid line: {}", line);
            skipped += 1;
            continue;
        };

        let word = UnprocessedWord {
            id: uuid::Uuid::new_v4(),
            characters,
            pinyin,
            annotation,
            insertion_timestamp: base + idx as i64,
            created_at: Utc::now(),
        };
        if store.insert_word(&word).await? {
            inserted += 1;
        }
    }

    let queued = UnprocessedWord::count(&pool).await?;
    tracing::info!(inserted, skipped, queued, "Loaded words into queue");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_word_and_pinyin() {
        assert_eq!(
            parse_line("苹果, píngguǒ"),
            Some(("苹果".into(), "píngguǒ".into(), None))
        );
    }

    #[test]
    fn keeps_commas_in_annotation() {
        assert_eq!(
            parse_line("桌子, zhuōzi, table, desk"),
            Some(("桌子".into(), "zhuōzi".into(), Some("table, desk".into())))
        );
    }

    #[test]
    fn load_starts_at_current_time_when_queue_is_older() {
        assert_eq!(first_insertion_timestamp(1_000, Some(500), 400), 1_000);
        assert_eq!(first_insertion_timestamp(1_000, None, 0), 1_000);
    }

    #[test]
    fn load_starts_after_newest_queued_word() {
        // A second load in the same microsecond range as a large first load
        assert_eq!(first_insertion_timestamp(1_000, Some(1_499), 0), 1_500);
    }

    #[test]
    fn load_starts_after_cursor() {
        assert_eq!(first_insertion_timestamp(1_000, None, 2_000), 2_001);
    }

    #[test]
    fn rejects_incomplete_lines() {
        assert_eq!(parse_line("苹果"), None);
        assert_eq!(parse_line("苹果, "), None);
        assert_eq!(parse_line(", píngguǒ"), None);
    }
}
