//! Test harness wiring the in-memory store and mock publisher into an
//! orchestrator.

use bot_core::domains::runs::{RunContext, RunOrchestrator, RunReport};
use bot_core::kernel::{BotDeps, MemoryWordStore, MockPublisher};
use bot_core::RunSettings;
use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;

/// Seed used for the random reference date in tests
pub const TEST_SEED: u64 = 7;

pub fn test_settings() -> RunSettings {
    RunSettings {
        tweets_per_day: 3,
        max_attempts: 3,
        retry_delay: Duration::ZERO,
        ..RunSettings::default()
    }
}

pub fn init_tracing() {
    // Run tests with: RUST_LOG=debug cargo test -- --nocapture
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub struct TestHarness {
    pub store: MemoryWordStore,
    pub publisher: Arc<MockPublisher>,
    pub orchestrator: RunOrchestrator,
}

impl TestHarness {
    pub fn new(store: MemoryWordStore, publisher: MockPublisher) -> Self {
        Self::with_settings(store, publisher, test_settings())
    }

    pub fn with_settings(store: MemoryWordStore, publisher: MockPublisher, settings: RunSettings) -> Self {
        init_tracing();
        let publisher = Arc::new(publisher);
        let deps = BotDeps::new(Arc::new(store.clone()), publisher.clone());
        Self {
            store,
            publisher,
            orchestrator: RunOrchestrator::new(deps, settings),
        }
    }

    /// One invocation (with retries) on the given day
    pub async fn run_on(&self, today: NaiveDate) -> RunReport {
        self.orchestrator
            .run_with_retries(RunContext::new(today, TEST_SEED))
            .await
    }
}
