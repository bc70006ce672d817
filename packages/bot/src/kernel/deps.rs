//! Bot dependencies (using traits for testability)
//!
//! This module provides the dependency container handed to the run orchestrator.
//! Storage and publishing sit behind trait objects so tests can swap them.

use async_trait::async_trait;
use std::sync::Arc;
use twitter::{TwitterError, TwitterService};

use crate::domains::tweets::body::PostMessage;
use crate::kernel::{BasePublisher, BaseWordStore, PublishError};

// =============================================================================
// TwitterService Adapter (implements BasePublisher trait)
// =============================================================================

/// Wrapper around TwitterService that implements BasePublisher trait
pub struct TwitterAdapter(pub Arc<TwitterService>);

impl TwitterAdapter {
    pub fn new(service: Arc<TwitterService>) -> Self {
        Self(service)
    }
}

fn classify(err: TwitterError) -> PublishError {
    if err.is_retryable() {
        PublishError::Retryable(err.into())
    } else {
        PublishError::Rejected(err.into())
    }
}

#[async_trait]
impl BasePublisher for TwitterAdapter {
    async fn publish(&self, message: &PostMessage) -> Result<String, PublishError> {
        self.0
            .post_tweet(&message.text)
            .await
            .map(|tweet| tweet.id)
            .map_err(classify)
    }

    async fn post_exists(&self, post_id: &str) -> Result<bool, PublishError> {
        self.0.tweet_exists(post_id).await.map_err(classify)
    }

    fn post_url(&self, post_id: &str) -> String {
        self.0.tweet_url(post_id)
    }
}

// =============================================================================
// BotDeps
// =============================================================================

/// Dependencies of one bot run
#[derive(Clone)]
pub struct BotDeps {
    pub store: Arc<dyn BaseWordStore>,
    pub publisher: Arc<dyn BasePublisher>,
}

impl BotDeps {
    pub fn new(store: Arc<dyn BaseWordStore>, publisher: Arc<dyn BasePublisher>) -> Self {
        Self { store, publisher }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refused_requests_are_rejected() {
        let err = classify(TwitterError::Api {
            status: 403,
            message: "You are not allowed to create a Tweet with duplicate content.".into(),
        });
        assert!(!err.is_retryable());
    }

    #[test]
    fn rate_limits_are_retryable() {
        let err = classify(TwitterError::RateLimited { reset_at: None });
        assert!(err.is_retryable());
    }
}
