//! Minimal Twitter v2 REST client.
//!
//! Only the calls the word bot needs: create a tweet, check that a tweet
//! still exists, and build the public URL of a tweet.
//!
//! # Example
//!
//! ```rust,ignore
//! use twitter::{TwitterOptions, TwitterService};
//!
//! let service = TwitterService::new(TwitterOptions {
//!     bearer_token: "user-context-token".into(),
//!     username: "mandarinwords".into(),
//! });
//!
//! let tweet = service.post_tweet("苹果 (píngguǒ): apple").await?;
//! println!("{}", service.tweet_url(&tweet.id));
//! ```

pub mod error;
pub mod models;

pub use error::{Result, TwitterError};
pub use models::PostedTweet;

use models::{CreateTweetRequest, CreateTweetResponse, LookupResponse};
use reqwest::{Client, Response, StatusCode};

const BASE_URL: &str = "https://api.twitter.com/2";

#[derive(Debug, Clone)]
pub struct TwitterOptions {
    /// OAuth 2.0 user-context access token with `tweet.write` scope.
    pub bearer_token: String,
    /// Account handle used to build tweet URLs.
    pub username: String,
}

#[derive(Debug, Clone)]
pub struct TwitterService {
    client: Client,
    options: TwitterOptions,
}

impl TwitterService {
    pub fn new(options: TwitterOptions) -> Self {
        Self {
            client: Client::new(),
            options,
        }
    }

    pub fn username(&self) -> &str {
        &self.options.username
    }

    /// Post a tweet with the given body.
    pub async fn post_tweet(&self, text: &str) -> Result<PostedTweet> {
        let url = format!("{}/tweets", BASE_URL);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.options.bearer_token)
            .json(&CreateTweetRequest { text })
            .send()
            .await?;

        let resp = check_status(resp).await?;
        let created: CreateTweetResponse = resp.json().await?;
        tracing::debug!(tweet_id = %created.data.id, "Tweet created");
        Ok(created.data)
    }

    /// Whether a tweet with the given id is still visible.
    pub async fn tweet_exists(&self, tweet_id: &str) -> Result<bool> {
        let url = format!("{}/tweets/{}", BASE_URL, tweet_id);
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.options.bearer_token)
            .send()
            .await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }

        let resp = check_status(resp).await?;
        let lookup: LookupResponse = resp.json().await?;
        if let Some(problem) = lookup.errors.first() {
            tracing::debug!(
                tweet_id,
                title = ?problem.title,
                detail = ?problem.detail,
                "Tweet lookup returned an error"
            );
        }
        Ok(lookup.data.map(|t| t.id == tweet_id).unwrap_or(false))
    }

    /// Public URL of a tweet posted by the configured account.
    pub fn tweet_url(&self, tweet_id: &str) -> String {
        tweet_url(&self.options.username, tweet_id)
    }
}

/// Returns the URL to the tweet with the given id by the given user.
pub fn tweet_url(username: &str, tweet_id: &str) -> String {
    format!("https://twitter.com/{}/status/{}", username, tweet_id)
}

async fn check_status(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        let reset_at = resp
            .headers()
            .get("x-rate-limit-reset")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());
        return Err(TwitterError::RateLimited { reset_at });
    }

    let message = resp.text().await.unwrap_or_default();
    Err(TwitterError::Api {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tweet_url_uses_username_and_id() {
        assert_eq!(
            tweet_url("mandarinwords", "123"),
            "https://twitter.com/mandarinwords/status/123"
        );
    }

    #[test]
    fn service_builds_url_from_options() {
        let service = TwitterService::new(TwitterOptions {
            bearer_token: "token".into(),
            username: "words".into(),
        });
        assert_eq!(service.tweet_url("9"), "https://twitter.com/words/status/9");
        assert_eq!(service.username(), "words");
    }
}
