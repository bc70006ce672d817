use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct CreateTweetRequest<'a> {
    pub text: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTweetResponse {
    pub data: PostedTweet,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PostedTweet {
    pub id: String,
    pub text: String,
}

/// Response of `GET /2/tweets/:id`. Deleted or unknown tweets come back with
/// `errors` and no `data`.
#[derive(Debug, Clone, Deserialize)]
pub struct LookupResponse {
    pub data: Option<PostedTweet>,
    #[serde(default)]
    pub errors: Vec<ApiProblem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiProblem {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_of_deleted_tweet_has_no_data() {
        let body = r#"{"errors":[{"title":"Not Found Error","detail":"Could not find tweet with id: [1]."}]}"#;
        let parsed: LookupResponse = serde_json::from_str(body).unwrap();
        assert!(parsed.data.is_none());
        assert_eq!(parsed.errors.len(), 1);
    }

    #[test]
    fn create_response_parses_id() {
        let body = r#"{"data":{"id":"1445880548472328192","text":"苹果 (píngguǒ)"}}"#;
        let parsed: CreateTweetResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.data.id, "1445880548472328192");
    }
}
