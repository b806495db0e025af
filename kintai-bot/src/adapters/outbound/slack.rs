use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};

use crate::domain::ports::outbound::{Notifier, NotifyError};

const SLACK_API_BASE: &str = "https://slack.com/api";

/// Thin client for the parts of the Slack Web API the bot calls on its own:
/// `chat.postMessage` and delayed responses to a `response_url`.
#[derive(Clone)]
pub struct SlackWebClient {
    http: reqwest::Client,
    api_base: String,
}

#[derive(Serialize)]
struct PostMessage<'a> {
    channel: &'a str,
    text: &'a str,
}

#[derive(Serialize)]
struct DelayedResponse<'a> {
    text: &'a str,
    response_type: &'a str,
    replace_original: bool,
}

/// Envelope every Web API method answers with.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

impl SlackWebClient {
    pub fn new() -> Self {
        Self::with_api_base(SLACK_API_BASE)
    }

    pub fn with_api_base(api_base: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    /// Replace the original prompt behind `response_url` with `text`.
    pub async fn respond(&self, response_url: &str, text: &str) -> Result<(), NotifyError> {
        let body = DelayedResponse {
            text,
            response_type: "ephemeral",
            replace_original: true,
        };

        let resp = self
            .http
            .post(response_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| NotifyError::Request(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(NotifyError::Rejected(resp.status().to_string()));
        }

        Ok(())
    }
}

impl Default for SlackWebClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for SlackWebClient {
    async fn post_message(&self, token: &str, channel: &str, text: &str) -> Result<(), NotifyError> {
        let resp = self
            .http
            .post(format!("{}/chat.postMessage", self.api_base))
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .json(&PostMessage { channel, text })
            .send()
            .await
            .map_err(|e| NotifyError::Request(e.to_string()))?
            .json::<ApiResponse>()
            .await
            .map_err(|e| NotifyError::Request(e.to_string()))?;

        check_api_response(resp)
    }
}

fn check_api_response(resp: ApiResponse) -> Result<(), NotifyError> {
    if resp.ok {
        Ok(())
    } else {
        Err(NotifyError::Rejected(
            resp.error.unwrap_or_else(|| "unknown_error".to_string()),
        ))
    }
}
