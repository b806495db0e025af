use serde::{Deserialize, Serialize};

use super::UserId;

/// A login handshake that has been started from Slack but not yet completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthState {
    pub team_id: String,
    pub user_id: UserId,
    pub response_url: String,
}

impl AuthState {
    pub fn new(
        team_id: impl Into<String>,
        user_id: impl Into<UserId>,
        response_url: impl Into<String>,
    ) -> Self {
        Self {
            team_id: team_id.into(),
            user_id: user_id.into(),
            response_url: response_url.into(),
        }
    }
}

/// Everything the bot remembers about a Slack user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Salesforce access token used against TeamSpirit.
    pub timesheet_token: Option<String>,
    /// Slack user token used to post notifications.
    pub slack_token: Option<String>,
    /// Channel that receives a copy of every successful stamp.
    pub notify_channel: Option<String>,
}

impl UserProfile {
    pub fn with_timesheet_token(mut self, token: impl Into<String>) -> Self {
        self.timesheet_token = Some(token.into());
        self
    }

    pub fn with_slack_token(mut self, token: impl Into<String>) -> Self {
        self.slack_token = Some(token.into());
        self
    }

    /// Channel and token to notify with, if the user set both up.
    pub fn notification_target(&self) -> Option<(&str, &str)> {
        match (&self.notify_channel, &self.slack_token) {
            (Some(channel), Some(token)) => Some((channel.as_str(), token.as_str())),
            _ => None,
        }
    }
}
