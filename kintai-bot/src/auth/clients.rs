use oauth2::{
    basic::{BasicClient, BasicRequestTokenError},
    reqwest::{async_http_client, AsyncHttpClientError},
    AuthType, AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, RedirectUrl, Scope,
    TokenResponse, TokenUrl,
};
use serde::Deserialize;
use url::Url;

use crate::{config::Settings, domain::models::StateKey};

pub const SALESFORCE_CALLBACK_PATH: &str = "/oauth/salesforce/callback";
pub const SLACK_CALLBACK_PATH: &str = "/oauth/slack/callback";

/// User scope needed to post stamp notifications as the user.
const SLACK_USER_SCOPE: &str = "chat:write:user";

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid OAuth URL: {0}")]
    InvalidUrl(#[from] oauth2::url::ParseError),

    #[error(transparent)]
    OAuth2(#[from] BasicRequestTokenError<AsyncHttpClientError>),

    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    #[error("slack rejected the code: {0}")]
    Slack(String),
}

/// Response of Slack's `oauth.access`. It carries no `token_type`, so it is
/// not a standard token response.
#[derive(Debug, Deserialize)]
struct SlackAccess {
    ok: bool,
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// OAuth clients for the two logins the bot asks users for: Salesforce for
/// TeamSpirit access and Slack for posting notifications.
pub struct OAuthClients {
    salesforce: BasicClient,
    slack: BasicClient,
    slack_client_id: String,
    slack_client_secret: String,
    slack_token_url: String,
    slack_redirect_url: String,
    http: reqwest::Client,
}

impl OAuthClients {
    pub fn new(settings: &Settings) -> Result<Self, AuthError> {
        let app = &settings.application;

        let salesforce = BasicClient::new(
            ClientId::new(settings.salesforce.client_id.clone()),
            Some(ClientSecret::new(settings.salesforce.client_secret.clone())),
            AuthUrl::new(settings.salesforce.auth_url.clone())?,
            Some(TokenUrl::new(settings.salesforce.token_url.clone())?),
        )
        .set_auth_type(AuthType::RequestBody)
        .set_redirect_uri(RedirectUrl::new(app.callback_url(SALESFORCE_CALLBACK_PATH))?);

        let slack_redirect_url = app.callback_url(SLACK_CALLBACK_PATH);
        let slack = BasicClient::new(
            ClientId::new(settings.slack.client_id.clone()),
            Some(ClientSecret::new(settings.slack.client_secret.clone())),
            AuthUrl::new(settings.slack.auth_url.clone())?,
            None,
        )
        .set_redirect_uri(RedirectUrl::new(slack_redirect_url.clone())?);

        Ok(Self {
            salesforce,
            slack,
            slack_client_id: settings.slack.client_id.clone(),
            slack_client_secret: settings.slack.client_secret.clone(),
            slack_token_url: settings.slack.token_url.clone(),
            slack_redirect_url,
            http: reqwest::Client::new(),
        })
    }

    /// Salesforce authorize URL carrying `key` as its `state`.
    pub fn salesforce_authorize_url(&self, key: &StateKey) -> Url {
        let state = key.as_str().to_string();
        let (url, _) = self
            .salesforce
            .authorize_url(move || CsrfToken::new(state))
            .url();
        url
    }

    /// Slack authorize URL for a user token, pinned to the user's workspace.
    pub fn slack_authorize_url(&self, team_id: &str, key: &StateKey) -> Url {
        let state = key.as_str().to_string();
        let (url, _) = self
            .slack
            .authorize_url(move || CsrfToken::new(state))
            .add_scope(Scope::new(SLACK_USER_SCOPE.to_string()))
            .add_extra_param("team", team_id)
            .url();
        url
    }

    /// Exchange a Salesforce authorization code for an access token.
    pub async fn exchange_salesforce_code(&self, code: String) -> Result<String, AuthError> {
        let token = self
            .salesforce
            .exchange_code(AuthorizationCode::new(code))
            .request_async(async_http_client)
            .await?;

        Ok(token.access_token().secret().clone())
    }

    /// Exchange a Slack authorization code for a user token.
    pub async fn exchange_slack_code(&self, code: String) -> Result<String, AuthError> {
        let access = self
            .http
            .post(&self.slack_token_url)
            .form(&[
                ("client_id", self.slack_client_id.as_str()),
                ("client_secret", self.slack_client_secret.as_str()),
                ("code", code.as_str()),
                ("redirect_uri", self.slack_redirect_url.as_str()),
            ])
            .send()
            .await?
            .json::<SlackAccess>()
            .await?;

        slack_token(access)
    }
}

fn slack_token(access: SlackAccess) -> Result<String, AuthError> {
    match access {
        SlackAccess {
            ok: true,
            access_token: Some(token),
            ..
        } => Ok(token),
        SlackAccess { error, .. } => Err(AuthError::Slack(
            error.unwrap_or_else(|| "missing access_token".to_string()),
        )),
    }
}
