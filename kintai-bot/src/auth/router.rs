use axum::{extract::Query, response::Html, routing::get, Router};
use serde::Deserialize;

use crate::app_state::AppState;

use super::{SALESFORCE_CALLBACK_PATH, SLACK_CALLBACK_PATH};

const AUTHENTICATED_PAGE: &str = "<!DOCTYPE html>\
<html lang=\"ja\"><head><meta charset=\"utf-8\"><title>kintai</title></head>\
<body><p>認証が完了しました。Slack に戻ってください。</p></body></html>";

pub fn router() -> Router<AppState> {
    Router::new()
        .route(SALESFORCE_CALLBACK_PATH, get(self::get::salesforce_callback))
        .route(SLACK_CALLBACK_PATH, get(self::get::slack_callback))
}

#[derive(Debug, Clone, Deserialize)]
struct AuthzResp {
    code: String,
    state: String,
}

mod get {
    use axum::extract::State;
    use tracing::instrument;

    use crate::{
        domain::models::{AuthState, StateKey},
        routes::ApiError,
    };

    use super::*;

    /// Take the handshake stored under `state`. A state can be used once.
    async fn take_handshake(app_state: &AppState, state: String) -> Result<AuthState, ApiError> {
        app_state
            .states
            .take_state(&StateKey::new(state))
            .await?
            .ok_or_else(|| {
                tracing::warn!("unknown or expired OAuth state");
                ApiError::bad_request("Invalid OAuth state")
            })
    }

    async fn tell_user(app_state: &AppState, handshake: &AuthState, text: &str) {
        if let Err(e) = app_state.slack.respond(&handshake.response_url, text).await {
            tracing::warn!(user = %handshake.user_id, "failed to respond to Slack: {}", e);
        }
    }

    #[instrument(name = "salesforce_callback", skip(app_state, code, state))]
    pub async fn salesforce_callback(
        State(app_state): State<AppState>,
        Query(AuthzResp { code, state }): Query<AuthzResp>,
    ) -> Result<Html<&'static str>, ApiError> {
        let handshake = take_handshake(&app_state, state).await?;
        let token = app_state.oauth.exchange_salesforce_code(code).await?;

        let profile = app_state.users.get_profile(&handshake.user_id).await?;
        app_state
            .users
            .save_profile(&handshake.user_id, profile.with_timesheet_token(token))
            .await?;
        tracing::info!(user = %handshake.user_id, "stored TeamSpirit token");

        tell_user(
            &app_state,
            &handshake,
            "TeamSpirit の認証が完了しました。再度 `/ts` コマンドを実行してください :ok_hand:",
        )
        .await;

        Ok(Html(AUTHENTICATED_PAGE))
    }

    #[instrument(name = "slack_callback", skip(app_state, code, state))]
    pub async fn slack_callback(
        State(app_state): State<AppState>,
        Query(AuthzResp { code, state }): Query<AuthzResp>,
    ) -> Result<Html<&'static str>, ApiError> {
        let handshake = take_handshake(&app_state, state).await?;
        let token = app_state.oauth.exchange_slack_code(code).await?;

        let profile = app_state.users.get_profile(&handshake.user_id).await?;
        app_state
            .users
            .save_profile(&handshake.user_id, profile.with_slack_token(token))
            .await?;
        tracing::info!(user = %handshake.user_id, "stored Slack token");

        tell_user(
            &app_state,
            &handshake,
            "Slack の認証が完了しました。再度 `/ts channel` コマンドを実行してください :ok_hand:",
        )
        .await;

        Ok(Html(AUTHENTICATED_PAGE))
    }
}
