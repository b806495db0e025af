use axum::{routing::post, Router};

use crate::{
    adapters::inbound::http::SlackMessage, app_state::AppState, domain::models::AuthState,
    routes::ApiError,
};

mod action;
mod command;
mod messages;
mod payload;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/command", post(command::handle_command))
        .route("/action", post(action::handle_action))
}

/// Reject requests that do not carry the app's verification token.
fn verify_token(app_state: &AppState, token: &str) -> Result<(), ApiError> {
    if token == app_state.verification_token {
        Ok(())
    } else {
        tracing::warn!("rejected Slack request with bad verification token");
        Err(ApiError::unauthorized("Invalid verification token"))
    }
}

/// Store the handshake and build the TeamSpirit login prompt for it.
async fn login_prompt(app_state: &AppState, state: AuthState) -> Result<SlackMessage, ApiError> {
    let key = app_state.states.store_state(state).await?;
    let url = app_state.oauth.salesforce_authorize_url(&key);

    Ok(messages::login_prompt(url.as_str()))
}

/// Store the handshake and build the Slack login prompt for it.
async fn slack_auth_prompt(
    app_state: &AppState,
    state: AuthState,
) -> Result<SlackMessage, ApiError> {
    let team_id = state.team_id.clone();
    let key = app_state.states.store_state(state).await?;
    let url = app_state.oauth.slack_authorize_url(&team_id, &key);

    Ok(messages::slack_auth_prompt(url.as_str()))
}
