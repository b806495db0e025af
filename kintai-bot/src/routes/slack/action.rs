use axum::{extract::State, Form, Json};
use tracing::instrument;

use crate::{
    adapters::inbound::http::SlackMessage,
    app_state::AppState,
    domain::{
        models::{Action, ActionRequest, AuthState, UserId},
        AttendanceError,
    },
    routes::ApiError,
};

use super::{
    login_prompt, messages,
    payload::{ActionCallback, ActionForm},
    verify_token,
};

#[instrument(name = "slack_action", skip(app_state, form))]
pub async fn handle_action(
    State(app_state): State<AppState>,
    Form(form): Form<ActionForm>,
) -> Result<Json<SlackMessage>, ApiError> {
    let callback: ActionCallback = serde_json::from_str(&form.payload).map_err(|e| {
        tracing::warn!("malformed action payload: {}", e);
        ApiError::bad_request("Malformed payload")
    })?;
    verify_token(&app_state, &callback.token)?;

    let ActionCallback {
        team,
        user,
        response_url,
        actions,
        ..
    } = callback;
    let clicked = actions
        .first()
        .ok_or_else(|| ApiError::bad_request("No action in payload"))?;

    let user_id = UserId::new(user.id);
    tracing::debug!(user = %user_id, action = %clicked.name, "received action");

    let result = match clicked.name.parse::<Action>() {
        Ok(action) => {
            let mut request = ActionRequest::new(action, app_state.now());
            if let Some(selected) = clicked.selected() {
                request = request.with_selected(selected);
            }
            dispatch(&app_state, &user_id, request).await
        }
        Err(_) => Err(AttendanceError::UnknownAction(clicked.name.clone())),
    };

    match result {
        Ok(outcome) => Ok(Json(SlackMessage::in_channel(outcome.confirmation()))),
        Err(e) if e.is_auth_prompt() => {
            let state = AuthState::new(team.id, user_id, response_url);
            login_prompt(&app_state, state).await.map(Json)
        }
        Err(e) => {
            tracing::warn!(user = %user_id, "action failed: {}", e);
            Ok(Json(messages::failure(&e)))
        }
    }
}

async fn dispatch(
    app_state: &AppState,
    user_id: &UserId,
    request: ActionRequest,
) -> Result<crate::domain::models::ActionOutcome, AttendanceError> {
    let service = app_state.attendance_factory.create_service(user_id).await?;
    service.dispatch(request).await
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{header::CONTENT_TYPE, Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use time::macros::datetime;
    use tower::ServiceExt;

    use super::*;
    use crate::{
        domain::models::{Timesheet, UserProfile},
        routes::slack::{router, test_support::fixture},
    };

    fn app(state: AppState) -> Router {
        Router::new().nest("/slack", router()).with_state(state)
    }

    fn encode(payload: &Value) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .append_pair("payload", &payload.to_string())
            .finish()
    }

    fn payload(token: &str, name: &str, selected: Option<&str>) -> Value {
        let mut action = json!({ "name": name, "type": "button", "value": name });
        if let Some(value) = selected {
            action["type"] = json!("select");
            action["selected_options"] = json!([{ "value": value }]);
        }
        json!({
            "token": token,
            "callback_id": "attendance_button",
            "team": { "id": "T1" },
            "user": { "id": "U1" },
            "response_url": "https://hooks.slack.com/actions/T1/1/abc",
            "actions": [action],
        })
    }

    async fn send(app: Router, body: String) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::post("/slack/action")
                    .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    fn logged_in(fixture: &crate::routes::slack::test_support::Fixture) {
        fixture.users.insert(
            UserId::new("U1"),
            UserProfile::default().with_timesheet_token("00D!token"),
        );
    }

    #[tokio::test]
    async fn bad_token_is_unauthorized() {
        let fixture = fixture(Timesheet::default());
        let (status, _) = send(
            app(fixture.state),
            encode(&payload("wrong", "attend", Some("09:00"))),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn malformed_payload_is_a_bad_request() {
        let fixture = fixture(Timesheet::default());
        let (status, _) = send(app(fixture.state), "payload=not-json".to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn attend_with_selected_time_replaces_prompt() {
        let fixture = fixture(Timesheet::default());
        logged_in(&fixture);

        let (status, json) = send(
            app(fixture.state),
            encode(&payload("verify", "attend", Some("09:30"))),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["response_type"], "in_channel");
        assert_eq!(json["replace_original"], true);
        let text = json["text"].as_str().unwrap();
        assert!(text.ends_with("09:30】出勤しました :office:"));

        let pushed = fixture.client.pushed();
        assert_eq!(pushed.len(), 1);
        assert_eq!(pushed[0].entries()[0].from.unwrap().to_string(), "9:30");
    }

    #[tokio::test]
    async fn leave_synthesizes_rest() {
        let mut sheet = Timesheet::default();
        sheet.attend(datetime!(2024-04-01 09:00 +9));
        let fixture = fixture(sheet);
        logged_in(&fixture);

        send(
            app(fixture.state),
            encode(&payload("verify", "leave", Some("18:00"))),
        )
        .await;

        let pushed = &fixture.client.pushed()[0];
        assert!(pushed.has_rested());
        assert!(pushed.is_leaving());
    }

    #[tokio::test]
    async fn failed_push_is_ephemeral_notice() {
        let fixture = fixture(Timesheet::default());
        logged_in(&fixture);
        fixture.client.fail_pushes();

        let (_, json) = send(
            app(fixture.state),
            encode(&payload("verify", "rest", Some("12:00"))),
        )
        .await;

        assert_eq!(json["response_type"], "ephemeral");
        assert_eq!(json["text"], "勤務表の更新に失敗しました :warning:");
        assert!(json.get("replace_original").is_none());
    }

    #[tokio::test]
    async fn logged_out_user_gets_login_prompt() {
        let fixture = fixture(Timesheet::default());

        let (_, json) = send(
            app(fixture.state),
            encode(&payload("verify", "reset", None)),
        )
        .await;

        assert_eq!(json["attachments"][0]["actions"][0]["name"], "authenticate");
        assert!(fixture.client.pushed().is_empty());
    }

    #[tokio::test]
    async fn unknown_action_is_rejected_without_remote_calls() {
        let fixture = fixture(Timesheet::default());
        logged_in(&fixture);

        let (_, json) = send(
            app(fixture.state),
            encode(&payload("verify", "authenticate", None)),
        )
        .await;

        assert_eq!(json["response_type"], "ephemeral");
        assert_eq!(fixture.client.fetch_count(), 0);
    }

    #[tokio::test]
    async fn select_channel_stores_channel() {
        let fixture = fixture(Timesheet::default());
        logged_in(&fixture);

        let (_, json) = send(
            app(fixture.state),
            encode(&payload("verify", "select-channel", Some("C42"))),
        )
        .await;

        assert!(json["text"].as_str().unwrap().contains("<#C42>"));
        assert_eq!(
            fixture
                .users
                .profile(&UserId::new("U1"))
                .notify_channel
                .as_deref(),
            Some("C42")
        );
        assert_eq!(fixture.client.fetch_count(), 0);
    }
}
