use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::trace::{DefaultMakeSpan, TraceLayer};

use crate::{
    adapters::outbound::{
        memory::{MemoryStateStore, MemoryUserStore},
        slack::SlackWebClient,
    },
    app_state::AppState,
    auth::{self, OAuthClients},
    config::Settings,
    domain::{ports::outbound::UserStore, services::DispatchSettings},
    factory::TeamSpiritServiceFactory,
    routes,
};

pub fn create(config: Settings) -> anyhow::Result<Router<()>> {
    let business_offset = config.application.business_offset()?;
    let oauth = OAuthClients::new(&config)?;

    let users: Arc<dyn UserStore> = Arc::new(MemoryUserStore::new());
    let slack = SlackWebClient::new();
    let factory = TeamSpiritServiceFactory::new(
        config.teamspirit.host.clone(),
        users.clone(),
        Arc::new(slack.clone()),
        DispatchSettings {
            offset: business_offset,
            use_attendance_endpoint: config.teamspirit.use_attendance_endpoint,
            bulk_month_enabled: config.teamspirit.bulk_month_enabled,
        },
    );

    let app_state = AppState {
        attendance_factory: Arc::new(factory),
        states: Arc::new(MemoryStateStore::new(config.state.ttl())),
        users,
        oauth: Arc::new(oauth),
        slack,
        verification_token: config.slack.verification_token.clone(),
        teamspirit_host: config.teamspirit.host.clone(),
        bulk_month_enabled: config.teamspirit.bulk_month_enabled,
        business_offset,
    };

    Ok(app(app_state))
}

fn app(app_state: AppState) -> Router<()> {
    Router::new()
        .route("/", get(|| async { "kintai is running" }))
        .nest("/slack", routes::slack::router())
        .merge(auth::router())
        .with_state(app_state)
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use super::*;
    use crate::{
        domain::models::Timesheet,
        routes::slack::test_support::{fixture, settings},
    };

    #[tokio::test]
    async fn health_check() {
        let response = app(fixture(Timesheet::default()).state)
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"kintai is running");
    }

    #[tokio::test]
    async fn oauth_callback_with_unknown_state_is_rejected() {
        let response = app(fixture(Timesheet::default()).state)
            .oneshot(
                Request::get("/oauth/salesforce/callback?code=abc&state=forged")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn oauth_callback_state_is_single_use() {
        let fixture = fixture(Timesheet::default());
        let key = fixture
            .state
            .states
            .store_state(crate::domain::models::AuthState::new(
                "T1",
                "U1",
                "http://127.0.0.1:9/response",
            ))
            .await
            .unwrap();

        // The code exchange fails without a reachable Slack, but the state
        // is consumed on the way in.
        let uri = format!("/oauth/slack/callback?code=abc&state={}", key);
        let first = app(fixture.state.clone())
            .oneshot(Request::get(uri.as_str()).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_ne!(first.status(), StatusCode::OK);

        let second = app(fixture.state)
            .oneshot(Request::get(uri.as_str()).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn create_rejects_bad_offset() {
        let mut config = settings();
        config.application.utc_offset = "JST".into();
        assert!(create(config).is_err());
    }
}
