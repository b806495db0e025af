use axum::{extract::State, Form, Json};
use strum::EnumString;
use tracing::instrument;

use crate::{
    app_state::AppState,
    domain::models::{AuthState, UserId},
    routes::ApiError,
};

use super::{login_prompt, messages, payload::SlashCommand, slack_auth_prompt, verify_token};
use crate::adapters::inbound::http::SlackMessage;

/// Argument of the slash command. Anything unknown asks for the status
/// prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
enum Command {
    #[strum(serialize = "login")]
    Login,
    #[strum(serialize = "channel")]
    Channel,
    #[strum(serialize = "today")]
    Today,
    #[strum(serialize = "ontime")]
    OnTime,
    #[strum(serialize = "bulk-month")]
    BulkMonth,
    #[strum(disabled)]
    Status,
}

impl Command {
    fn parse(text: &str) -> Self {
        text.trim().parse().unwrap_or(Command::Status)
    }
}

#[instrument(name = "slash_command", skip(app_state, command), fields(user = %command.user_id, text = %command.text))]
pub async fn handle_command(
    State(app_state): State<AppState>,
    Form(command): Form<SlashCommand>,
) -> Result<Json<SlackMessage>, ApiError> {
    verify_token(&app_state, &command.token)?;

    let user_id = UserId::new(command.user_id);
    let state = AuthState::new(command.team_id, user_id.clone(), command.response_url);
    let kind = Command::parse(&command.text);

    if kind == Command::Login {
        return login_prompt(&app_state, state).await.map(Json);
    }

    // Everything else needs a working TeamSpirit session first.
    let service = match app_state.attendance_factory.create_service(&user_id).await {
        Ok(service) => service,
        Err(e) if e.is_auth_prompt() => return login_prompt(&app_state, state).await.map(Json),
        Err(e) => {
            tracing::error!("failed to create attendance service: {}", e);
            return Err(ApiError::internal(e.to_string()));
        }
    };

    if kind == Command::Today {
        return match service.today().await {
            Ok(sheet) => Ok(Json(messages::today_report(&sheet, app_state.now().date()))),
            Err(e) => {
                tracing::warn!("could not fetch timesheet: {}", e);
                login_prompt(&app_state, state).await.map(Json)
            }
        };
    }

    let status = match service.status().await {
        Ok((_, status)) => status,
        Err(e) => {
            tracing::warn!("could not fetch timesheet: {}", e);
            return login_prompt(&app_state, state).await.map(Json);
        }
    };

    let message = match kind {
        Command::Channel => {
            let profile = app_state.users.get_profile(&user_id).await?;
            if profile.slack_token.is_none() {
                slack_auth_prompt(&app_state, state).await?
            } else {
                messages::channel_select_prompt()
            }
        }
        Command::OnTime => messages::ontime_confirm(),
        Command::BulkMonth if app_state.bulk_month_enabled => messages::bulk_month_confirm(),
        Command::Login | Command::Today | Command::BulkMonth | Command::Status => {
            messages::status_prompt(status, &app_state.teamspirit_host)
        }
    };

    Ok(Json(message))
}
