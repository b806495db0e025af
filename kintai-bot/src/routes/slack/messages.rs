//! Prompt and reply builders.

use time::{
    macros::{format_description, time},
    Date, Time,
};

use crate::{
    adapters::inbound::http::{ActionOption, ActionStyle, Attachment, AttachmentAction, SlackMessage},
    domain::{
        models::{Action, MinutesOfDay, Timesheet, TimesheetEntry},
        AttendanceError, Status,
    },
};

const CALLBACK_ATTENDANCE: &str = "attendance_button";
const CALLBACK_CHANNEL_SELECT: &str = "slack_channel_select_button";
const CALLBACK_SLACK_AUTH: &str = "slack_authentication_button";

const MENU_STEP_MINUTES: u16 = 30;

fn time_menu(action: Action, text: &str, first: Time, last: Time) -> AttachmentAction {
    AttachmentAction::select(
        &action.to_string(),
        text,
        ActionOption::times(first.into(), last.into(), MENU_STEP_MINUTES),
    )
}

fn reset_button() -> AttachmentAction {
    AttachmentAction::button(&Action::Reset.to_string(), "リセットする")
        .with_style(ActionStyle::Danger)
        .with_confirm("本当に本日の勤怠をリセットしますか？")
}

fn attendance_attachment() -> Attachment {
    Attachment::new(CALLBACK_ATTENDANCE)
}

pub fn login_prompt(authorize_url: &str) -> SlackMessage {
    SlackMessage::default().with_attachment(
        attendance_attachment()
            .with_text("TeamSpirit で認証を行って、再度 `/ts` コマンドを実行してください :bow:")
            .with_action(
                AttachmentAction::button("authenticate", "認証する")
                    .with_style(ActionStyle::Primary)
                    .with_url(authorize_url),
            ),
    )
}

pub fn slack_auth_prompt(authorize_url: &str) -> SlackMessage {
    SlackMessage::default().with_attachment(
        Attachment::new(CALLBACK_SLACK_AUTH)
            .with_text("Slack で認証を行って、再度 `/ts channel` コマンドを実行してください :bow:")
            .with_action(
                AttachmentAction::button("slack-authenticate", "認証する")
                    .with_style(ActionStyle::Primary)
                    .with_url(authorize_url),
            ),
    )
}

pub fn channel_select_prompt() -> SlackMessage {
    SlackMessage::default().with_attachment(
        Attachment::new(CALLBACK_CHANNEL_SELECT)
            .with_text("打刻時に通知するチャネルを選択して下さい")
            .with_action(AttachmentAction::dynamic_select(
                &Action::SelectChannel.to_string(),
                "チャネルを選択",
                "channels",
            ))
            .with_action(
                AttachmentAction::button(&Action::UnselectChannel.to_string(), "通知を止める")
                    .with_style(ActionStyle::Danger),
            ),
    )
}

pub fn ontime_confirm() -> SlackMessage {
    SlackMessage::text("定時勤務（9:00 ~ 18:00, 休憩12:00 ~ 13:00）として勤怠を打刻します。")
        .with_attachment(
            attendance_attachment().with_action(
                AttachmentAction::button(&Action::OnTime.to_string(), "定時打刻する")
                    .with_style(ActionStyle::Primary)
                    .with_confirm("本当に定時打刻しますか？"),
            ),
        )
}

pub fn bulk_month_confirm() -> SlackMessage {
    SlackMessage::text(
        "今月の勤怠を定時勤務（9:00 ~ 18:00, 休憩12:00 ~ 13:00）として一括入力します。",
    )
    .with_attachment(
        attendance_attachment().with_action(
            AttachmentAction::button(&Action::BulkMonth.to_string(), "一括入力する")
                .with_style(ActionStyle::Primary)
                .with_confirm("本当に一括入力しますか？"),
        ),
    )
}

/// The next prompt for a classified day.
pub fn status_prompt(status: Status, teamspirit_host: &str) -> SlackMessage {
    match status {
        Status::Holiday => SlackMessage::text("本日は休日です :sunny:"),
        Status::Leaving => SlackMessage::text(format!(
            "既に退勤済です。打刻修正は <https://{}|TeamSpirit> で行なってください。",
            teamspirit_host
        ))
        .with_attachment(attendance_attachment().with_action(reset_button())),
        Status::Resting => SlackMessage::default().with_attachment(
            attendance_attachment()
                .with_action(
                    time_menu(Action::Unrest, "休憩を終了する", time!(12:00), time!(16:00))
                        .with_style(ActionStyle::Default)
                        .with_confirm("選択した時刻で休憩を終了しますか？"),
                )
                .with_action(reset_button()),
        ),
        Status::Attending => SlackMessage::default().with_attachment(
            attendance_attachment()
                .with_action(
                    time_menu(Action::Rest, "休憩を開始する", time!(11:00), time!(15:00))
                        .with_style(ActionStyle::Default)
                        .with_confirm("選択した時刻で休憩を開始しますか？"),
                )
                .with_action(
                    time_menu(Action::Leave, "退勤する", time!(16:00), time!(21:00))
                        .with_style(ActionStyle::Danger)
                        .with_confirm("選択した時刻で退勤しますか？"),
                )
                .with_action(reset_button()),
        ),
        Status::NotStarted => SlackMessage::default().with_attachment(
            attendance_attachment().with_action(
                time_menu(Action::Attend, "出勤する", time!(8:30), time!(11:00))
                    .with_style(ActionStyle::Primary)
                    .with_confirm("選択した時刻で出勤しますか？"),
            ),
        ),
    }
}

fn report_line(lines: &mut Vec<String>, label: &str, value: Option<MinutesOfDay>) {
    let value = value.map_or_else(|| "未入力".to_string(), |m| m.to_string());
    lines.push(format!("{}: {}", label, value));
}

fn report_entry(lines: &mut Vec<String>, entry: &TimesheetEntry) {
    if entry.is_attendance() {
        report_line(lines, "出勤時間", entry.from);
        report_line(lines, "退勤時間", entry.to);
    } else if entry.is_rest() {
        report_line(lines, "休憩開始", entry.from);
        report_line(lines, "休憩終了", entry.to);
    }
}

/// One line per bound of every attendance and rest row.
pub fn today_report(sheet: &Timesheet, today: Date) -> SlackMessage {
    let date = today
        .format(format_description!("[year]/[month]/[day]"))
        .unwrap_or_default();

    let mut lines = vec![format!("【{}】", date)];
    for entry in sheet.entries() {
        report_entry(&mut lines, entry);
    }

    SlackMessage::text(lines.join("\n"))
}

/// Reply for an action that did not go through. Errors that need a new
/// login are handled before this.
pub fn failure(error: &AttendanceError) -> SlackMessage {
    let text = match error {
        AttendanceError::InvalidSelection(_) | AttendanceError::UnknownAction(_) => {
            "選択内容を受け付けられませんでした :warning:"
        }
        _ => "勤務表の更新に失敗しました :warning:",
    };
    SlackMessage::ephemeral(text)
}

#[cfg(test)]
mod tests {
    use time::macros::{date, datetime};

    use super::*;
    use crate::adapters::inbound::http::ActionType;

    fn actions(message: &SlackMessage) -> Vec<&AttachmentAction> {
        message
            .attachments
            .iter()
            .flat_map(|a| a.actions.iter())
            .collect()
    }

    fn values(action: &AttachmentAction) -> Vec<&str> {
        action.options.iter().map(|o| o.value.as_str()).collect()
    }

    #[test]
    fn not_started_offers_attend_menu() {
        let message = status_prompt(Status::NotStarted, "acme.cloudforce.com");
        let actions = actions(&message);

        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].name, "attend");
        assert_eq!(actions[0].action_type, ActionType::Select);
        assert_eq!(
            values(actions[0]),
            ["08:30", "09:00", "09:30", "10:00", "10:30", "11:00"]
        );
    }

    #[test]
    fn attending_offers_rest_leave_and_reset() {
        let message = status_prompt(Status::Attending, "acme.cloudforce.com");
        let actions = actions(&message);

        let names: Vec<_> = actions.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["rest", "leave", "reset"]);
        assert_eq!(values(actions[0]).first(), Some(&"11:00"));
        assert_eq!(values(actions[0]).last(), Some(&"15:00"));
        assert_eq!(values(actions[1]).len(), 11);
        assert_eq!(values(actions[1]).last(), Some(&"21:00"));
    }

    #[test]
    fn resting_offers_unrest_until_four() {
        let message = status_prompt(Status::Resting, "acme.cloudforce.com");
        let actions = actions(&message);

        assert_eq!(actions[0].name, "unrest");
        assert_eq!(values(actions[0]).len(), 9);
        assert_eq!(actions[1].name, "reset");
    }

    #[test]
    fn leaving_links_teamspirit_and_offers_reset() {
        let message = status_prompt(Status::Leaving, "acme.cloudforce.com");
        assert!(message.text.contains("<https://acme.cloudforce.com|TeamSpirit>"));
        assert_eq!(actions(&message)[0].name, "reset");
    }

    #[test]
    fn holiday_has_no_buttons() {
        let message = status_prompt(Status::Holiday, "acme.cloudforce.com");
        assert!(message.attachments.is_empty());
        assert_eq!(message.text, "本日は休日です :sunny:");
    }

    #[test]
    fn login_prompt_links_to_authorize_url() {
        let message = login_prompt("https://login.salesforce.com/authorize?state=abc");
        let button = actions(&message)[0];
        assert_eq!(
            button.url.as_deref(),
            Some("https://login.salesforce.com/authorize?state=abc")
        );
    }

    #[test]
    fn channel_prompt_uses_unselect_channel() {
        let message = channel_select_prompt();
        let names: Vec<_> = actions(&message).iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["select-channel", "unselect-channel"]);
        assert_eq!(actions(&message)[0].data_source.as_deref(), Some("channels"));
    }

    #[test]
    fn today_report_lists_every_bound() {
        let mut sheet = Timesheet::default();
        sheet.attend(datetime!(2024-04-01 09:05 +9));
        sheet.rest(datetime!(2024-04-01 12:00 +9));

        let message = today_report(&sheet, date!(2024 - 04 - 01));
        assert_eq!(
            message.text,
            "【2024/04/01】\n出勤時間: 9:05\n退勤時間: 未入力\n休憩開始: 12:00\n休憩終了: 未入力"
        );
    }

    #[test]
    fn failures_are_ephemeral() {
        let message = failure(&AttendanceError::push_failed("not OK"));
        assert_eq!(message.text, "勤務表の更新に失敗しました :warning:");
        assert!(!message.replace_original);
    }
}
