use strum::{Display, EnumString};
use time::{macros::format_description, OffsetDateTime};

use super::MinutesOfDay;

/// Button and menu actions a user can trigger from a prompt.
///
/// The serialized names are the `name` fields of the Slack attachment
/// actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum Action {
    #[strum(serialize = "attend")]
    Attend,
    #[strum(serialize = "rest")]
    Rest,
    #[strum(serialize = "unrest")]
    Unrest,
    #[strum(serialize = "leave")]
    Leave,
    #[strum(serialize = "reset")]
    Reset,
    /// Canonical day for today.
    #[strum(serialize = "ontime")]
    OnTime,
    /// Canonical day for every day of the current month.
    #[strum(serialize = "bulk-month")]
    BulkMonth,
    #[strum(serialize = "select-channel")]
    SelectChannel,
    #[strum(serialize = "unselect-channel")]
    UnselectChannel,
}

impl Action {
    /// Actions whose chosen time can go through the narrow attendance
    /// endpoint.
    pub fn is_attendance_stamp(self) -> bool {
        matches!(self, Action::Attend | Action::Leave)
    }
}

/// One inbound interaction: what was clicked, what was picked, and when the
/// request arrived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRequest {
    pub action: Action,
    /// The selected option value: `HH:MM` for time menus, a channel id for
    /// the channel menu, `None` for plain buttons.
    pub selected: Option<String>,
    /// Request-processing time on the business offset.
    pub received_at: OffsetDateTime,
}

impl ActionRequest {
    pub fn new(action: Action, received_at: OffsetDateTime) -> Self {
        Self {
            action,
            selected: None,
            received_at,
        }
    }

    pub fn with_selected(mut self, selected: impl Into<String>) -> Self {
        self.selected = Some(selected.into());
        self
    }
}

/// How a mutated day reaches the remote side. Exactly one per action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushStrategy {
    /// Send the whole day's rows.
    FullTimesheet,
    /// Stamp a single clock-in (`attendance = true`) or clock-out.
    AttendanceDelta {
        attendance: bool,
        at: MinutesOfDay,
    },
}

impl PushStrategy {
    /// The attendance endpoint only knows a single clock-in or clock-out, so
    /// it is used for a chosen Attend/Leave time that needed no other row.
    pub fn choose(
        action: Action,
        chosen: Option<MinutesOfDay>,
        synthesized_rest: bool,
        use_attendance_endpoint: bool,
    ) -> Self {
        match chosen {
            Some(at)
                if use_attendance_endpoint
                    && action.is_attendance_stamp()
                    && !synthesized_rest =>
            {
                PushStrategy::AttendanceDelta {
                    attendance: action == Action::Attend,
                    at,
                }
            }
            _ => PushStrategy::FullTimesheet,
        }
    }
}

/// Result of the bulk-month batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BulkReport {
    pub days: usize,
    pub pushed: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeDetail {
    Stamped(PushStrategy),
    Bulk(BulkReport),
    ChannelSelected(String),
    ChannelUnselected,
}

/// What a successfully dispatched action did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    pub action: Action,
    /// The time the action was recorded at.
    pub at: OffsetDateTime,
    /// Whether the time came from a menu choice rather than the clock.
    pub chosen: bool,
    pub detail: OutcomeDetail,
}

impl ActionOutcome {
    /// Text shown in place of the prompt and posted to the notification
    /// channel.
    pub fn confirmation(&self) -> String {
        let stamp = self.stamp_label();
        match (&self.detail, self.action) {
            (OutcomeDetail::ChannelSelected(channel), _) => {
                format!("打刻時に <#{}> へ通知します :loudspeaker:", channel)
            }
            (OutcomeDetail::ChannelUnselected, _) => "打刻時の通知を停止しました".to_string(),
            (OutcomeDetail::Bulk(report), _) => format!(
                "今月の勤怠を定時で一括入力しました（{}日中 {}日成功、{}日失敗） :high_brightness:",
                report.days, report.pushed, report.failed
            ),
            (_, Action::Attend) => format!("【{}】出勤しました :office:", stamp),
            (_, Action::Rest) => format!("【{}】休憩を開始しました :coffee:", stamp),
            (_, Action::Unrest) => format!("【{}】休憩を終了しました :computer:", stamp),
            (_, Action::Leave) => format!("【{}】退勤しました :house:", stamp),
            (_, Action::Reset) => {
                format!("【{}】の勤怠情報をリセットしました :u7a7a:", stamp)
            }
            (_, Action::OnTime) => format!("【{}】定時で勤怠入力しました :high_brightness:", stamp),
            (_, Action::BulkMonth | Action::SelectChannel | Action::UnselectChannel) => {
                format!("【{}】{}", stamp, self.action)
            }
        }
    }

    /// Whether this outcome recorded something on the timesheet.
    pub fn touched_timesheet(&self) -> bool {
        matches!(
            self.detail,
            OutcomeDetail::Stamped(_) | OutcomeDetail::Bulk(_)
        )
    }

    fn stamp_label(&self) -> String {
        let formatted = if self.chosen {
            self.at
                .format(format_description!("[year]/[month]/[day] [hour]:[minute]"))
        } else {
            self.at.format(format_description!("[year]/[month]/[day]"))
        };
        formatted.unwrap_or_default()
    }
}
