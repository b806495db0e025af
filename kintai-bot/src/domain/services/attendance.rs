use std::sync::Arc;

use async_trait::async_trait;
use time::{Date, OffsetDateTime, UtcOffset};

use crate::domain::{
    classify,
    models::{
        at, Action, ActionOutcome, ActionRequest, BulkReport, MinutesOfDay, OutcomeDetail,
        PushStrategy, Timesheet, UserId, UserProfile, DEFAULT_REST_END, DEFAULT_REST_START,
    },
    ports::{
        inbound::AttendanceService,
        outbound::{Notifier, TimesheetClient, UserStore},
    },
    AttendanceError, Status,
};

#[derive(Debug, Clone, Copy)]
pub struct DispatchSettings {
    /// Offset of the business day; selected `HH:MM` values are read on it.
    pub offset: UtcOffset,
    /// Send chosen Attend/Leave times through the narrow attendance
    /// endpoint instead of pushing the whole day.
    pub use_attendance_endpoint: bool,
    pub bulk_month_enabled: bool,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            offset: UtcOffset::UTC,
            use_attendance_endpoint: false,
            bulk_month_enabled: false,
        }
    }
}

/// Implementation of the AttendanceService inbound port.
///
/// Created per interaction for a single user. Every action works on a
/// freshly fetched timesheet; nothing is cached between interactions.
pub struct AttendanceServiceImpl<C> {
    user_id: UserId,
    client: Arc<C>,
    users: Arc<dyn UserStore>,
    notifier: Arc<dyn Notifier>,
    settings: DispatchSettings,
}

impl<C: TimesheetClient> AttendanceServiceImpl<C> {
    pub fn new(
        user_id: UserId,
        client: Arc<C>,
        users: Arc<dyn UserStore>,
        notifier: Arc<dyn Notifier>,
        settings: DispatchSettings,
    ) -> Self {
        Self {
            user_id,
            client,
            users,
            notifier,
            settings,
        }
    }

    async fn stamp(
        &self,
        action: Action,
        selected: Option<String>,
        received_at: OffsetDateTime,
    ) -> Result<ActionOutcome, AttendanceError> {
        let chosen = selected
            .as_deref()
            .map(str::parse::<MinutesOfDay>)
            .transpose()
            .map_err(|e| AttendanceError::InvalidSelection(e.to_string()))?;
        let when = match chosen {
            Some(m) => at(received_at.date(), m.to_time(), received_at.offset()),
            None => received_at,
        };

        let mut sheet = self.client.fetch().await?;
        let synthesized_rest = apply_action(&mut sheet, action, when)?;
        let strategy = PushStrategy::choose(
            action,
            chosen,
            synthesized_rest,
            self.settings.use_attendance_endpoint,
        );

        // The local mutation is dropped if the push fails; the next fetch
        // starts from whatever the remote side holds.
        match strategy {
            PushStrategy::FullTimesheet => self.client.push(&sheet).await?,
            PushStrategy::AttendanceDelta { attendance, at } => {
                self.client.set_attendance(attendance, at).await?
            }
        }
        tracing::info!(user = %self.user_id, %action, ?strategy, "stamped");

        Ok(ActionOutcome {
            action,
            at: when,
            chosen: chosen.is_some(),
            detail: OutcomeDetail::Stamped(strategy),
        })
    }

    async fn bulk_month(&self, received_at: OffsetDateTime) -> Result<ActionOutcome, AttendanceError> {
        let mut report = BulkReport::default();

        for day in days_of_month(received_at.date()) {
            let mut sheet = Timesheet::default();
            sheet.apply_canonical_day(day, received_at.offset());
            report.days += 1;

            match self.client.push_for_date(day, &sheet).await {
                Ok(()) => report.pushed += 1,
                Err(e) if e.is_auth_prompt() => return Err(e),
                Err(e) => {
                    tracing::warn!(user = %self.user_id, %day, "bulk push failed: {}", e);
                    report.failed += 1;
                }
            }
        }

        if report.pushed == 0 {
            return Err(AttendanceError::push_failed(format!(
                "none of {} days accepted",
                report.days
            )));
        }
        tracing::info!(user = %self.user_id, ?report, "bulk month applied");

        Ok(ActionOutcome {
            action: Action::BulkMonth,
            at: received_at,
            chosen: false,
            detail: OutcomeDetail::Bulk(report),
        })
    }

    async fn select_channel(
        &self,
        selected: Option<String>,
        received_at: OffsetDateTime,
    ) -> Result<ActionOutcome, AttendanceError> {
        let channel = selected
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| AttendanceError::InvalidSelection("no channel selected".into()))?;

        let profile = self.users.get_profile(&self.user_id).await?;
        self.users
            .save_profile(
                &self.user_id,
                UserProfile {
                    notify_channel: Some(channel.clone()),
                    ..profile
                },
            )
            .await?;

        Ok(ActionOutcome {
            action: Action::SelectChannel,
            at: received_at,
            chosen: false,
            detail: OutcomeDetail::ChannelSelected(channel),
        })
    }

    async fn unselect_channel(
        &self,
        received_at: OffsetDateTime,
    ) -> Result<ActionOutcome, AttendanceError> {
        let profile = self.users.get_profile(&self.user_id).await?;
        self.users
            .save_profile(
                &self.user_id,
                UserProfile {
                    notify_channel: None,
                    ..profile
                },
            )
            .await?;

        Ok(ActionOutcome {
            action: Action::UnselectChannel,
            at: received_at,
            chosen: false,
            detail: OutcomeDetail::ChannelUnselected,
        })
    }

    /// Post the confirmation to the user's notification channel. Never fails
    /// the action.
    async fn notify(&self, outcome: &ActionOutcome) {
        if !outcome.touched_timesheet() {
            return;
        }

        let profile = match self.users.get_profile(&self.user_id).await {
            Ok(profile) => profile,
            Err(e) => {
                tracing::warn!(user = %self.user_id, "could not load profile: {}", e);
                return;
            }
        };

        if let Some((channel, token)) = profile.notification_target() {
            if let Err(e) = self
                .notifier
                .post_message(token, channel, &outcome.confirmation())
                .await
            {
                tracing::warn!(user = %self.user_id, channel, "notification failed: {}", e);
            }
        }
    }
}

#[async_trait]
impl<C: TimesheetClient> AttendanceService for AttendanceServiceImpl<C> {
    async fn today(&self) -> Result<Timesheet, AttendanceError> {
        self.client.fetch().await
    }

    async fn status(&self) -> Result<(Timesheet, Status), AttendanceError> {
        let sheet = self.client.fetch().await?;
        let status = classify(&sheet);
        tracing::debug!(user = %self.user_id, ?status, "classified timesheet");

        Ok((sheet, status))
    }

    async fn dispatch(&self, request: ActionRequest) -> Result<ActionOutcome, AttendanceError> {
        let ActionRequest {
            action,
            selected,
            received_at,
        } = request;
        let received_at = received_at.to_offset(self.settings.offset);

        let outcome = match action {
            Action::SelectChannel => self.select_channel(selected, received_at).await?,
            Action::UnselectChannel => self.unselect_channel(received_at).await?,
            Action::BulkMonth if !self.settings.bulk_month_enabled => {
                return Err(AttendanceError::UnknownAction(action.to_string()));
            }
            Action::BulkMonth => self.bulk_month(received_at).await?,
            _ => self.stamp(action, selected, received_at).await?,
        };

        self.notify(&outcome).await;
        Ok(outcome)
    }
}

/// Apply a single-day action to the sheet. Returns whether a default rest
/// period had to be recorded first.
fn apply_action(
    sheet: &mut Timesheet,
    action: Action,
    when: OffsetDateTime,
) -> Result<bool, AttendanceError> {
    match action {
        Action::Attend => {
            sheet.attend(when);
        }
        Action::Rest => {
            sheet.rest(when);
        }
        Action::Unrest => {
            sheet.unrest(when);
        }
        Action::Leave => {
            // A day is never closed without a break.
            let synthesized = !sheet.has_rested();
            if synthesized {
                sheet.rest(at(when.date(), DEFAULT_REST_START, when.offset()));
                sheet.unrest(at(when.date(), DEFAULT_REST_END, when.offset()));
            }
            sheet.leave(when);
            return Ok(synthesized);
        }
        Action::Reset => {
            sheet.reset(when);
        }
        Action::OnTime => {
            sheet.apply_canonical_day(when.date(), when.offset());
        }
        Action::BulkMonth | Action::SelectChannel | Action::UnselectChannel => {
            return Err(AttendanceError::UnknownAction(action.to_string()));
        }
    }

    Ok(false)
}

/// Every day of the month `date` falls in.
pub fn days_of_month(date: Date) -> impl Iterator<Item = Date> {
    let (year, month) = (date.year(), date.month());
    let last = month.length(year);
    (1..=last).filter_map(move |day| Date::from_calendar_date(year, month, day).ok())
}
