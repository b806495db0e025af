mod conversions;

use async_trait::async_trait;
use time::Date;

use crate::domain::{
    models::{MinutesOfDay, Timesheet},
    ports::outbound::TimesheetClient,
    AttendanceError,
};

use self::conversions::{to_domain_timesheet, to_naive_date, to_teamspirit_table};

/// Adapter that wraps the TeamSpirit client to implement the TimesheetClient port.
pub struct TeamSpiritAdapter {
    client: teamspirit::TeamSpiritClient,
}

impl TeamSpiritAdapter {
    pub fn new(host: &str, credentials: teamspirit::Credentials) -> Self {
        Self {
            client: teamspirit::TeamSpiritClient::new(host, credentials),
        }
    }
}

#[async_trait]
impl TimesheetClient for TeamSpiritAdapter {
    async fn fetch(&self) -> Result<Timesheet, AttendanceError> {
        let table = self
            .client
            .fetch_time_table()
            .await
            .map_err(map_teamspirit_error)?;
        to_domain_timesheet(table)
    }

    async fn push(&self, sheet: &Timesheet) -> Result<(), AttendanceError> {
        let accepted = self
            .client
            .update_time_table(&to_teamspirit_table(sheet))
            .await
            .map_err(map_push_error)?;
        accepted_or_failed(accepted)
    }

    async fn push_for_date(&self, date: Date, sheet: &Timesheet) -> Result<(), AttendanceError> {
        let accepted = self
            .client
            .update_time_table_for_date(to_naive_date(date)?, &to_teamspirit_table(sheet))
            .await
            .map_err(map_push_error)?;
        accepted_or_failed(accepted)
    }

    async fn set_attendance(
        &self,
        attendance: bool,
        at: MinutesOfDay,
    ) -> Result<(), AttendanceError> {
        let payload = teamspirit::AttendancePayload::new(attendance, at.hour(), at.minute());
        let accepted = self
            .client
            .set_attendance(payload)
            .await
            .map_err(map_push_error)?;
        accepted_or_failed(accepted)
    }
}

fn accepted_or_failed(accepted: bool) -> Result<(), AttendanceError> {
    if accepted {
        Ok(())
    } else {
        Err(AttendanceError::push_failed("update was not accepted"))
    }
}

fn map_teamspirit_error(e: teamspirit::TeamSpiritError) -> AttendanceError {
    match e {
        teamspirit::TeamSpiritError::Unauthorized => AttendanceError::AuthRequired,
        teamspirit::TeamSpiritError::Service { message, code } => {
            AttendanceError::RemoteService { message, code }
        }
        teamspirit::TeamSpiritError::Decode(msg) => AttendanceError::Decode(msg),
        teamspirit::TeamSpiritError::ResponseError(msg) => AttendanceError::Decode(msg),
        teamspirit::TeamSpiritError::Other(msg) => AttendanceError::Decode(msg),
    }
}

/// A rejected token still asks for a new login; anything else on the way
/// out is a failed push.
fn map_push_error(e: teamspirit::TeamSpiritError) -> AttendanceError {
    match e {
        teamspirit::TeamSpiritError::Unauthorized => AttendanceError::AuthRequired,
        other => AttendanceError::push_failed(other.to_string()),
    }
}
