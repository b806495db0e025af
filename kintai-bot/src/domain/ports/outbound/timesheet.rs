use async_trait::async_trait;
use time::Date;

use crate::domain::{
    models::{MinutesOfDay, Timesheet},
    AttendanceError,
};

/// Outbound port for the remote timesheet of one user.
///
/// The client is created per interaction with the user's credentials, so no
/// user id is passed to individual methods.
#[async_trait]
pub trait TimesheetClient: Send + Sync + 'static {
    /// Fetch today's timesheet.
    ///
    /// A structured error from the service surfaces as
    /// [`AttendanceError::RemoteService`], a malformed body as
    /// [`AttendanceError::Decode`].
    async fn fetch(&self) -> Result<Timesheet, AttendanceError>;

    /// Replace today's rows. Anything but an accepted update is
    /// [`AttendanceError::PushFailed`].
    async fn push(&self, sheet: &Timesheet) -> Result<(), AttendanceError>;

    /// Replace the rows of the given day.
    async fn push_for_date(&self, date: Date, sheet: &Timesheet) -> Result<(), AttendanceError>;

    /// Stamp a single clock-in or clock-out without sending the whole day.
    async fn set_attendance(
        &self,
        attendance: bool,
        at: MinutesOfDay,
    ) -> Result<(), AttendanceError>;
}
