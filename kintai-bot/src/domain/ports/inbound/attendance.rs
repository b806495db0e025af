use async_trait::async_trait;

use crate::domain::{
    models::{ActionOutcome, ActionRequest, Timesheet},
    AttendanceError, Status,
};

/// Inbound port for attendance interactions.
///
/// The service is created per interaction for a single user, so no user id
/// is passed to its methods.
#[async_trait]
pub trait AttendanceService: Send + Sync + 'static {
    /// Fetch today's timesheet.
    async fn today(&self) -> Result<Timesheet, AttendanceError>;

    /// Fetch today's timesheet and classify it.
    async fn status(&self) -> Result<(Timesheet, Status), AttendanceError>;

    /// Apply an action and push the result to the remote side.
    ///
    /// Orchestrates: resolve time → fetch → mutate → push (full day or
    /// attendance delta) → notify.
    async fn dispatch(&self, request: ActionRequest) -> Result<ActionOutcome, AttendanceError>;
}
