//! HTTP adapter for attendance interactions.
//!
//! Defines the factory trait for creating AttendanceService instances per
//! Slack user. The concrete implementation lives in `crate::factory` (the
//! composition root).

use async_trait::async_trait;

use crate::domain::{models::UserId, ports::inbound::AttendanceService, AttendanceError};

/// Factory trait for creating an AttendanceService bound to one user's
/// TeamSpirit credentials.
#[async_trait]
pub trait AttendanceServiceFactory: Send + Sync + 'static {
    /// Fails with [`AttendanceError::AuthRequired`] when the user has not
    /// logged in to TeamSpirit yet.
    async fn create_service(
        &self,
        user_id: &UserId,
    ) -> Result<Box<dyn AttendanceService>, AttendanceError>;
}
