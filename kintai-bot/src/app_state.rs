use std::sync::Arc;

use time::{OffsetDateTime, UtcOffset};

use crate::{
    adapters::{inbound::http::AttendanceServiceFactory, outbound::slack::SlackWebClient},
    auth::OAuthClients,
    domain::ports::outbound::{StateStore, UserStore},
};

#[derive(Clone)]
pub struct AppState {
    pub attendance_factory: Arc<dyn AttendanceServiceFactory>,
    pub states: Arc<dyn StateStore>,
    pub users: Arc<dyn UserStore>,
    pub oauth: Arc<OAuthClients>,
    pub slack: SlackWebClient,
    /// Shared secret Slack sends with every command and callback.
    pub verification_token: String,
    /// Linked from the "already left" notice.
    pub teamspirit_host: String,
    /// Whether `bulk-month` is offered at all.
    pub bulk_month_enabled: bool,
    pub business_offset: UtcOffset,
}

impl AppState {
    /// Current time on the business offset.
    pub fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc().to_offset(self.business_offset)
    }
}
