//! Composition root: concrete factories for creating service instances.
//!
//! This is the only place that imports concrete outbound adapters.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    adapters::{inbound::http::AttendanceServiceFactory, outbound::teamspirit::TeamSpiritAdapter},
    domain::{
        models::UserId,
        ports::{
            inbound::AttendanceService,
            outbound::{Notifier, UserStore},
        },
        services::{AttendanceServiceImpl, DispatchSettings},
        AttendanceError,
    },
};

/// Concrete factory that creates TeamSpirit-backed AttendanceService
/// instances from the user's stored Salesforce token.
pub struct TeamSpiritServiceFactory {
    host: String,
    users: Arc<dyn UserStore>,
    notifier: Arc<dyn Notifier>,
    settings: DispatchSettings,
}

impl TeamSpiritServiceFactory {
    pub fn new(
        host: impl Into<String>,
        users: Arc<dyn UserStore>,
        notifier: Arc<dyn Notifier>,
        settings: DispatchSettings,
    ) -> Self {
        Self {
            host: host.into(),
            users,
            notifier,
            settings,
        }
    }
}

#[async_trait]
impl AttendanceServiceFactory for TeamSpiritServiceFactory {
    async fn create_service(
        &self,
        user_id: &UserId,
    ) -> Result<Box<dyn AttendanceService>, AttendanceError> {
        let token = self
            .users
            .get_profile(user_id)
            .await?
            .timesheet_token
            .ok_or(AttendanceError::AuthRequired)?;

        let adapter = TeamSpiritAdapter::new(&self.host, teamspirit::Credentials::new(token));
        let service = AttendanceServiceImpl::new(
            user_id.clone(),
            Arc::new(adapter),
            self.users.clone(),
            self.notifier.clone(),
            self.settings,
        );

        Ok(Box::new(service))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        models::UserProfile,
        services::mock::{MockNotifier, MockUserStore},
    };

    fn factory(users: MockUserStore) -> TeamSpiritServiceFactory {
        TeamSpiritServiceFactory::new(
            "acme.cloudforce.com",
            Arc::new(users),
            Arc::new(MockNotifier::default()),
            DispatchSettings::default(),
        )
    }

    #[tokio::test]
    async fn user_without_token_must_log_in() {
        let result = factory(MockUserStore::default())
            .create_service(&UserId::new("U1"))
            .await;

        assert!(matches!(result, Err(AttendanceError::AuthRequired)));
    }

    #[tokio::test]
    async fn user_with_token_gets_a_service() {
        let users = MockUserStore::default();
        users.insert(
            UserId::new("U1"),
            UserProfile::default().with_timesheet_token("00D!token"),
        );

        assert!(factory(users)
            .create_service(&UserId::new("U1"))
            .await
            .is_ok());
    }
}
