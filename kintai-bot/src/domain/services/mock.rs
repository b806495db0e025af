//! In-memory implementations of the outbound ports for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use time::Date;

use crate::domain::{
    models::{MinutesOfDay, Timesheet, UserId, UserProfile},
    ports::outbound::{Notifier, NotifyError, TimesheetClient, UserStore},
    AttendanceError, StoreError,
};

/// Mock timesheet client holding the "remote" copy of today's sheet and
/// recording every push.
#[derive(Clone, Default)]
pub struct MockTimesheetClient {
    remote: Arc<RwLock<Timesheet>>,
    pushed: Arc<RwLock<Vec<Timesheet>>>,
    dated: Arc<RwLock<Vec<(Date, Timesheet)>>>,
    deltas: Arc<RwLock<Vec<(bool, MinutesOfDay)>>>,
    fetches: Arc<RwLock<usize>>,
    fetch_error: Arc<RwLock<Option<AttendanceError>>>,
    fail_pushes: Arc<RwLock<bool>>,
}

#[allow(dead_code)]
impl MockTimesheetClient {
    pub fn with_sheet(sheet: Timesheet) -> Self {
        let client = Self::default();
        *client.remote.write().unwrap() = sheet;
        client
    }

    /// Make the next fetch fail with the given error.
    pub fn fail_fetch(&self, error: AttendanceError) {
        *self.fetch_error.write().unwrap() = Some(error);
    }

    /// Make every push answer with something other than `"OK"`.
    pub fn fail_pushes(&self) {
        *self.fail_pushes.write().unwrap() = true;
    }

    pub fn current(&self) -> Timesheet {
        self.remote.read().unwrap().clone()
    }

    pub fn pushed(&self) -> Vec<Timesheet> {
        self.pushed.read().unwrap().clone()
    }

    pub fn dated(&self) -> Vec<(Date, Timesheet)> {
        self.dated.read().unwrap().clone()
    }

    pub fn deltas(&self) -> Vec<(bool, MinutesOfDay)> {
        self.deltas.read().unwrap().clone()
    }

    pub fn fetch_count(&self) -> usize {
        *self.fetches.read().unwrap()
    }

    fn check_push(&self) -> Result<(), AttendanceError> {
        if *self.fail_pushes.read().unwrap() {
            Err(AttendanceError::push_failed("body was not \"OK\""))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl TimesheetClient for MockTimesheetClient {
    async fn fetch(&self) -> Result<Timesheet, AttendanceError> {
        *self.fetches.write().unwrap() += 1;
        if let Some(error) = self.fetch_error.write().unwrap().take() {
            return Err(error);
        }
        Ok(self.current())
    }

    async fn push(&self, sheet: &Timesheet) -> Result<(), AttendanceError> {
        self.check_push()?;
        self.pushed.write().unwrap().push(sheet.clone());
        *self.remote.write().unwrap() = sheet.clone();
        Ok(())
    }

    async fn push_for_date(&self, date: Date, sheet: &Timesheet) -> Result<(), AttendanceError> {
        self.check_push()?;
        self.dated.write().unwrap().push((date, sheet.clone()));
        Ok(())
    }

    async fn set_attendance(
        &self,
        attendance: bool,
        at: MinutesOfDay,
    ) -> Result<(), AttendanceError> {
        self.check_push()?;
        self.deltas.write().unwrap().push((attendance, at));
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct MockUserStore {
    profiles: Arc<RwLock<HashMap<UserId, UserProfile>>>,
}

impl MockUserStore {
    pub fn insert(&self, user_id: UserId, profile: UserProfile) {
        self.profiles.write().unwrap().insert(user_id, profile);
    }

    pub fn profile(&self, user_id: &UserId) -> UserProfile {
        self.profiles
            .read()
            .unwrap()
            .get(user_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl UserStore for MockUserStore {
    async fn get_profile(&self, user_id: &UserId) -> Result<UserProfile, StoreError> {
        Ok(self.profile(user_id))
    }

    async fn save_profile(
        &self,
        user_id: &UserId,
        profile: UserProfile,
    ) -> Result<(), StoreError> {
        self.insert(user_id.clone(), profile);
        Ok(())
    }
}

/// Records `(token, channel, text)` for every posted message.
#[derive(Clone, Default)]
pub struct MockNotifier {
    messages: Arc<RwLock<Vec<(String, String, String)>>>,
}

impl MockNotifier {
    pub fn messages(&self) -> Vec<(String, String, String)> {
        self.messages.read().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn post_message(&self, token: &str, channel: &str, text: &str) -> Result<(), NotifyError> {
        self.messages
            .write()
            .unwrap()
            .push((token.to_string(), channel.to_string(), text.to_string()));
        Ok(())
    }
}
