use async_trait::async_trait;
use moka::sync::Cache;

use crate::domain::{
    models::{UserId, UserProfile},
    ports::outbound::UserStore,
    StoreError,
};

const MAX_USERS: u64 = 100_000;

#[derive(Clone)]
pub struct MemoryUserStore {
    profiles: Cache<UserId, UserProfile>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self {
            profiles: Cache::new(MAX_USERS),
        }
    }
}

impl Default for MemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn get_profile(&self, user_id: &UserId) -> Result<UserProfile, StoreError> {
        Ok(self.profiles.get(user_id).unwrap_or_default())
    }

    async fn save_profile(
        &self,
        user_id: &UserId,
        profile: UserProfile,
    ) -> Result<(), StoreError> {
        self.profiles.insert(user_id.clone(), profile);
        Ok(())
    }
}
