use std::time::Duration;

use async_trait::async_trait;
use moka::sync::Cache;
use oauth2::CsrfToken;

use crate::domain::{
    models::{AuthState, StateKey},
    ports::outbound::StateStore,
    StoreError,
};

const MAX_PENDING_HANDSHAKES: u64 = 10_000;

/// Login handshakes keyed by a random CSRF token. Entries expire after the
/// configured TTL whether or not they were taken.
///
/// A full store refuses new handshakes instead of evicting pending ones.
#[derive(Clone)]
pub struct MemoryStateStore {
    states: Cache<String, AuthState>,
    capacity: u64,
}

impl MemoryStateStore {
    pub fn new(ttl: Duration) -> Self {
        Self::with_capacity(ttl, MAX_PENDING_HANDSHAKES)
    }

    pub fn with_capacity(ttl: Duration, capacity: u64) -> Self {
        Self {
            states: Cache::builder().time_to_live(ttl).build(),
            capacity,
        }
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn store_state(&self, state: AuthState) -> Result<StateKey, StoreError> {
        // The entry count only settles once pending maintenance has run.
        self.states.run_pending_tasks();
        if self.states.entry_count() >= self.capacity {
            tracing::warn!(capacity = self.capacity, "refusing login handshake");
            return Err(StoreError::Unavailable(format!(
                "{} logins already pending",
                self.capacity
            )));
        }

        let key = CsrfToken::new_random().secret().clone();
        self.states.insert(key.clone(), state);

        Ok(StateKey::new(key))
    }

    async fn take_state(&self, key: &StateKey) -> Result<Option<AuthState>, StoreError> {
        Ok(self.states.remove(key.as_str()))
    }
}
