use async_trait::async_trait;

use crate::domain::{
    models::{AuthState, StateKey, UserId, UserProfile},
    StoreError,
};

/// Key-value store for login handshakes in flight.
#[async_trait]
pub trait StateStore: Send + Sync + 'static {
    /// Store the handshake under a fresh opaque key.
    async fn store_state(&self, state: AuthState) -> Result<StateKey, StoreError>;

    /// Remove and return the handshake stored under `key`. A key can only be
    /// taken once.
    async fn take_state(&self, key: &StateKey) -> Result<Option<AuthState>, StoreError>;
}

/// Key-value store for per-user tokens and preferences.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// The user's profile, or an empty one for unknown users.
    async fn get_profile(&self, user_id: &UserId) -> Result<UserProfile, StoreError>;

    async fn save_profile(&self, user_id: &UserId, profile: UserProfile)
        -> Result<(), StoreError>;
}
