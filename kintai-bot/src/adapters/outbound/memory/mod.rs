//! In-process stores backed by moka caches.
//!
//! Contents are lost on restart; users then simply log in again.

mod state_store;
mod user_store;

pub use state_store::MemoryStateStore;
pub use user_store::MemoryUserStore;
