mod clients;
mod router;

pub use clients::{AuthError, OAuthClients, SALESFORCE_CALLBACK_PATH, SLACK_CALLBACK_PATH};
pub use router::router;
