use async_trait::async_trait;

/// Outbound port for posting stamp notifications to a chat channel.
#[async_trait]
pub trait Notifier: Send + Sync + 'static {
    async fn post_message(&self, token: &str, channel: &str, text: &str) -> Result<(), NotifyError>;
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("rejected: {0}")]
    Rejected(String),
}
