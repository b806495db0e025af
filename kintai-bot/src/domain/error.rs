use thiserror::Error;

/// Errors that can occur while handling an attendance interaction.
#[derive(Debug, Error)]
pub enum AttendanceError {
    #[error("authentication required")]
    AuthRequired,
    #[error("remote service error: {message} ({code})")]
    RemoteService { message: String, code: String },
    #[error("could not decode remote response: {0}")]
    Decode(String),
    #[error("timesheet update failed: {0}")]
    PushFailed(String),
    #[error("unknown action: {0}")]
    UnknownAction(String),
    #[error("invalid selection: {0}")]
    InvalidSelection(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AttendanceError {
    pub fn push_failed(msg: impl Into<String>) -> Self {
        Self::PushFailed(msg.into())
    }

    /// Errors that end in the "please authenticate again" prompt.
    ///
    /// A missing session and a failed fetch look the same at this point.
    pub fn is_auth_prompt(&self) -> bool {
        matches!(
            self,
            Self::AuthRequired | Self::RemoteService { .. } | Self::Decode(_)
        )
    }
}

/// Errors from the key-value collaborators holding handshakes and profiles.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_failures_funnel_into_auth_prompt() {
        assert!(AttendanceError::AuthRequired.is_auth_prompt());
        assert!(AttendanceError::Decode("eof".into()).is_auth_prompt());
        assert!(AttendanceError::RemoteService {
            message: "bad token".into(),
            code: "401".into(),
        }
        .is_auth_prompt());

        assert!(!AttendanceError::push_failed("not OK").is_auth_prompt());
        assert!(!AttendanceError::InvalidSelection("25:00".into()).is_auth_prompt());
    }
}
