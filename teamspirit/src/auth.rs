use std::fmt;

/// OAuth access token granted by Salesforce for the TeamSpirit org.
#[derive(Clone)]
pub struct Credentials {
    access_token: String,
}

impl Credentials {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
        }
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn as_bearer_header(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_token", &"<redacted>")
            .finish()
    }
}
