const DAKOKU_PATH: &str = "/services/apexrest/Dakoku";

#[derive(Debug, Clone)]
pub struct TeamSpiritURL(String);

impl AsRef<str> for TeamSpiritURL {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TeamSpiritURL {
    /// The Apex REST clock-in endpoint of the given org host,
    /// e.g. `example.cloudforce.com`.
    pub fn dakoku(host: &str) -> Self {
        let host = host
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_end_matches('/');
        Self(format!("https://{}", host)).append_path(DAKOKU_PATH)
    }

    /// Append the given path to the URL.
    pub fn append_path(&self, path: &str) -> Self {
        let trimmed_url = self.0.trim_end_matches('/');
        let trimmed_path = path.trim_start_matches('/');
        Self(format!("{}/{}", trimmed_url, trimmed_path))
    }

    pub fn with_query(&self, key: &str, value: &str) -> Self {
        if self.0.contains('?') {
            Self(format!("{}&{}={}", self.0, key, value))
        } else {
            Self(format!("{}?{}={}", self.0, key, value))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dakoku_url_normalizes_host() {
        assert_eq!(
            TeamSpiritURL::dakoku("https://acme.cloudforce.com/").as_ref(),
            "https://acme.cloudforce.com/services/apexrest/Dakoku"
        );
        assert_eq!(
            TeamSpiritURL::dakoku("acme.cloudforce.com").as_ref(),
            "https://acme.cloudforce.com/services/apexrest/Dakoku"
        );
    }

    #[test]
    fn query_parameters_are_chained() {
        let url = TeamSpiritURL::dakoku("acme.cloudforce.com")
            .with_query("date", "2024-04-01")
            .with_query("v", "2");
        assert!(url.as_ref().ends_with("Dakoku?date=2024-04-01&v=2"));
    }
}
