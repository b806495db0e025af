use chrono::NaiveDate;
use reqwest::{header::AUTHORIZATION, header::CONTENT_TYPE, Method, StatusCode};
use thiserror::Error;

use crate::{
    domain::{
        encode_time_table_update, is_ok_body, parse_time_table, AttendancePayload, TimeTable,
    },
    Credentials, TeamSpiritURL,
};

/// Client for the TeamSpirit clock-in endpoint of a single user.
///
/// Created per interaction; it holds the user's bearer token.
pub struct TeamSpiritClient {
    credentials: Credentials,
    endpoint: TeamSpiritURL,
    http: reqwest::Client,
}

impl TeamSpiritClient {
    pub fn new(host: &str, credentials: Credentials) -> Self {
        Self {
            credentials,
            endpoint: TeamSpiritURL::dakoku(host),
            http: reqwest::Client::new(),
        }
    }

    async fn request(
        &self,
        method: Method,
        url: impl AsRef<str>,
        body: Option<Vec<u8>>,
    ) -> Result<Vec<u8>, TeamSpiritError> {
        let mut req = self
            .http
            .request(method, url.as_ref())
            .header(AUTHORIZATION, self.credentials.as_bearer_header());
        if let Some(body) = body {
            req = req.header(CONTENT_TYPE, "application/json").body(body);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| TeamSpiritError::ResponseError(e.to_string()))?;

        if resp.status() == StatusCode::UNAUTHORIZED {
            return Err(TeamSpiritError::Unauthorized);
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| TeamSpiritError::ResponseError(e.to_string()))?;

        Ok(bytes.to_vec())
    }

    pub async fn fetch_time_table(&self) -> Result<TimeTable, TeamSpiritError> {
        let body = self.request(Method::GET, &self.endpoint, None).await?;
        let table = parse_time_table(&body)?;
        tracing::debug!(rows = table.time_table.len(), "fetched time table");

        Ok(table)
    }

    /// Replace today's rows. Returns whether the endpoint answered `"OK"`.
    pub async fn update_time_table(&self, table: &TimeTable) -> Result<bool, TeamSpiritError> {
        self.post_time_table(&self.endpoint, table).await
    }

    /// Replace the rows of the given day.
    pub async fn update_time_table_for_date(
        &self,
        date: NaiveDate,
        table: &TimeTable,
    ) -> Result<bool, TeamSpiritError> {
        let url = self
            .endpoint
            .with_query("date", &date.format("%Y-%m-%d").to_string());
        self.post_time_table(&url, table).await
    }

    async fn post_time_table(
        &self,
        url: &TeamSpiritURL,
        table: &TimeTable,
    ) -> Result<bool, TeamSpiritError> {
        let payload = encode_time_table_update(table)?;
        let body = self.request(Method::POST, url, Some(payload)).await?;
        let ok = is_ok_body(&body);
        if !ok {
            tracing::warn!(
                body = %String::from_utf8_lossy(&body),
                "time table update was not accepted"
            );
        }

        Ok(ok)
    }

    pub async fn set_attendance(
        &self,
        payload: AttendancePayload,
    ) -> Result<bool, TeamSpiritError> {
        let body = serde_json::to_vec(&payload)
            .map_err(|e| TeamSpiritError::Other(format!("Failed to encode attendance: {}", e)))?;
        let body = self.request(Method::PUT, &self.endpoint, Some(body)).await?;

        Ok(is_ok_body(&body))
    }
}

#[derive(Error, Debug)]
pub enum TeamSpiritError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("ServiceError: {message} ({code})")]
    Service { message: String, code: String },
    #[error("DecodeError: {0}")]
    Decode(String),
    #[error("ResponseError: {0}")]
    ResponseError(String),
    #[error("Other: {0}")]
    Other(String),
}
