use serde::{Deserialize, Serialize};

use crate::TeamSpiritError;

/// Type code of the attendance row in a [`TimeTable`].
pub const TYPE_ATTENDANCE: i64 = 1;
/// Type code used for rest rows the bot creates.
pub const TYPE_REST: i64 = 21;
/// Second rest code reported by the Dakoku endpoint.
pub const TYPE_REST_ALT: i64 = 22;

/// Today's timesheet as returned by `GET /services/apexrest/Dakoku`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeTable {
    #[serde(default)]
    pub time_table: Vec<TimeTableItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_holiday: Option<bool>,
    #[serde(default)]
    pub work_location: Vec<WorkLocationItem>,
}

/// One attendance or rest row. `from` and `to` are minutes since midnight.
///
/// Unset bounds serialize as `null` so that clearing a row is sent to the
/// remote side explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeTableItem {
    pub datetime: i64,
    #[serde(default)]
    pub from: Option<i64>,
    #[serde(default)]
    pub to: Option<i64>,
    #[serde(rename = "type")]
    pub item_type: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkLocationItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Body sent with `POST`. The endpoint rejects `isHoliday` and
/// `workLocation`, so only the rows are carried.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeTableUpdate<'a> {
    pub time_table: &'a [TimeTableItem],
}

impl<'a> From<&'a TimeTable> for TimeTableUpdate<'a> {
    fn from(table: &'a TimeTable) -> Self {
        Self {
            time_table: &table.time_table,
        }
    }
}

/// Error element of the array Salesforce returns instead of a timesheet.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceErrorPayload {
    #[serde(default)]
    pub message: String,
    #[serde(default, rename = "errorCode")]
    pub error_code: String,
}

/// Decode a fetch response body.
///
/// A Salesforce error array with a non-empty `errorCode` on its first
/// element is reported as [`TeamSpiritError::Service`] and never reaches the
/// timesheet decoder.
pub fn parse_time_table(body: &[u8]) -> Result<TimeTable, TeamSpiritError> {
    if let Ok(errors) = serde_json::from_slice::<Vec<ServiceErrorPayload>>(body) {
        if let Some(first) = errors.into_iter().next() {
            if !first.error_code.is_empty() {
                return Err(TeamSpiritError::Service {
                    message: first.message,
                    code: first.error_code,
                });
            }
        }
    }

    serde_json::from_slice(body).map_err(|e| {
        TeamSpiritError::Decode(format!("Failed to parse time table as JSON: {}", e))
    })
}

/// Encode the `POST` body for a time table, without the transient fields.
pub fn encode_time_table_update(table: &TimeTable) -> Result<Vec<u8>, TeamSpiritError> {
    serde_json::to_vec(&TimeTableUpdate::from(table))
        .map_err(|e| TeamSpiritError::Other(format!("Failed to encode time table: {}", e)))
}

/// Mutating endpoints answer with the JSON string `"OK"` and nothing else.
pub fn is_ok_body(body: &[u8]) -> bool {
    body == br#""OK""#
}
