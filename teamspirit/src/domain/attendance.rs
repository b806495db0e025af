use serde::{Deserialize, Serialize};

/// Body of `PUT /services/apexrest/Dakoku`, which stamps a single clock-in
/// (`attendance = 1`) or clock-out (`attendance = 0`) at the given time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendancePayload {
    pub attendance: i32,
    pub hour: i32,
    pub min: i32,
}

impl AttendancePayload {
    pub fn new(attendance: bool, hour: u8, min: u8) -> Self {
        Self {
            attendance: i32::from(attendance),
            hour: i32::from(hour),
            min: i32::from(min),
        }
    }
}
