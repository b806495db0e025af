use std::{fmt, str::FromStr};

use time::{
    macros::{format_description, time},
    Date, Duration, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset,
};

/// A wall-clock time encoded as minutes since midnight, `0..=1439`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MinutesOfDay(u16);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClockTimeError {
    #[error("minute of day out of range: {0}")]
    OutOfRange(i64),
    #[error("expected HH:MM, got {0:?}")]
    Malformed(String),
}

impl MinutesOfDay {
    pub const MAX: u16 = 24 * 60 - 1;

    pub fn new(minutes: i64) -> Result<Self, ClockTimeError> {
        if (0..=i64::from(Self::MAX)).contains(&minutes) {
            Ok(Self(minutes as u16))
        } else {
            Err(ClockTimeError::OutOfRange(minutes))
        }
    }

    pub fn from_hm(hour: u8, minute: u8) -> Result<Self, ClockTimeError> {
        if hour > 23 || minute > 59 {
            return Err(ClockTimeError::OutOfRange(
                i64::from(hour) * 60 + i64::from(minute),
            ));
        }
        Ok(Self(u16::from(hour) * 60 + u16::from(minute)))
    }

    /// Minute of day of `t` on its own offset's wall clock.
    pub fn of(t: OffsetDateTime) -> Self {
        t.time().into()
    }

    pub fn get(self) -> u16 {
        self.0
    }

    pub fn hour(self) -> u8 {
        (self.0 / 60) as u8
    }

    pub fn minute(self) -> u8 {
        (self.0 % 60) as u8
    }

    pub fn to_time(self) -> Time {
        Time::MIDNIGHT + Duration::minutes(i64::from(self.0))
    }
}

impl From<Time> for MinutesOfDay {
    fn from(t: Time) -> Self {
        Self(u16::from(t.hour()) * 60 + u16::from(t.minute()))
    }
}

impl fmt::Display for MinutesOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for MinutesOfDay {
    type Err = ClockTimeError;

    /// Parses the `HH:MM` values used by the select menus.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Time::parse(s.trim(), format_description!("[hour padding:none]:[minute]"))
            .map(Self::from)
            .map_err(|_| ClockTimeError::Malformed(s.to_string()))
    }
}

/// Kind of a timesheet row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Attendance,
    Rest,
    /// The second rest variant the remote side reports. Counts as a rest
    /// everywhere; the bot never creates it.
    AltRest,
    /// A row type the bot does not understand. Kept so it survives the
    /// round trip.
    Other(i64),
}

impl EntryKind {
    pub fn is_attendance(self) -> bool {
        self == EntryKind::Attendance
    }

    pub fn is_rest(self) -> bool {
        matches!(self, EntryKind::Rest | EntryKind::AltRest)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimesheetEntry {
    /// Unix timestamp of the last stamp that touched this row.
    pub timestamp: i64,
    pub kind: EntryKind,
    pub from: Option<MinutesOfDay>,
    pub to: Option<MinutesOfDay>,
}

impl TimesheetEntry {
    pub fn new(timestamp: i64, kind: EntryKind) -> Self {
        Self {
            timestamp,
            kind,
            from: None,
            to: None,
        }
    }

    pub fn with_from(mut self, from: MinutesOfDay) -> Self {
        self.from = Some(from);
        self
    }

    pub fn with_to(mut self, to: MinutesOfDay) -> Self {
        self.to = Some(to);
        self
    }

    fn opened_at(kind: EntryKind, t: OffsetDateTime) -> Self {
        Self::new(t.unix_timestamp(), kind).with_from(MinutesOfDay::of(t))
    }

    fn closed_at(kind: EntryKind, t: OffsetDateTime) -> Self {
        Self::new(t.unix_timestamp(), kind).with_to(MinutesOfDay::of(t))
    }

    pub fn is_attendance(&self) -> bool {
        self.kind.is_attendance()
    }

    pub fn is_rest(&self) -> bool {
        self.kind.is_rest()
    }

    /// A row whose period has not been closed yet.
    pub fn is_open(&self) -> bool {
        self.to.is_none()
    }
}

/// Where a mutation landed in the entry list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    /// An existing row at this index was changed in place.
    Updated(usize),
    /// No matching row existed; a new one was appended at this index.
    Appended(usize),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkLocation {
    pub object_id: Option<String>,
    pub name: Option<String>,
}

/// Rest period recorded when someone leaves without having taken one.
pub const DEFAULT_REST_START: Time = time!(12:00);
pub const DEFAULT_REST_END: Time = time!(13:00);

/// The fixed 09:00–18:00 schedule with a 12:00–13:00 break.
pub struct CanonicalDay;

impl CanonicalDay {
    pub const ATTEND: Time = time!(9:00);
    pub const REST_START: Time = DEFAULT_REST_START;
    pub const REST_END: Time = DEFAULT_REST_END;
    pub const LEAVE: Time = time!(18:00);
}

/// `time` on `date`, on the given offset's wall clock.
pub fn at(date: Date, time: Time, offset: UtcOffset) -> OffsetDateTime {
    PrimitiveDateTime::new(date, time).assume_offset(offset)
}

/// One day of attendance and rest rows.
///
/// Rows accumulate; nothing is ever removed or reordered. Every mutator
/// either updates the first matching row in place or appends a new one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timesheet {
    entries: Vec<TimesheetEntry>,
    is_holiday: Option<bool>,
    work_locations: Vec<WorkLocation>,
}

impl Timesheet {
    pub fn new(entries: Vec<TimesheetEntry>) -> Self {
        Self {
            entries,
            ..Self::default()
        }
    }

    pub fn with_holiday(mut self, is_holiday: Option<bool>) -> Self {
        self.is_holiday = is_holiday;
        self
    }

    pub fn with_work_locations(mut self, work_locations: Vec<WorkLocation>) -> Self {
        self.work_locations = work_locations;
        self
    }

    pub fn entries(&self) -> &[TimesheetEntry] {
        &self.entries
    }

    pub fn holiday_flag(&self) -> Option<bool> {
        self.is_holiday
    }

    pub fn work_locations(&self) -> &[WorkLocation] {
        &self.work_locations
    }

    pub fn is_holiday(&self) -> bool {
        self.is_holiday == Some(true)
    }

    pub fn is_attending(&self) -> bool {
        self.entries
            .iter()
            .any(|e| e.is_attendance() && e.from.is_some())
    }

    pub fn is_resting(&self) -> bool {
        self.entries.iter().any(|e| e.is_rest() && e.is_open())
    }

    pub fn has_rested(&self) -> bool {
        self.entries.iter().any(TimesheetEntry::is_rest)
    }

    pub fn is_leaving(&self) -> bool {
        self.entries
            .iter()
            .any(|e| e.is_attendance() && e.to.is_some())
    }

    fn push(&mut self, entry: TimesheetEntry) -> Mutation {
        self.entries.push(entry);
        Mutation::Appended(self.entries.len() - 1)
    }

    /// Set the start of the working day. Never touches its end.
    pub fn attend(&mut self, t: OffsetDateTime) -> Mutation {
        match self.entries.iter().position(TimesheetEntry::is_attendance) {
            Some(i) => {
                let entry = &mut self.entries[i];
                entry.timestamp = t.unix_timestamp();
                entry.from = Some(MinutesOfDay::of(t));
                Mutation::Updated(i)
            }
            None => self.push(TimesheetEntry::opened_at(EntryKind::Attendance, t)),
        }
    }

    /// Open a new rest period. A day can hold any number of them.
    pub fn rest(&mut self, t: OffsetDateTime) -> Mutation {
        self.push(TimesheetEntry::opened_at(EntryKind::Rest, t))
    }

    /// Close the first open rest period.
    ///
    /// Without one, a rest row holding only an end time is appended; that
    /// row still counts as a rest of its own.
    pub fn unrest(&mut self, t: OffsetDateTime) -> Mutation {
        match self
            .entries
            .iter()
            .position(|e| e.is_rest() && e.is_open())
        {
            Some(i) => {
                let entry = &mut self.entries[i];
                entry.timestamp = t.unix_timestamp();
                entry.to = Some(MinutesOfDay::of(t));
                Mutation::Updated(i)
            }
            None => self.push(TimesheetEntry::closed_at(EntryKind::Rest, t)),
        }
    }

    /// Set the end of the working day, appending an end-only attendance row
    /// if the day was never started.
    pub fn leave(&mut self, t: OffsetDateTime) -> Mutation {
        match self.entries.iter().position(TimesheetEntry::is_attendance) {
            Some(i) => {
                let entry = &mut self.entries[i];
                entry.timestamp = t.unix_timestamp();
                entry.to = Some(MinutesOfDay::of(t));
                Mutation::Updated(i)
            }
            None => self.push(TimesheetEntry::closed_at(EntryKind::Attendance, t)),
        }
    }

    /// Blank every rest row and append an empty attendance row.
    pub fn reset(&mut self, t: OffsetDateTime) -> Mutation {
        let timestamp = t.unix_timestamp();
        for entry in self.entries.iter_mut().filter(|e| e.is_rest()) {
            entry.timestamp = timestamp;
            entry.from = None;
            entry.to = None;
        }

        self.push(TimesheetEntry::new(timestamp, EntryKind::Attendance))
    }

    /// Record the canonical day on `date`: attend, rest, unrest, leave.
    pub fn apply_canonical_day(&mut self, date: Date, offset: UtcOffset) -> [Mutation; 4] {
        [
            self.attend(at(date, CanonicalDay::ATTEND, offset)),
            self.rest(at(date, CanonicalDay::REST_START, offset)),
            self.unrest(at(date, CanonicalDay::REST_END, offset)),
            self.leave(at(date, CanonicalDay::LEAVE, offset)),
        ]
    }
}
