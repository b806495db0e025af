use teamspirit::{TimeTable, TimeTableItem, WorkLocationItem, TYPE_ATTENDANCE, TYPE_REST, TYPE_REST_ALT};

use crate::domain::{
    models::{EntryKind, MinutesOfDay, Timesheet, TimesheetEntry, WorkLocation},
    AttendanceError,
};

pub fn to_domain_kind(code: i64) -> EntryKind {
    match code {
        TYPE_ATTENDANCE => EntryKind::Attendance,
        TYPE_REST => EntryKind::Rest,
        TYPE_REST_ALT => EntryKind::AltRest,
        other => EntryKind::Other(other),
    }
}

pub fn to_teamspirit_kind(kind: EntryKind) -> i64 {
    match kind {
        EntryKind::Attendance => TYPE_ATTENDANCE,
        EntryKind::Rest => TYPE_REST,
        EntryKind::AltRest => TYPE_REST_ALT,
        EntryKind::Other(code) => code,
    }
}

fn to_domain_minutes(value: Option<i64>) -> Result<Option<MinutesOfDay>, AttendanceError> {
    value
        .map(MinutesOfDay::new)
        .transpose()
        .map_err(|e| AttendanceError::Decode(e.to_string()))
}

/// Convert a TeamSpirit TimeTable to a domain Timesheet.
pub fn to_domain_timesheet(table: TimeTable) -> Result<Timesheet, AttendanceError> {
    let entries = table
        .time_table
        .into_iter()
        .map(|item| {
            Ok(TimesheetEntry {
                timestamp: item.datetime,
                kind: to_domain_kind(item.item_type),
                from: to_domain_minutes(item.from)?,
                to: to_domain_minutes(item.to)?,
            })
        })
        .collect::<Result<Vec<_>, AttendanceError>>()?;

    let work_locations = table
        .work_location
        .into_iter()
        .map(|l| WorkLocation {
            object_id: l.object_id,
            name: l.name,
        })
        .collect();

    Ok(Timesheet::new(entries)
        .with_holiday(table.is_holiday)
        .with_work_locations(work_locations))
}

/// Convert a domain Timesheet back to the TeamSpirit shape.
pub fn to_teamspirit_table(sheet: &Timesheet) -> TimeTable {
    TimeTable {
        time_table: sheet
            .entries()
            .iter()
            .map(|e| TimeTableItem {
                datetime: e.timestamp,
                from: e.from.map(|m| i64::from(m.get())),
                to: e.to.map(|m| i64::from(m.get())),
                item_type: to_teamspirit_kind(e.kind),
            })
            .collect(),
        is_holiday: sheet.holiday_flag(),
        work_location: sheet
            .work_locations()
            .iter()
            .map(|l| WorkLocationItem {
                object_id: l.object_id.clone(),
                name: l.name.clone(),
            })
            .collect(),
    }
}

/// Convert a time::Date to the chrono::NaiveDate the client takes.
pub fn to_naive_date(date: time::Date) -> Result<chrono::NaiveDate, AttendanceError> {
    chrono::NaiveDate::from_ymd_opt(date.year(), u8::from(date.month()).into(), date.day().into())
        .ok_or_else(|| AttendanceError::push_failed(format!("Invalid date: {}", date)))
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;

    #[test]
    fn unknown_row_types_survive() {
        let table = TimeTable {
            time_table: vec![
                TimeTableItem {
                    datetime: 1,
                    from: Some(540),
                    to: None,
                    item_type: 1,
                },
                TimeTableItem {
                    datetime: 2,
                    from: Some(720),
                    to: Some(780),
                    item_type: 22,
                },
                TimeTableItem {
                    datetime: 3,
                    from: None,
                    to: None,
                    item_type: 7,
                },
            ],
            is_holiday: Some(false),
            work_location: vec![],
        };

        let sheet = to_domain_timesheet(table.clone()).unwrap();
        assert_eq!(sheet.entries()[0].kind, EntryKind::Attendance);
        assert_eq!(sheet.entries()[1].kind, EntryKind::AltRest);
        assert_eq!(sheet.entries()[2].kind, EntryKind::Other(7));
        assert!(!sheet.is_resting());
        assert!(sheet.has_rested());

        assert_eq!(to_teamspirit_table(&sheet), table);
    }

    #[test]
    fn out_of_range_minutes_are_a_decode_error() {
        let table = TimeTable {
            time_table: vec![TimeTableItem {
                datetime: 1,
                from: Some(-5),
                to: None,
                item_type: 1,
            }],
            ..TimeTable::default()
        };

        assert!(matches!(
            to_domain_timesheet(table),
            Err(AttendanceError::Decode(_))
        ));
    }

    #[test]
    fn converts_dates() {
        assert_eq!(
            to_naive_date(date!(2024 - 02 - 29)).unwrap(),
            chrono::NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
    }
}
