use super::models::Timesheet;

/// What the day looks like, used to pick the next prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Holiday,
    Leaving,
    Resting,
    Attending,
    NotStarted,
}

type Rule = (fn(&Timesheet) -> bool, Status);

/// Rows accumulate, so several predicates can hold at once. The first
/// matching rule wins.
const PRECEDENCE: &[Rule] = &[
    (Timesheet::is_holiday, Status::Holiday),
    (Timesheet::is_leaving, Status::Leaving),
    (Timesheet::is_resting, Status::Resting),
    (Timesheet::is_attending, Status::Attending),
];

pub fn classify(sheet: &Timesheet) -> Status {
    PRECEDENCE
        .iter()
        .find(|(matches, _)| matches(sheet))
        .map(|(_, status)| *status)
        .unwrap_or(Status::NotStarted)
}
