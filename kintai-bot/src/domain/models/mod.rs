mod action;
mod ids;
mod timesheet;
mod user;

pub use action::*;
pub use ids::*;
pub use timesheet::*;
pub use user::*;
