mod attendance;
mod responses;

pub use attendance::AttendanceServiceFactory;
pub use responses::*;
