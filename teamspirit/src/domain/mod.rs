mod attendance;
mod time_table;

pub use attendance::*;
pub use time_table::*;
