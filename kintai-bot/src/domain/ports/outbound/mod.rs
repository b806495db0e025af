mod notifier;
mod stores;
mod timesheet;

pub use notifier::*;
pub use stores::*;
pub use timesheet::*;
