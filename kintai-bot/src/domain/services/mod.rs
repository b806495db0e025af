mod attendance;
#[cfg(test)]
pub(crate) mod mock;

pub use attendance::*;
