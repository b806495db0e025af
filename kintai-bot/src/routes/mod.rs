pub(crate) mod error;
pub(crate) mod slack;

pub(crate) use error::ApiError;
