mod auth;
mod client;
pub mod domain;
mod teamspirit_url;

pub(crate) use teamspirit_url::*;

pub use auth::*;
pub use client::*;
pub use domain::*;
