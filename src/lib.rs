#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod config;
pub mod dispatch;
pub mod error;
pub mod selector;
pub mod session;
pub mod store;
pub mod telemetry;
pub mod types;

pub use session::Session;

pub type Result<T> = std::result::Result<T, error::Error>;
