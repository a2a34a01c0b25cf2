#![forbid(unsafe_code)]

//! Data model for the recall trainer: items, pools, configuration and sessions.

pub mod error;
pub mod model;
pub mod time;

pub use error::Error;
pub use time::Clock;
