#![forbid(unsafe_code)]

pub mod error;
pub mod model;
pub mod recovery;
pub mod schedule;
pub mod time;
pub mod transcript;

pub use error::Error;
pub use time::Clock;
