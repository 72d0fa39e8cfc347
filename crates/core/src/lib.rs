#![forbid(unsafe_code)]

pub mod error;
pub mod model;
pub mod partition;
pub mod time;

pub use error::Error;
pub use partition::{Classification, Normalized, NormalizedBatch, Partition};
pub use time::Clock;
