//! Domain types, errors and the availability prober.

pub mod engine;
pub mod error;
pub mod logger;
pub mod output;
pub mod types;
