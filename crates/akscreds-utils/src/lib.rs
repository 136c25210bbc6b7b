//! Foundation utilities shared by the akscreds crates.

pub mod error;
pub mod exit_codes;
pub mod logging;
pub mod types;
