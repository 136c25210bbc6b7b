//! Command-line interface for akscreds
//!
//! - `args`: CLI argument definitions (clap)
//! - `run`: entry point and output handling

pub mod args;
mod run;


pub use args::{Cli, build_cli};
pub use run::run;
