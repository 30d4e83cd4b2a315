//! Command-line interface handlers

pub mod commands;
pub mod demo;

pub use commands::*;
pub use demo::run_demo;
