//! CLI command implementations.

pub mod common;
pub mod config;
pub mod list;
pub mod run;
