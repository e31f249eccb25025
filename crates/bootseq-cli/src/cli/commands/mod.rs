//! CLI command handlers.

pub mod boot;
pub mod config;
pub mod print;
pub mod script;
