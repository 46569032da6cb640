// ABOUTME: Library root for bascule - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod clock;
pub mod config;
pub mod control;
pub mod deploy;
pub mod diagnostics;
pub mod error;
pub mod output;
pub mod poll;
pub mod types;
