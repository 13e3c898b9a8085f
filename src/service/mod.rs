//! Configuration loading and command execution for the launcher binary.
pub mod config;
pub mod runtime;
