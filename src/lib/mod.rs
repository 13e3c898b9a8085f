//! Shared library modules providing error types, filesystem probes, path shapes, and telemetry initialization.

pub mod errors;
pub mod fs;
pub mod paths;
pub mod telemetry;
