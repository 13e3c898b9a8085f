//! Library crate root re-exporting entrypoint resolution and launch modules.

#[path = "lib/mod.rs"]
pub mod lib_mod;
pub use lib_mod as lib;
pub mod cli;
pub mod entrypoint;
pub mod launch;
pub mod service;
