//! Shared plumbing for the Peril executables.

pub mod config;
pub mod console;
pub mod logging;
