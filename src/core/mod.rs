//! Core functionality shared by the library and the command line tool
//!
//! This module contains:
//! - Error types and the `Result` alias
//! - Default settings
//! - Command line argument definitions

pub mod cli;
pub mod errors;
pub mod settings;

// Re-export commonly used items
pub use cli::CliArgs;
pub use errors::{EncodingError, Error, Result, SvgtypeContext};
