//! Command implementations for the CLI.
//!
//! Each submodule contains the implementation of a specific command.

/// Module containing the implementation of the `info` command.
/// This command prints the tracks of one or more media files.
pub mod info;

/// Module containing the implementation of the `probe` command.
pub mod probe;
