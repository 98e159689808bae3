// medinfo-cli/src/lib.rs
//
// Library portion of the Medinfo CLI application.
// Contains argument definitions and command logic.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod output;

// Re-export items needed by the binary or integration tests
pub use cli::{Cli, Commands, InfoArgs, LibraryArgs, ProbeArgs};
pub use commands::info::run_info;
pub use commands::probe::run_probe;
pub use error::CliResult;
