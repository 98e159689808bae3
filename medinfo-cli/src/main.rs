// medinfo-cli/src/main.rs
//
// Entry point for the `medinfo` binary: parses the command line, installs
// the logger, dispatches to the selected command and maps failures to
// exit status 1.

use clap::Parser;
use medinfo_cli::output::print_error;
use medinfo_cli::{Cli, Commands, logging, run_info, run_probe};
use std::process;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match &cli.command {
        Commands::Info(args) => run_info(args),
        Commands::Probe(args) => run_probe(args),
    };

    if let Err(e) = result {
        print_error(&format!("Error: {}", e));
        process::exit(1);
    }
}
