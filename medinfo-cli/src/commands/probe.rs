//! Implementation of the 'probe' subcommand.
//!
//! Reports whether a MediaInfo library can be loaded, which file would be
//! used, and what its version enables.

use crate::cli::ProbeArgs;
use crate::error::CliResult;
use crate::output::{print_heading, print_info, print_section, print_success};

use medinfo_core::Binding;

/// Runs the probe command; fails when no library can be used.
pub fn run_probe(args: &ProbeArgs) -> CliResult<()> {
    let binding = Binding::system();
    let library_file = args.library.library.as_deref();

    print_heading("MediaInfo Library");
    for candidate in binding.candidates(library_file) {
        print_info("Candidate", candidate.display());
    }

    let available = binding.can_parse(library_file);
    print_info("Available", if available { "yes" } else { "no" });

    let (raw, version) = binding.library_version(library_file)?;
    print_success("MediaInfo library is available");
    print_info("Version", &raw);

    let caps = version.capabilities();
    print_section("Capabilities");
    print_info("Inform keyword", caps.xml_keyword);
    print_info("Cover data option", caps.cover_data_option);
    print_info("Reset option", caps.reset_option);
    print_info("JSON output", caps.json_output);
    print_info("Thread safe", caps.thread_safe);
    Ok(())
}
