pub mod discover;
pub mod domain;
pub mod extract;
pub mod merge;
pub mod settings;

pub(crate) mod cli;
pub(crate) mod logging;

use std::path::Path;
use std::process::ExitCode;

/// Run a merge: find every `.claude/settings.local.json` under `directory`,
/// union their allow lists into `output`, and print a report.
///
/// This is the binary entry point. It exists to bridge the binary crate (`main.rs`)
/// to the library without exposing `cli` internals. Not a stable integration API;
/// callers should use [`discover`], [`merge`] and [`settings`] directly.
pub fn run_merge(directory: &Path, output: &Path, verbose: bool) -> ExitCode {
    logging::init(verbose);
    cli::merge::run(&cli::merge::MergeArgs {
        directory,
        output,
        verbose,
    })
}
