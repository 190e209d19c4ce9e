use std::io::IsTerminal;

use tracing::Level;

/// Install the stderr diagnostics subscriber.
///
/// Warnings only by default; `verbose` also shows debug detail. The user
/// report goes to stdout separately, so diagnostics carry no timestamps or
/// targets. Calling this twice keeps the first subscriber.
pub fn init(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };

    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .try_init();
}
