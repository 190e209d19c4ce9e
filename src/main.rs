use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

/// Merge Claude settings.local.json files from multiple directories.
#[derive(Debug, Parser)]
#[command(name = "claude-settings-merge", version, about)]
struct Cli {
    /// Directory to search for settings files
    #[arg(default_value = ".")]
    directory: PathBuf,

    /// Output file path
    #[arg(short, long, default_value = "conf/.claude/settings.json")]
    output: PathBuf,

    /// Show verbose output including all found permissions
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    claude_settings_merge::run_merge(&cli.directory, &cli.output, cli.verbose)
}
