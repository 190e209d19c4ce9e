use std::path::Path;
use std::process::ExitCode;

use miette::IntoDiagnostic;

use crate::discover::{self, LOCAL_SETTINGS_FILE, SETTINGS_DIR};
use crate::domain::NormalizedPath;
use crate::merge::{merge_permissions, MergeReport};
use crate::settings::{OutputSettings, UpdateReport};

/// Arguments of a merge run, already parsed from the command line.
#[derive(Debug)]
pub struct MergeArgs<'a> {
    pub directory: &'a Path,
    pub output: &'a Path,
    pub verbose: bool,
}

/// Execute a merge run: discover, extract, merge, write, report.
///
/// Progress goes to stdout, diagnostics and fatal errors to stderr.
/// Exits 0 on success and on the "nothing to merge" early exits, 1 when
/// the search root is invalid or the output file cannot be updated.
pub fn run(args: &MergeArgs<'_>) -> ExitCode {
    match execute(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(report) => {
            eprintln!("{report:?}");
            ExitCode::FAILURE
        }
    }
}

fn execute(args: &MergeArgs<'_>) -> miette::Result<()> {
    let cwd = std::env::current_dir().into_diagnostic()?;
    let root = NormalizedPath::new(args.directory, &cwd).into_path_buf();
    let output = NormalizedPath::new(args.output, &cwd).into_path_buf();

    discover::validate_root(&root)?;

    let pattern = format!("{SETTINGS_DIR}/{LOCAL_SETTINGS_FILE}");
    println!("🔍 Searching for {pattern} files in: {}", root.display());
    println!("{}", "-".repeat(60));

    let files = discover::find_settings_files(&root)?;
    if files.is_empty() {
        println!("⚠️  No {pattern} files found");
        return Ok(());
    }

    println!("📁 Found {} settings file(s):", files.len());
    let merged = merge_permissions(&files, &root);
    print_sources(&merged);

    if merged.permissions.is_empty() {
        println!("\n⚠️  No permissions found to merge");
        return Ok(());
    }

    println!(
        "\n📊 Total unique permissions found: {}",
        merged.permissions.len()
    );

    if args.verbose {
        println!("\n📋 Merged permissions list:");
        for permission in merged.permissions.iter() {
            println!("  • {permission}");
        }
    }

    let settings = OutputSettings::load(&output)?;
    print_loaded(&output, &settings);
    let update = settings.merge_and_save(&merged.permissions)?;
    print_update(&output, &update);

    println!("\n📈 Summary:");
    println!("  • Files processed: {}", files.len());
    println!("  • Unique permissions: {}", merged.permissions.len());
    println!("  • Output file: {}", output.display());

    Ok(())
}

fn print_sources(merged: &MergeReport) {
    for source in &merged.sources {
        println!(
            "  📄 Found {} permissions in: {}",
            source.count, source.display_path
        );
    }
}

/// Printed before the write so the user sees what was read even if it fails.
fn print_loaded(output: &Path, settings: &OutputSettings) {
    if settings.repaired() {
        println!(
            "⚠️  Fixed JSON formatting issues (trailing commas) in: {}",
            output.display()
        );
    }
    if settings.existed() {
        println!("📖 Reading existing settings from: {}", output.display());
        if settings.existing_count() > 0 {
            println!(
                "  📋 Found {} existing allowed permissions",
                settings.existing_count()
            );
        }
    }
}

fn print_update(output: &Path, update: &UpdateReport) {
    if update.added > 0 {
        println!("\n🆕 Added {} new permissions", update.added);
    } else {
        println!("\n✔️  No new permissions to add (all already exist)");
    }

    println!("✅ Successfully updated settings in: {}", output.display());
    println!("   Total unique permissions: {}", update.total);
}
