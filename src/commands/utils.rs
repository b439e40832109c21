use anyhow::{Context, Result};
use profile_decorator::output::read_json_report;
use profile_decorator::utils::config::REPORT_SCHEMA_VERSION;
use std::path::PathBuf;

/// Validate a JSON profile report
pub fn validate_report_file(file_path: PathBuf) -> Result<()> {
    println!("Validating report: {}", file_path.display());

    let report = read_json_report(&file_path)
        .with_context(|| format!("Failed to read report {}", file_path.display()))?;

    if report.version != REPORT_SCHEMA_VERSION {
        anyhow::bail!(
            "Unsupported report version {} (expected {})",
            report.version,
            REPORT_SCHEMA_VERSION
        );
    }

    println!("✓ Valid profile report");
    println!("  Version: {}", report.version);
    println!("  Target: {}", report.target);
    println!(
        "  Calls: {} ({} primitive)",
        report.total_calls, report.primitive_calls
    );
    println!("  Total Time: {:.3}s", report.total_time);
    println!("  Ordered By: {}", report.ordered_by.join(", "));
    println!(
        "  Entries: {} of {}",
        report.entries.len(),
        report.total_entries
    );
    println!("  Generated At: {}", report.generated_at);

    Ok(())
}

/// Display version information
pub fn display_version() {
    println!("Profile Decorator v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", REPORT_SCHEMA_VERSION);
    println!();
    println!("Profile callables and write sorted statistics reports to files.");
}
