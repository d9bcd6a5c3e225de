//! Styled terminal output: tables, summary pills, and progress reporting.

mod progress;
mod summary;
mod tables;

pub use progress::create_progress_bar;
pub use summary::{print_header, print_status, print_summary_pills};
pub use tables::{print_findings, print_notes, print_rule_list};

use crate::aggregate::ScanReport;
use std::io::Write;

/// Writes the full styled text report.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn write_text_report(writer: &mut impl Write, report: &ScanReport) -> std::io::Result<()> {
    print_header(writer)?;
    print_findings(writer, report)?;
    print_notes(writer, report)?;
    print_summary_pills(writer, report)?;
    print_status(writer, report)?;
    Ok(())
}
