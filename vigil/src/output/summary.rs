use crate::aggregate::{ScanReport, ScanStatus};
use crate::registry::Severity;
use colored::Colorize;
use std::io::Write;

/// Print the main header with box-drawing characters.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_header(writer: &mut impl Write) -> std::io::Result<()> {
    writeln!(writer)?;
    writeln!(
        writer,
        "{}",
        "╔════════════════════════════════════════╗".cyan()
    )?;
    writeln!(
        writer,
        "{}",
        "║  Vigil Security Scan Results           ║".cyan().bold()
    )?;
    writeln!(
        writer,
        "{}",
        "╚════════════════════════════════════════╝".cyan()
    )?;
    writeln!(writer)?;
    Ok(())
}

/// Print per-severity counts as colored "pills".
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_summary_pills(writer: &mut impl Write, report: &ScanReport) -> std::io::Result<()> {
    fn pill(label: &str, count: usize) -> String {
        if count == 0 {
            format!("{}: {}", label, count.to_string().green())
        } else {
            format!("{}: {}", label, count.to_string().red().bold())
        }
    }

    let count = |severity: Severity| {
        report
            .findings
            .iter()
            .filter(|f| f.severity == severity)
            .count()
    };

    writeln!(
        writer,
        "{}  {}  {}  {}  {}",
        pill("Critical", count(Severity::Critical)),
        pill("High", count(Severity::High)),
        pill("Medium", count(Severity::Medium)),
        pill("Low", count(Severity::Low)),
        pill("Info", count(Severity::Info)),
    )?;
    writeln!(writer)?;
    Ok(())
}

/// Print the scan status line. Partial scans are called out loudly; a clean
/// complete scan prints a quiet confirmation.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_status(writer: &mut impl Write, report: &ScanReport) -> std::io::Result<()> {
    match report.status {
        ScanStatus::Complete => {
            if report.findings.is_empty() {
                writeln!(writer, "{}", "✓ All clean! No findings.".green())?;
            }
        }
        ScanStatus::Cancelled | ScanStatus::DeadlineExceeded => {
            writeln!(
                writer,
                "{}",
                format!(
                    "WARNING: scan incomplete ({}); results cover processed units only.",
                    report.status.as_str()
                )
                .yellow()
                .bold()
            )?;
        }
    }
    Ok(())
}
