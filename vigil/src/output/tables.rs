use crate::aggregate::{NoteKind, ScanReport};
use crate::registry::Severity;
use colored::Colorize;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use std::io::Write;

fn create_table(headers: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers);

    if cfg!(test) {
        table.set_width(120);
    }
    table
}

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Critical | Severity::High => Color::Red,
        Severity::Medium => Color::Yellow,
        Severity::Low => Color::Blue,
        Severity::Info => Color::White,
    }
}

/// Print the findings table, already ordered by the engine.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_findings(writer: &mut impl Write, report: &ScanReport) -> std::io::Result<()> {
    if report.findings.is_empty() {
        return Ok(());
    }

    writeln!(writer, "\n{}", "Findings".bold().underline())?;
    let mut table = create_table(vec![
        "Rule ID",
        "Message",
        "Location",
        "Severity",
        "Confidence",
    ]);

    for finding in &report.findings {
        let location = format!("{}:{}", finding.unit, finding.line);
        let mut message = finding.message.clone();
        if let Some(matched) = &finding.matched {
            message.push_str(&format!(" ({matched})"));
        }

        table.add_row(vec![
            Cell::new(&finding.rule_id).add_attribute(Attribute::Dim),
            Cell::new(message).add_attribute(Attribute::Bold),
            Cell::new(location),
            Cell::new(finding.severity.as_str()).fg(severity_color(finding.severity)),
            Cell::new(format!("{:.2}", finding.confidence)),
        ]);
    }

    writeln!(writer, "{table}")?;
    Ok(())
}

/// Print the full rule catalog, one row per registered rule.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_rule_list(
    writer: &mut impl Write,
    registry: &crate::registry::Registry,
) -> std::io::Result<()> {
    writeln!(writer, "\n{}", "Registered Rules".bold().underline())?;
    let mut table = create_table(vec!["Rule ID", "Category", "Severity", "Confidence", "Message"]);

    for rule in registry.rules() {
        table.add_row(vec![
            Cell::new(rule.id.as_str()).add_attribute(Attribute::Dim),
            Cell::new(rule.category.as_str()),
            Cell::new(rule.default_severity.as_str())
                .fg(severity_color(rule.default_severity)),
            Cell::new(format!("{:.2}", rule.confidence_weight)),
            Cell::new(&rule.message),
        ]);
    }

    writeln!(writer, "{table}")?;
    Ok(())
}

/// Print notes about units that were skipped or unreadable.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_notes(writer: &mut impl Write, report: &ScanReport) -> std::io::Result<()> {
    if report.notes.is_empty() {
        return Ok(());
    }

    writeln!(writer, "\n{}", "Notes".bold().underline())?;
    for note in &report.notes {
        let label = match note.kind {
            NoteKind::BinaryContent => "skipped: binary-content".dimmed(),
            NoteKind::Unreadable => "error: unreadable".yellow(),
        };
        writeln!(writer, "  {} {} ({})", label, note.unit, note.detail)?;
    }
    writeln!(writer)?;
    Ok(())
}
