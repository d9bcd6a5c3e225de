//! Report rendering.
//!
//! Two built-in formats: `json`, a stable machine-readable document with a
//! fixed field order, and `text`, the styled table output. Unknown format
//! names are rejected rather than silently defaulted.

use crate::aggregate::{Finding, Note, ScanReport, ScanStatus};
use crate::errors::ScanError;
use crate::registry::Severity;
use serde::Serialize;

/// Aggregate counts for the document header.
#[derive(Debug, Serialize)]
struct Summary {
    total: usize,
    critical: usize,
    high: usize,
    medium: usize,
    low: usize,
    info: usize,
}

impl Summary {
    fn of(findings: &[Finding]) -> Self {
        let count = |severity: Severity| findings.iter().filter(|f| f.severity == severity).count();
        Self {
            total: findings.len(),
            critical: count(Severity::Critical),
            high: count(Severity::High),
            medium: count(Severity::Medium),
            low: count(Severity::Low),
            info: count(Severity::Info),
        }
    }
}

/// The JSON document shape. Field order is part of the output contract.
#[derive(Debug, Serialize)]
struct Document<'a> {
    status: ScanStatus,
    summary: Summary,
    findings: &'a [Finding],
    notes: &'a [Note],
}

/// Renders a scan report in the named format.
///
/// # Errors
///
/// Returns [`ScanError::UnsupportedFormat`] for unknown format names and
/// [`ScanError::ReportEncoding`] if JSON serialization fails.
pub fn render(report: &ScanReport, format: &str) -> Result<String, ScanError> {
    match format {
        "json" => {
            let document = Document {
                status: report.status,
                summary: Summary::of(&report.findings),
                findings: &report.findings,
                notes: &report.notes,
            };
            Ok(serde_json::to_string_pretty(&document)?)
        }
        "text" => {
            let mut buf = Vec::new();
            crate::output::write_text_report(&mut buf, report)?;
            Ok(String::from_utf8_lossy(&buf).into_owned())
        }
        other => Err(ScanError::UnsupportedFormat(other.to_owned())),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::aggregate::NoteKind;
    use crate::registry::Category;
    use compact_str::CompactString;

    fn sample_report() -> ScanReport {
        ScanReport {
            status: ScanStatus::Complete,
            findings: vec![Finding {
                fingerprint: "00000000deadbeef".to_owned(),
                rule_id: CompactString::from("VGL-S101"),
                category: Category::HardcodedSecret,
                severity: Severity::Critical,
                confidence: 0.95,
                unit: "app/settings.py".to_owned(),
                line: 12,
                column: 9,
                message: "AWS access key id".to_owned(),
                matched: Some("AKIA...MPLE".to_owned()),
            }],
            notes: vec![Note {
                unit: "assets/logo.png".to_owned(),
                kind: NoteKind::BinaryContent,
                detail: "binary content; pattern matching skipped".to_owned(),
            }],
        }
    }

    #[test]
    fn test_json_document_has_stable_top_level_fields() {
        let rendered = render(&sample_report(), "json").unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["status"], "complete");
        assert_eq!(value["summary"]["total"], 1);
        assert_eq!(value["summary"]["critical"], 1);
        assert_eq!(value["findings"][0]["rule_id"], "VGL-S101");
        assert_eq!(value["findings"][0]["category"], "hardcoded-secret");
        assert_eq!(value["findings"][0]["severity"], "critical");
        assert_eq!(value["notes"][0]["kind"], "skipped: binary-content");
    }

    #[test]
    fn test_text_format_lists_findings_and_notes() {
        let rendered = render(&sample_report(), "text").unwrap();
        assert!(rendered.contains("VGL-S101"));
        assert!(rendered.contains("app/settings.py:12"));
        assert!(rendered.contains("assets/logo.png"));
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        let err = render(&sample_report(), "xml").unwrap_err();
        assert!(matches!(err, ScanError::UnsupportedFormat(name) if name == "xml"));
    }

    #[test]
    fn test_partial_status_is_serialized_verbatim() {
        let mut report = sample_report();
        report.status = ScanStatus::Cancelled;
        let rendered = render(&report, "json").unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["status"], "partial: cancelled");
    }
}
