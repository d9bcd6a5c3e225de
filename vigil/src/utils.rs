//! Small shared helpers: suppression markers and display paths.

use compact_str::CompactString;
use smallvec::SmallVec;

/// A parsed line-trailing suppression marker.
///
/// Syntax (consumed by the aggregator, bit-exact):
/// `suppress: <rule-id>[,<rule-id>...]` or `suppress: all`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuppressDirective {
    /// Every finding on the line is dropped.
    All,
    /// Only findings from the listed rule ids are dropped.
    Rules(SmallVec<[CompactString; 2]>),
}

impl SuppressDirective {
    /// Whether the directive silences the given rule id.
    #[must_use]
    pub fn silences(&self, rule_id: &str) -> bool {
        match self {
            SuppressDirective::All => true,
            SuppressDirective::Rules(ids) => ids.iter().any(|id| id == rule_id),
        }
    }
}

/// Parses a trailing `suppress:` marker out of a line, if present.
///
/// The marker is a comment token, so anything after the id list is ignored.
/// Ids are comma-separated; surrounding whitespace is tolerated.
#[must_use]
pub fn suppress_directive(line: &str) -> Option<SuppressDirective> {
    let idx = line.rfind("suppress:")?;
    let rest = line[idx + "suppress:".len()..].trim_start();

    if rest == "all" || rest.starts_with("all") && !is_id_char(rest.as_bytes().get(3).copied()) {
        return Some(SuppressDirective::All);
    }

    let mut ids: SmallVec<[CompactString; 2]> = SmallVec::new();
    for raw in rest.split(',') {
        let id: String = raw
            .trim_start()
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
            .collect();
        if id.is_empty() {
            break;
        }
        ids.push(CompactString::from(id.as_str()));
    }

    if ids.is_empty() {
        None
    } else {
        Some(SuppressDirective::Rules(ids))
    }
}

fn is_id_char(byte: Option<u8>) -> bool {
    matches!(byte, Some(b) if b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// Normalizes a path for display.
///
/// - Converts backslashes to forward slashes (for cross-platform consistency)
/// - Strips leading "./" prefix (for cleaner output)
#[must_use]
pub fn normalize_display_path(path: &std::path::Path) -> String {
    let s = path.to_string_lossy();
    let normalized = s.replace('\\', "/");
    normalized
        .strip_prefix("./")
        .unwrap_or(&normalized)
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suppress_all() {
        let directive = suppress_directive("x = 1  # suppress: all");
        assert_eq!(directive, Some(SuppressDirective::All));
    }

    #[test]
    fn test_suppress_single_rule() {
        let directive = suppress_directive("k = \"v\"  // suppress: VGL-S101");
        match directive {
            Some(SuppressDirective::Rules(ids)) => {
                assert_eq!(ids.len(), 1);
                assert_eq!(ids[0], "VGL-S101");
            }
            other => panic!("expected rule list, got {other:?}"),
        }
    }

    #[test]
    fn test_suppress_multiple_rules() {
        let directive = suppress_directive("v  # suppress: VGL-S101, VGL-S200");
        match directive {
            Some(SuppressDirective::Rules(ids)) => {
                assert!(directive_silences(&ids, "VGL-S101"));
                assert!(directive_silences(&ids, "VGL-S200"));
                assert!(!directive_silences(&ids, "VGL-I101"));
            }
            other => panic!("expected rule list, got {other:?}"),
        }
    }

    fn directive_silences(ids: &[CompactString], rule_id: &str) -> bool {
        ids.iter().any(|id| id == rule_id)
    }

    #[test]
    fn test_no_marker_returns_none() {
        assert_eq!(suppress_directive("plain line of code"), None);
        assert_eq!(suppress_directive("# mentions suppression but not the token"), None);
    }

    #[test]
    fn test_marker_without_ids_is_ignored() {
        assert_eq!(suppress_directive("x  # suppress: "), None);
    }

    #[test]
    fn test_normalize_display_path() {
        use std::path::Path;
        assert_eq!(normalize_display_path(Path::new("./src/app.py")), "src/app.py");
        assert_eq!(normalize_display_path(Path::new(".\\fixtures\\a.py")), "fixtures/a.py");
    }
}
