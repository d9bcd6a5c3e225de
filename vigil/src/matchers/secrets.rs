//! Heuristic secret matchers: entropy on assigned literals and
//! sensitive-identifier assignments. Credential shapes are plain
//! `LinePattern` rules from the catalog and need no code here.

use super::entropy::{is_entropy_exempt, shannon_entropy};
use super::CandidateHit;
use crate::registry::Rule;
use crate::source::SourceUnit;
use regex::Regex;

/// Redacts a secret value, keeping the first and last four characters.
#[must_use]
pub fn redact_value(s: &str) -> String {
    if s.chars().count() <= 8 {
        return "*".repeat(s.chars().count());
    }
    let start: String = s.chars().take(4).collect();
    let end_rev: String = s.chars().rev().take(4).collect();
    let end: String = end_rev.chars().rev().collect();
    format!("{start}...{end}")
}

/// Extracts quoted string literals from a line, with their byte offsets.
///
/// Handles single and double quotes and backslash escapes. The returned
/// offset points at the first byte of the literal's content.
pub(super) fn string_literals(line: &str) -> Vec<(usize, &str)> {
    let mut literals = Vec::new();
    let mut in_string = false;
    let mut quote = ' ';
    let mut start = 0;
    let mut escaped = false;

    for (i, c) in line.char_indices() {
        if !in_string && (c == '"' || c == '\'') {
            in_string = true;
            quote = c;
            start = i + 1;
            escaped = false;
        } else if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == quote {
                if i > start {
                    literals.push((start, &line[start..i]));
                }
                in_string = false;
            }
        }
    }

    literals
}

/// Whether a literal at `offset` sits on the right-hand side of an
/// assignment-like statement (`=` or `:` somewhere before it).
fn is_assigned(line: &str, offset: usize) -> bool {
    line[..offset.min(line.len())]
        .bytes()
        .any(|b| b == b'=' || b == b':')
}

/// Entropy matcher: flags assigned string literals whose Shannon entropy
/// clears the rule threshold.
pub(super) fn entropy_hits(
    unit: &SourceUnit,
    rule: &Rule,
    threshold: f64,
    min_length: usize,
) -> Vec<CandidateHit> {
    let mut hits = Vec::new();
    for line in unit.lines() {
        for (offset, literal) in string_literals(line.text) {
            if literal.len() < min_length || !is_assigned(line.text, offset) {
                continue;
            }
            if is_entropy_exempt(literal) {
                continue;
            }
            let entropy = shannon_entropy(literal);
            if entropy >= threshold {
                hits.push(CandidateHit::spanning(
                    rule,
                    &line,
                    offset..offset + literal.len(),
                    literal,
                ));
            }
        }
    }
    hits
}

/// Sensitive-assignment matcher: flags short literals assigned to
/// identifiers whose names suggest credential material. Catches the secrets
/// too short or too regular for the entropy path.
pub(super) fn sensitive_assignment_hits(
    unit: &SourceUnit,
    rule: &Rule,
    pattern: &Regex,
) -> Vec<CandidateHit> {
    let mut hits = Vec::new();
    for line in unit.lines() {
        for captures in pattern.captures_iter(line.text) {
            let Some(overall) = captures.get(0) else {
                continue;
            };
            let Some(value) = captures.get(1) else {
                continue;
            };
            // Trivial values ("", "x", "-") are placeholders, not secrets.
            if value.as_str().len() < 4 {
                continue;
            }
            hits.push(CandidateHit::spanning(
                rule,
                &line,
                overall.range(),
                overall.as_str(),
            ));
        }
    }
    hits
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::registry::Registry;

    fn hits_for(rule_id: &str, content: &str) -> Vec<CandidateHit> {
        let registry = Registry::builtin().unwrap();
        let rule = registry.get(rule_id).unwrap();
        let unit = SourceUnit::from_text("test.py", content);
        super::super::match_rule(&unit, rule)
    }

    #[test]
    fn test_string_literals_with_offsets() {
        let literals = string_literals(r#"a = "one" + 'two'"#);
        assert_eq!(literals, vec![(5, "one"), (13, "two")]);
    }

    #[test]
    fn test_escaped_quote_stays_inside_literal() {
        let literals = string_literals(r#"x = "a\"b""#);
        assert_eq!(literals.len(), 1);
        assert_eq!(literals[0].1, r#"a\"b"#);
    }

    #[test]
    fn test_entropy_flags_assigned_random_literal() {
        let hits = hits_for(
            "VGL-S200",
            "aws_secret = \"wJalrXUtnFEMI7K7MDENGbPxRfiCYEXAMPLEKEY\"\n",
        );
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].line, 1);
    }

    #[test]
    fn test_entropy_ignores_unassigned_literal() {
        let hits = hits_for("VGL-S200", "print(\"wJalrXUtnFEMI7K7MDENGbPxRfiCYEXAMPLEKEY\")\n");
        assert!(hits.is_empty());
    }

    #[test]
    fn test_entropy_ignores_short_literal() {
        let hits = hits_for("VGL-S200", "password = \"admin123\"\n");
        assert!(hits.is_empty());
    }

    #[test]
    fn test_sensitive_assignment_flags_short_password() {
        let hits = hits_for("VGL-S201", "password = \"admin123\"\n");
        assert_eq!(hits.len(), 1);
        assert!((hits[0].confidence - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_sensitive_assignment_catches_prefixed_identifier() {
        let hits = hits_for("VGL-S201", "DATABASE_PASSWORD = \"admin123\"\n");
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_sensitive_assignment_ignores_trivial_value() {
        let hits = hits_for("VGL-S201", "password = \"\"\npassword = \"---\"\n");
        assert!(hits.is_empty());
    }

    #[test]
    fn test_redact_value() {
        assert_eq!(redact_value("short"), "*****");
        assert_eq!(redact_value("wJalrXUtnFEMI7K7MDENG"), "wJal...DENG");
    }
}
