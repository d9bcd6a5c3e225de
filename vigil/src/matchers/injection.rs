//! Injection matchers: dynamic SQL reaching query calls, and shell commands
//! built by interpolation.
//!
//! Both work in two passes over the unit: first collect identifiers assigned
//! a dynamically built string, then flag sink calls fed either by an inline
//! dynamic string or by one of those identifiers.

use super::CandidateHit;
use crate::registry::Rule;
use crate::source::SourceUnit;
use regex::Regex;
use rustc_hash::FxHashSet;
use std::sync::OnceLock;

#[allow(clippy::unwrap_used)]
fn assign_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*([A-Za-z_]\w*)\s*=\s*(.+)$").unwrap())
}

#[allow(clippy::unwrap_used)]
fn ident_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[A-Za-z_]\w*").unwrap())
}

#[allow(clippy::unwrap_used)]
fn sql_keyword_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(select|insert|update|delete|drop|alter|create)\b").unwrap()
    })
}

#[allow(clippy::unwrap_used)]
fn dynamic_string_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // f-string with interpolation, str.format, quote-adjacent
        // concatenation, or %-formatting applied to a literal.
        Regex::new(
            r#"(?x)
            f"[^"]*\{
            | f'[^']*\{
            | \.format\s*\(
            | ['"]\s*\+
            | \+\s*['"]
            | ['"]\s*%\s*[\w(]
            "#,
        )
        .unwrap()
    })
}

fn is_dynamic(fragment: &str) -> bool {
    dynamic_string_re().is_match(fragment)
}

/// Identifiers assigned a dynamically built string anywhere in the unit.
/// When `require_sql` is set, only assignments containing a SQL keyword
/// qualify.
fn dynamic_assignments(unit: &SourceUnit, require_sql: bool) -> FxHashSet<String> {
    let mut names = FxHashSet::default();
    for line in unit.lines() {
        if let Some(captures) = assign_re().captures(line.text) {
            let (Some(name), Some(rhs)) = (captures.get(1), captures.get(2)) else {
                continue;
            };
            if !is_dynamic(rhs.as_str()) {
                continue;
            }
            if require_sql && !sql_keyword_re().is_match(rhs.as_str()) {
                continue;
            }
            names.insert(name.as_str().to_owned());
        }
    }
    names
}

/// First identifier referenced in a call-argument fragment, skipping string
/// literal contents.
fn first_argument_ident(fragment: &str) -> Option<&str> {
    let unquoted = fragment.split(['"', '\'']).next().unwrap_or(fragment);
    ident_re().find(unquoted).map(|m| m.as_str())
}

/// Flags query-execution calls fed by dynamically built SQL with no
/// parameterization marker in the same statement.
pub(super) fn sql_hits(
    unit: &SourceUnit,
    rule: &Rule,
    call: &Regex,
    placeholder: &Regex,
) -> Vec<CandidateHit> {
    let tainted = dynamic_assignments(unit, true);
    let mut hits = Vec::new();

    for line in unit.lines() {
        for found in call.find_iter(line.text) {
            let argument = &line.text[found.end()..];
            let inline_dynamic = is_dynamic(argument) && sql_keyword_re().is_match(argument);
            let via_variable = !inline_dynamic
                && first_argument_ident(argument).is_some_and(|name| tainted.contains(name));
            if !inline_dynamic && !via_variable {
                continue;
            }
            // A parameterization marker anywhere in the statement clears it.
            if placeholder.is_match(line.text) {
                continue;
            }
            let matched = line.text[found.start()..].trim_end();
            hits.push(CandidateHit::spanning(
                rule,
                &line,
                found.start()..found.start() + matched.len(),
                matched,
            ));
        }
    }
    hits
}

/// Flags shell-invocation calls whose command argument is built via
/// interpolation instead of a fixed literal or argument list.
pub(super) fn command_hits(unit: &SourceUnit, rule: &Rule, call: &Regex) -> Vec<CandidateHit> {
    let tainted = dynamic_assignments(unit, false);
    let mut hits = Vec::new();

    for line in unit.lines() {
        for found in call.find_iter(line.text) {
            let argument = &line.text[found.end()..];
            let trimmed = argument.trim_start();
            // An argument-list form is the safe spelling.
            if trimmed.starts_with('[') {
                continue;
            }
            let inline_dynamic = is_dynamic(argument);
            let fixed_literal = !inline_dynamic
                && (trimmed.starts_with('"') || trimmed.starts_with('\''));
            if fixed_literal {
                continue;
            }
            let via_variable = !inline_dynamic
                && first_argument_ident(argument).is_some_and(|name| tainted.contains(name));
            if !inline_dynamic && !via_variable {
                continue;
            }
            let matched = line.text[found.start()..].trim_end();
            hits.push(CandidateHit::spanning(
                rule,
                &line,
                found.start()..found.start() + matched.len(),
                matched,
            ));
        }
    }
    hits
}
