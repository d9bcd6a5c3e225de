//! Hygiene matchers: swallowed exceptions and unbounded container growth.
//!
//! Both operate on indentation structure rather than single lines, so they
//! take a snapshot of the unit's line stream.

use super::CandidateHit;
use crate::registry::Rule;
use crate::source::{Line, SourceUnit};
use regex::Regex;
use rustc_hash::FxHashSet;
use std::sync::OnceLock;

#[allow(clippy::unwrap_used)]
fn except_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\s*)except(\s+[^:]+)?\s*:\s*(#.*)?$").unwrap())
}

#[allow(clippy::unwrap_used)]
fn noop_body_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*(pass|\.\.\.)\s*(#.*)?$").unwrap())
}

#[allow(clippy::unwrap_used)]
fn empty_catch_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\bcatch\s*\([^)]*\)\s*\{\s*\}").unwrap())
}

#[allow(clippy::unwrap_used)]
fn module_container_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([A-Za-z_]\w*)\s*(?::[^=]+)?=\s*(\[\]|\{\}|set\(\)|dict\(\)|list\(\))\s*(#.*)?$")
            .unwrap()
    })
}

#[allow(clippy::unwrap_used)]
fn growth_call_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b([A-Za-z_]\w*)\.(append|add|insert|extend|update)\s*\(").unwrap())
}

fn indent_width(text: &str) -> usize {
    text.len() - text.trim_start().len()
}

/// Flags catch-all exception handlers whose body performs no logging, no
/// re-raise, and no recovery: the body is empty or `pass`-equivalent.
pub(super) fn swallowed_exception_hits(unit: &SourceUnit, rule: &Rule) -> Vec<CandidateHit> {
    let lines: Vec<Line<'_>> = unit.lines().collect();
    let mut hits = Vec::new();

    for (idx, line) in lines.iter().enumerate() {
        // Brace-style languages: an empty catch block on one line.
        if let Some(found) = empty_catch_re().find(line.text) {
            hits.push(CandidateHit::spanning(
                rule,
                line,
                found.range(),
                found.as_str(),
            ));
            continue;
        }

        let Some(captures) = except_re().captures(line.text) else {
            continue;
        };
        let handler_indent = captures.get(1).map_or(0, |m| m.as_str().len());

        let mut body_lines = 0usize;
        let mut only_noop = true;
        for body in &lines[idx + 1..] {
            if body.text.trim().is_empty() {
                continue;
            }
            if indent_width(body.text) <= handler_indent {
                break;
            }
            body_lines += 1;
            if !noop_body_re().is_match(body.text) && !body.text.trim_start().starts_with('#') {
                only_noop = false;
                break;
            }
        }

        if body_lines > 0 && only_noop {
            let trimmed = line.text.trim_end();
            hits.push(CandidateHit::spanning(rule, line, 0..trimmed.len(), trimmed));
        }
    }
    hits
}

/// Flags unbounded accumulation into a module-lifetime container from inside
/// an indented (repeatedly invocable) block, with no eviction in the unit.
pub(super) fn unbounded_growth_hits(unit: &SourceUnit, rule: &Rule) -> Vec<CandidateHit> {
    let mut containers: FxHashSet<&str> = FxHashSet::default();
    for line in unit.lines() {
        if let Some(captures) = module_container_re().captures(line.text) {
            if let Some(name) = captures.get(1) {
                containers.insert(name.as_str());
            }
        }
    }
    if containers.is_empty() {
        return Vec::new();
    }

    let content = unit.content();
    let has_eviction = |name: &str| {
        [".pop", ".clear", ".remove", ".popitem"]
            .iter()
            .any(|suffix| content.contains(&format!("{name}{suffix}")))
            || content.contains(&format!("del {name}"))
            || content.contains("maxlen")
    };

    let mut hits = Vec::new();
    for line in unit.lines() {
        if indent_width(line.text) == 0 {
            continue;
        }
        for captures in growth_call_re().captures_iter(line.text) {
            let (Some(overall), Some(name)) = (captures.get(0), captures.get(1)) else {
                continue;
            };
            if !containers.contains(name.as_str()) || has_eviction(name.as_str()) {
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
