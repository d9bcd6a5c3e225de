//! Pattern matchers: one strategy per rule category.
//!
//! Matchers are pure functions from a [`SourceUnit`] and a compiled rule to
//! raw [`CandidateHit`]s. Overlapping matches from different rules are all
//! kept here; the aggregator owns overlap resolution and scoring.

mod dataflow;
mod entropy;
mod hygiene;
mod injection;
mod secrets;

pub use entropy::shannon_entropy;
pub use secrets::redact_value;

use crate::registry::{Category, Matcher, Registry, Rule, Severity};
use crate::source::{Line, SourceUnit};
use compact_str::CompactString;

/// An unscored raw match, produced transiently by the matchers and consumed
/// by the aggregator. Not retained past aggregation.
#[derive(Debug, Clone)]
pub struct CandidateHit {
    /// Id of the rule that produced the hit.
    pub rule_id: CompactString,
    /// Category of the rule.
    pub category: Category,
    /// Default severity of the rule.
    pub severity: Severity,
    /// Confidence weight of the rule.
    pub confidence: f64,
    /// Message attached to the rule.
    pub message: String,
    /// 1-based line number of the match.
    pub line: usize,
    /// 0-based byte offset of the match start within the unit.
    pub start: usize,
    /// 0-based byte offset one past the match end.
    pub end: usize,
    /// The matched substring (unredacted; redaction happens at aggregation).
    pub matched: String,
}

impl CandidateHit {
    /// Builds a hit for `rule` spanning `range` (byte range within `line`).
    pub(crate) fn spanning(
        rule: &Rule,
        line: &Line<'_>,
        range: std::ops::Range<usize>,
        matched: &str,
    ) -> Self {
        Self {
            rule_id: rule.id.clone(),
            category: rule.category,
            severity: rule.default_severity,
            confidence: rule.confidence_weight,
            message: rule.message.clone(),
            line: line.number,
            start: line.offset + range.start,
            end: line.offset + range.end,
            matched: matched.to_owned(),
        }
    }
}

/// Applies a single rule's matcher against a unit.
#[must_use]
pub fn match_rule(unit: &SourceUnit, rule: &Rule) -> Vec<CandidateHit> {
    if unit.is_binary() {
        return Vec::new();
    }
    match &rule.matcher {
        Matcher::LinePattern { pattern } => {
            let mut hits = Vec::new();
            for line in unit.lines() {
                for found in pattern.find_iter(line.text) {
                    hits.push(CandidateHit::spanning(
                        rule,
                        &line,
                        found.range(),
                        found.as_str(),
                    ));
                }
            }
            hits
        }
        Matcher::Entropy {
            threshold,
            min_length,
        } => secrets::entropy_hits(unit, rule, *threshold, *min_length),
        Matcher::SensitiveAssignment { pattern } => {
            secrets::sensitive_assignment_hits(unit, rule, pattern)
        }
        Matcher::SqlInjection { call, placeholder } => {
            injection::sql_hits(unit, rule, call, placeholder)
        }
        Matcher::CommandInjection { call } => injection::command_hits(unit, rule, call),
        Matcher::TaintedCall {
            call,
            source,
            sanitizer,
            window,
        } => dataflow::tainted_call_hits(unit, rule, call, source, sanitizer, *window),
        Matcher::UnsafeLoad { call, trusted } => {
            dataflow::unsafe_load_hits(unit, rule, call, trusted)
        }
        Matcher::XmlParser {
            call,
            hardened,
            window,
        } => dataflow::xml_parser_hits(unit, rule, call, hardened, *window),
        Matcher::ProximityPattern {
            call,
            context,
            window,
        } => dataflow::proximity_hits(unit, rule, call, context, *window),
        Matcher::SwallowedException => hygiene::swallowed_exception_hits(unit, rule),
        Matcher::UnboundedGrowth => hygiene::unbounded_growth_hits(unit, rule),
    }
}

/// Applies every rule in the registry against a unit.
#[must_use]
pub fn match_all(unit: &SourceUnit, registry: &Registry) -> Vec<CandidateHit> {
    let mut hits = Vec::new();
    for rule in registry.rules() {
        hits.extend(match_rule(unit, rule));
    }
    hits
}
