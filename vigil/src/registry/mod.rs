//! Declarative rule registry: load-time compilation, category lookup.
//!
//! The registry is append-only: [`Registry::load`] validates and compiles
//! every definition up front, and no mutation API exists afterwards, so one
//! registry is safely shared read-only across all scan workers.

mod catalog;
mod types;

pub use catalog::builtin_definitions;
pub use types::{Category, Matcher, MatcherSpec, Rule, RuleDefinition, Severity};

use crate::errors::ScanError;
use regex::Regex;
use rustc_hash::FxHashMap;

/// An immutable set of compiled detection rules.
#[derive(Debug)]
pub struct Registry {
    rules: Vec<Rule>,
    by_category: FxHashMap<Category, Vec<usize>>,
}

impl Registry {
    /// Compiles a definition list into a registry.
    ///
    /// Fails on the first malformed definition: unknown category or severity,
    /// confidence outside `0.0..=1.0`, duplicate id, or invalid pattern
    /// syntax.
    pub fn load(definitions: Vec<RuleDefinition>) -> Result<Self, ScanError> {
        let mut rules = Vec::with_capacity(definitions.len());
        let mut by_category: FxHashMap<Category, Vec<usize>> = FxHashMap::default();

        for definition in definitions {
            let rule = compile(definition)?;
            if rules.iter().any(|existing: &Rule| existing.id == rule.id) {
                return Err(ScanError::RuleDefinition {
                    rule_id: rule.id.to_string(),
                    reason: "duplicate rule id".to_owned(),
                });
            }
            by_category
                .entry(rule.category)
                .or_default()
                .push(rules.len());
            rules.push(rule);
        }

        Ok(Self { rules, by_category })
    }

    /// Loads the builtin catalog.
    pub fn builtin() -> Result<Self, ScanError> {
        Self::load(builtin_definitions())
    }

    /// All rules, in load order.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Rules registered under the given category.
    pub fn lookup(&self, category: Category) -> impl Iterator<Item = &Rule> {
        self.by_category
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(|&idx| &self.rules[idx])
    }

    /// Looks a rule up by id.
    #[must_use]
    pub fn get(&self, rule_id: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.id == rule_id)
    }
}

fn compile(definition: RuleDefinition) -> Result<Rule, ScanError> {
    let RuleDefinition {
        id,
        category,
        message,
        severity,
        confidence,
        matcher,
    } = definition;

    let bad = |reason: String| ScanError::RuleDefinition {
        rule_id: id.clone(),
        reason,
    };

    let category = Category::parse(&category)
        .ok_or_else(|| bad(format!("unknown category `{category}`")))?;
    let default_severity = Severity::parse(&severity)
        .ok_or_else(|| bad(format!("unknown severity `{severity}`")))?;
    if !(0.0..=1.0).contains(&confidence) {
        return Err(bad(format!(
            "confidence weight {confidence} outside 0.0..=1.0"
        )));
    }

    let matcher = compile_matcher(matcher, &id)?;

    Ok(Rule {
        id: id.into(),
        category,
        message,
        default_severity,
        confidence_weight: confidence,
        matcher,
    })
}

fn compile_matcher(spec: MatcherSpec, rule_id: &str) -> Result<Matcher, ScanError> {
    let build = |pattern: &str| -> Result<Regex, ScanError> {
        Regex::new(pattern).map_err(|err| ScanError::RuleDefinition {
            rule_id: rule_id.to_owned(),
            reason: format!("invalid pattern: {err}"),
        })
    };

    Ok(match spec {
        MatcherSpec::LinePattern { pattern } => Matcher::LinePattern {
            pattern: build(&pattern)?,
        },
        MatcherSpec::Entropy {
            threshold,
            min_length,
        } => Matcher::Entropy {
            threshold,
            min_length,
        },
        MatcherSpec::SensitiveAssignment { names } => Matcher::SensitiveAssignment {
            // Group 1 captures the assigned literal so the matcher can apply
            // length and placeholder guards to the value alone.
            pattern: build(&format!(
                r#"(?i)\w*(?:{names})\w*\s*[:=]\s*['"]([^'"]+)['"]"#
            ))?,
        },
        MatcherSpec::SqlInjection { call, placeholder } => Matcher::SqlInjection {
            call: build(&call)?,
            placeholder: build(&placeholder)?,
        },
        MatcherSpec::CommandInjection { call } => Matcher::CommandInjection {
            call: build(&call)?,
        },
        MatcherSpec::TaintedCall {
            call,
            source,
            sanitizer,
            window,
        } => Matcher::TaintedCall {
            call: build(&call)?,
            source: build(&source)?,
            sanitizer: build(&sanitizer)?,
            window,
        },
        MatcherSpec::UnsafeLoad { call, trusted } => Matcher::UnsafeLoad {
            call: build(&call)?,
            trusted: build(&trusted)?,
        },
        MatcherSpec::XmlParser {
            call,
            hardened,
            window,
        } => Matcher::XmlParser {
            call: build(&call)?,
            hardened: build(&hardened)?,
            window,
        },
        MatcherSpec::ProximityPattern {
            call,
            context,
            window,
        } => Matcher::ProximityPattern {
            call: build(&call)?,
            context: build(&context)?,
            window,
        },
        MatcherSpec::SwallowedException => Matcher::SwallowedException,
        MatcherSpec::UnboundedGrowth => Matcher::UnboundedGrowth,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn minimal(id: &str, category: &str, pattern: &str) -> RuleDefinition {
        RuleDefinition {
            id: id.to_owned(),
            category: category.to_owned(),
            message: "test rule".to_owned(),
            severity: "high".to_owned(),
            confidence: 0.9,
            matcher: MatcherSpec::LinePattern {
                pattern: pattern.to_owned(),
            },
        }
    }

    #[test]
    fn test_builtin_catalog_loads_and_covers_every_category() {
        let registry = Registry::builtin().unwrap();
        for category in Category::ALL {
            assert!(
                registry.lookup(category).count() > 0,
                "no builtin rule for {}",
                category.as_str()
            );
        }
    }

    #[test]
    fn test_invalid_pattern_fails_load_with_rule_id() {
        let err = Registry::load(vec![minimal("BAD-1", "hardcoded-secret", "([unclosed")])
            .unwrap_err();
        match err {
            ScanError::RuleDefinition { rule_id, reason } => {
                assert_eq!(rule_id, "BAD-1");
                assert!(reason.contains("invalid pattern"), "reason: {reason}");
            }
            other => panic!("expected RuleDefinition error, got {other}"),
        }
    }

    #[test]
    fn test_unknown_category_fails_load() {
        let err = Registry::load(vec![minimal("BAD-2", "logic-error", "x")]).unwrap_err();
        assert!(matches!(err, ScanError::RuleDefinition { .. }));
    }

    #[test]
    fn test_confidence_out_of_range_fails_load() {
        let mut definition = minimal("BAD-3", "weak-crypto", "x");
        definition.confidence = 1.5;
        let err = Registry::load(vec![definition]).unwrap_err();
        assert!(matches!(err, ScanError::RuleDefinition { .. }));
    }

    #[test]
    fn test_duplicate_id_fails_load() {
        let err = Registry::load(vec![
            minimal("DUP-1", "weak-crypto", "a"),
            minimal("DUP-1", "weak-crypto", "b"),
        ])
        .unwrap_err();
        assert!(matches!(err, ScanError::RuleDefinition { .. }));
    }

    #[test]
    fn test_lookup_by_category_and_id() {
        let registry = Registry::builtin().unwrap();
        let aws = registry.get("VGL-S101").unwrap();
        assert_eq!(aws.category, Category::HardcodedSecret);
        assert_eq!(aws.default_severity, Severity::High);
        assert!(registry
            .lookup(Category::HardcodedSecret)
            .any(|rule| rule.id == "VGL-S101"));
        assert!(registry.get("VGL-NOPE").is_none());
    }

    #[test]
    fn test_case_insensitive_catalog_patterns_match_uppercase_input() {
        let registry = Registry::builtin().unwrap();
        let rule = registry.get("VGL-C101").unwrap();
        match &rule.matcher {
            Matcher::LinePattern { pattern } => {
                assert!(pattern.is_match("digest = HASHLIB.MD5(data)"));
            }
            other => panic!("expected line pattern, got {other:?}"),
        }
    }

    #[test]
    fn test_severity_escalation_saturates() {
        assert_eq!(Severity::Medium.escalate(), Severity::High);
        assert_eq!(Severity::Critical.escalate(), Severity::Critical);
    }
}
