//! Strongly typed rule metadata and matcher variants.

use compact_str::CompactString;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Canonical category for a rule. Closed enum; unknown names fail registry
/// load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// Hardcoded credentials and secrets.
    HardcodedSecret,
    /// SQL built by string formatting reaching a query call.
    InjectionSql,
    /// Shell commands built from interpolated input.
    InjectionCommand,
    /// File access on unsanitized external paths.
    PathTraversal,
    /// Unsafe deserialization primitives on untrusted data.
    InsecureDeserialization,
    /// Known-broken hash or cipher primitives.
    WeakCrypto,
    /// Non-cryptographic randomness feeding security-sensitive values.
    InsecureRandomness,
    /// Outbound requests to unsanitized external targets.
    Ssrf,
    /// XML parsing with external entity resolution left enabled.
    Xxe,
    /// Catch-all handlers that discard the error.
    ExceptionSwallowing,
    /// Unbounded accumulation into process-lifetime containers.
    ResourceLeak,
}

impl Category {
    /// All categories, in declaration order.
    pub const ALL: [Category; 11] = [
        Category::HardcodedSecret,
        Category::InjectionSql,
        Category::InjectionCommand,
        Category::PathTraversal,
        Category::InsecureDeserialization,
        Category::WeakCrypto,
        Category::InsecureRandomness,
        Category::Ssrf,
        Category::Xxe,
        Category::ExceptionSwallowing,
        Category::ResourceLeak,
    ];

    /// Returns the canonical kebab-case name for this category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Category::HardcodedSecret => "hardcoded-secret",
            Category::InjectionSql => "injection-sql",
            Category::InjectionCommand => "injection-command",
            Category::PathTraversal => "path-traversal",
            Category::InsecureDeserialization => "insecure-deserialization",
            Category::WeakCrypto => "weak-crypto",
            Category::InsecureRandomness => "insecure-randomness",
            Category::Ssrf => "ssrf",
            Category::Xxe => "xxe",
            Category::ExceptionSwallowing => "exception-swallowing",
            Category::ResourceLeak => "resource-leak",
        }
    }

    /// Parses a canonical category name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Category::ALL.into_iter().find(|c| c.as_str() == name)
    }

    /// Whether a high-confidence finding in this category escalates its
    /// severity by one level.
    #[must_use]
    pub const fn escalates_on_high_confidence(self) -> bool {
        matches!(
            self,
            Category::HardcodedSecret
                | Category::InjectionSql
                | Category::InjectionCommand
                | Category::InsecureDeserialization
        )
    }
}

/// Severity of a rule or finding. `Ord` ranks `Info` lowest and `Critical`
/// highest.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational.
    Info,
    /// Low severity.
    Low,
    /// Medium severity.
    Medium,
    /// High severity.
    High,
    /// Highest severity.
    Critical,
}

impl Severity {
    /// Returns the canonical display form for this severity.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
        }
    }

    /// Parses a lowercase severity name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "info" => Some(Severity::Info),
            "low" => Some(Severity::Low),
            "medium" => Some(Severity::Medium),
            "high" => Some(Severity::High),
            "critical" => Some(Severity::Critical),
            _ => None,
        }
    }

    /// One level up; `Critical` saturates.
    #[must_use]
    pub const fn escalate(self) -> Self {
        match self {
            Severity::Info => Severity::Low,
            Severity::Low => Severity::Medium,
            Severity::Medium => Severity::High,
            Severity::High | Severity::Critical => Severity::Critical,
        }
    }
}

/// Declarative matcher description, one closed variant per matching strategy.
///
/// Raw pattern strings are compiled at registry load; compilation failures
/// surface as [`crate::errors::ScanError::RuleDefinition`].
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum MatcherSpec {
    /// A plain regex applied to every line.
    LinePattern {
        /// Pattern to search for on each line.
        pattern: String,
    },
    /// Shannon-entropy check on assigned string literals.
    Entropy {
        /// Minimum bits/char to flag.
        threshold: f64,
        /// Minimum literal length to consider.
        min_length: usize,
    },
    /// Assignment of a short literal to a sensitive identifier name.
    SensitiveAssignment {
        /// Alternation of suspicious identifier stems.
        names: String,
    },
    /// Dynamic SQL reaching a query-execution call with no parameterization.
    SqlInjection {
        /// Query-execution call sites.
        call: String,
        /// Parameterization markers that clear the statement.
        placeholder: String,
    },
    /// Shell invocation whose command is built by interpolation.
    CommandInjection {
        /// Shell-invocation call sites.
        call: String,
    },
    /// A sink call fed by unsanitized external input (path traversal, SSRF).
    TaintedCall {
        /// Sink call sites.
        call: String,
        /// External-input source markers.
        source: String,
        /// Sanitizer/containment markers that clear the call.
        sanitizer: String,
        /// Lines to search around the call for sources and sanitizers.
        window: usize,
    },
    /// Unsafe deserialization primitive on non-literal data.
    UnsafeLoad {
        /// Deserialization call sites.
        call: String,
        /// Markers proving the data is from a trusted/local source.
        trusted: String,
    },
    /// XML parser invocation without hardened configuration nearby.
    XmlParser {
        /// XML-parsing call sites.
        call: String,
        /// Configuration markers that disable external entities.
        hardened: String,
        /// Lines to search around the call for hardening.
        window: usize,
    },
    /// A call flagged only when a context word appears nearby
    /// (insecure randomness near `token`/`secret`/... identifiers).
    ProximityPattern {
        /// Call sites to inspect.
        call: String,
        /// Context words that make the call security-sensitive.
        context: String,
        /// Lines to search around the call for context.
        window: usize,
    },
    /// Catch-all exception handler with an empty body.
    SwallowedException,
    /// Unbounded growth of a module-lifetime container.
    UnboundedGrowth,
}

/// Declarative rule definition as supplied by an external collaborator
/// (builtin catalog or parsed config).
#[derive(Debug, Clone, Deserialize)]
pub struct RuleDefinition {
    /// Stable rule identifier (for example `VGL-S101`).
    pub id: String,
    /// Canonical category name (kebab-case).
    pub category: String,
    /// Human-readable message attached to findings.
    pub message: String,
    /// Lowercase default severity name.
    pub severity: String,
    /// Confidence weight in `0.0..=1.0`.
    pub confidence: f64,
    /// Matching strategy.
    pub matcher: MatcherSpec,
}

/// A compiled matcher, mirroring [`MatcherSpec`] with ready-to-run regexes.
#[derive(Debug)]
pub enum Matcher {
    /// See [`MatcherSpec::LinePattern`].
    LinePattern {
        /// Compiled line pattern.
        pattern: Regex,
    },
    /// See [`MatcherSpec::Entropy`].
    Entropy {
        /// Minimum bits/char to flag.
        threshold: f64,
        /// Minimum literal length to consider.
        min_length: usize,
    },
    /// See [`MatcherSpec::SensitiveAssignment`].
    SensitiveAssignment {
        /// Compiled assignment pattern; capture group 1 is the literal value.
        pattern: Regex,
    },
    /// See [`MatcherSpec::SqlInjection`].
    SqlInjection {
        /// Compiled call pattern.
        call: Regex,
        /// Compiled parameterization-marker pattern.
        placeholder: Regex,
    },
    /// See [`MatcherSpec::CommandInjection`].
    CommandInjection {
        /// Compiled call pattern.
        call: Regex,
    },
    /// See [`MatcherSpec::TaintedCall`].
    TaintedCall {
        /// Compiled sink pattern.
        call: Regex,
        /// Compiled source pattern.
        source: Regex,
        /// Compiled sanitizer pattern.
        sanitizer: Regex,
        /// Search window in lines.
        window: usize,
    },
    /// See [`MatcherSpec::UnsafeLoad`].
    UnsafeLoad {
        /// Compiled call pattern.
        call: Regex,
        /// Compiled trusted-source pattern.
        trusted: Regex,
    },
    /// See [`MatcherSpec::XmlParser`].
    XmlParser {
        /// Compiled call pattern.
        call: Regex,
        /// Compiled hardening pattern.
        hardened: Regex,
        /// Search window in lines.
        window: usize,
    },
    /// See [`MatcherSpec::ProximityPattern`].
    ProximityPattern {
        /// Compiled call pattern.
        call: Regex,
        /// Compiled context pattern.
        context: Regex,
        /// Search window in lines.
        window: usize,
    },
    /// See [`MatcherSpec::SwallowedException`].
    SwallowedException,
    /// See [`MatcherSpec::UnboundedGrowth`].
    UnboundedGrowth,
}

/// A compiled, immutable detection rule.
#[derive(Debug)]
pub struct Rule {
    /// Stable rule identifier.
    pub id: CompactString,
    /// Rule category.
    pub category: Category,
    /// Message attached to findings from this rule.
    pub message: String,
    /// Default severity before escalation.
    pub default_severity: Severity,
    /// Confidence weight in `0.0..=1.0`.
    pub confidence_weight: f64,
    /// Compiled matching strategy.
    pub matcher: Matcher,
}
