use crate::engine::AllowRule;
use crate::errors::ScanError;
use crate::registry::{builtin_definitions, MatcherSpec, RuleDefinition};
use compact_str::CompactString;
use globset::Glob;
use serde::Deserialize;
use std::path::PathBuf;

/// Root configuration, as parsed from `.vigil.toml`.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    /// Scan defaults overridable on the command line.
    #[serde(default)]
    pub scan: ScanConfig,
    /// Secret-detection tuning.
    #[serde(default)]
    pub secrets: SecretsConfig,
    /// Custom line-pattern rules appended to the builtin catalog.
    #[serde(default)]
    pub rules: Vec<CustomRule>,
    /// Allow-list entries silencing rules for matching units.
    #[serde(default)]
    pub allow: Vec<AllowEntry>,
    /// Where the configuration was loaded from, if anywhere.
    #[serde(skip)]
    pub config_file_path: Option<PathBuf>,
}

/// `[scan]` section: defaults for the scan invocation.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct ScanConfig {
    /// Folder names excluded from the walk, in addition to gitignore rules.
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Worker threads (0 = rayon default).
    pub jobs: Option<usize>,
    /// Lowest severity that makes the exit code nonzero.
    pub fail_level: Option<String>,
    /// Default report format (`json` or `text`).
    pub format: Option<String>,
    /// Wall-clock budget for the whole scan, in milliseconds.
    pub deadline_ms: Option<u64>,
}

/// `[secrets]` section: entropy detection tuning.
#[derive(Debug, Deserialize, Clone)]
pub struct SecretsConfig {
    /// Minimum Shannon entropy (bits/char) for the high-entropy rule.
    #[serde(default = "default_entropy_threshold")]
    pub entropy_threshold: f64,
    /// Minimum literal length to consider for entropy scanning.
    #[serde(default = "default_min_length")]
    pub min_length: usize,
}

fn default_entropy_threshold() -> f64 {
    3.5
}

fn default_min_length() -> usize {
    16
}

impl Default for SecretsConfig {
    fn default() -> Self {
        Self {
            entropy_threshold: default_entropy_threshold(),
            min_length: default_min_length(),
        }
    }
}

/// A custom line-pattern rule defined in TOML configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct CustomRule {
    /// Stable rule identifier. Must not collide with builtin ids.
    pub id: String,
    /// Canonical category name (kebab-case).
    pub category: String,
    /// Message attached to findings.
    pub message: String,
    /// Lowercase severity name.
    #[serde(default = "default_severity")]
    pub severity: String,
    /// Confidence weight in `0.0..=1.0`.
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    /// Regular expression applied per line.
    pub pattern: String,
}

fn default_severity() -> String {
    "high".to_owned()
}

fn default_confidence() -> f64 {
    0.8
}

/// An `[[allow]]` entry: silences rules for units matching a glob.
#[derive(Debug, Deserialize, Clone)]
pub struct AllowEntry {
    /// Glob over unit identifiers.
    pub units: String,
    /// Rule ids to silence; empty silences every rule.
    #[serde(default)]
    pub rules: Vec<String>,
}

impl Config {
    /// The full definition list for this configuration: the builtin catalog
    /// with entropy tuning applied, followed by the custom rules.
    #[must_use]
    pub fn rule_definitions(&self) -> Vec<RuleDefinition> {
        let mut definitions = builtin_definitions();
        for definition in &mut definitions {
            if let MatcherSpec::Entropy {
                threshold,
                min_length,
            } = &mut definition.matcher
            {
                *threshold = self.secrets.entropy_threshold;
                *min_length = self.secrets.min_length;
            }
        }
        definitions.extend(self.rules.iter().map(|rule| RuleDefinition {
            id: rule.id.clone(),
            category: rule.category.clone(),
            message: rule.message.clone(),
            severity: rule.severity.clone(),
            confidence: rule.confidence,
            matcher: MatcherSpec::LinePattern {
                pattern: rule.pattern.clone(),
            },
        }));
        definitions
    }

    /// Compiles the allow-list into matchers for the engine.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Config`] when a unit glob does not parse.
    pub fn compiled_allow(&self) -> Result<Vec<AllowRule>, ScanError> {
        self.allow
            .iter()
            .map(|entry| {
                let glob = Glob::new(&entry.units).map_err(|err| {
                    ScanError::Config(format!("invalid allow glob `{}`: {err}", entry.units))
                })?;
                Ok(AllowRule {
                    unit_glob: glob.compile_matcher(),
                    all_rules: entry.rules.is_empty(),
                    rule_ids: entry
                        .rules
                        .iter()
                        .map(|id| CompactString::from(id.as_str()))
                        .collect(),
                })
            })
            .collect()
    }
}
