#![allow(clippy::unwrap_used)]

use super::Config;
use crate::errors::ScanError;
use crate::registry::{MatcherSpec, Registry};
use std::fs;

#[test]
fn test_defaults_when_no_file_exists() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::load_from_path(dir.path()).unwrap();
    assert!(config.config_file_path.is_none());
    assert!((config.secrets.entropy_threshold - 3.5).abs() < f64::EPSILON);
    assert_eq!(config.secrets.min_length, 16);
    assert!(config.rules.is_empty());
    assert!(config.allow.is_empty());
}

#[test]
fn test_full_config_parses() {
    let content = r#"
[scan]
exclude = ["vendor"]
jobs = 2
fail_level = "high"
format = "json"
deadline_ms = 5000

[secrets]
entropy_threshold = 4.0
min_length = 24

[[rules]]
id = "VGL-U001"
category = "hardcoded-secret"
message = "Internal service token"
pattern = "\\bsvc_[a-z0-9]{24}\\b"

[[allow]]
units = "fixtures/**"

[[allow]]
units = "docs/*.py"
rules = ["VGL-S200", "VGL-S201"]
"#;
    let config: Config = toml::from_str(content).unwrap();
    assert_eq!(config.scan.exclude, vec!["vendor"]);
    assert_eq!(config.scan.jobs, Some(2));
    assert_eq!(config.scan.fail_level.as_deref(), Some("high"));
    assert_eq!(config.scan.deadline_ms, Some(5000));
    assert!((config.secrets.entropy_threshold - 4.0).abs() < f64::EPSILON);

    // Custom rule picks up the documented defaults.
    assert_eq!(config.rules.len(), 1);
    assert_eq!(config.rules[0].severity, "high");
    assert!((config.rules[0].confidence - 0.8).abs() < f64::EPSILON);

    let allow = config.compiled_allow().unwrap();
    assert_eq!(allow.len(), 2);
    assert!(allow[0].all_rules);
    assert!(!allow[1].all_rules);
    assert_eq!(allow[1].rule_ids.len(), 2);
}

#[test]
fn test_rule_definitions_apply_entropy_tuning_and_custom_rules() {
    let content = r#"
[secrets]
entropy_threshold = 5.0
min_length = 32

[[rules]]
id = "VGL-U001"
category = "weak-crypto"
message = "Legacy cipher wrapper"
pattern = "legacy_encrypt\\("
"#;
    let config: Config = toml::from_str(content).unwrap();
    let definitions = config.rule_definitions();

    let entropy = definitions
        .iter()
        .find_map(|d| match &d.matcher {
            MatcherSpec::Entropy {
                threshold,
                min_length,
            } => Some((*threshold, *min_length)),
            _ => None,
        })
        .unwrap();
    assert!((entropy.0 - 5.0).abs() < f64::EPSILON);
    assert_eq!(entropy.1, 32);

    // The whole list, custom rule included, compiles into a registry.
    let registry = Registry::load(definitions).unwrap();
    assert!(registry.get("VGL-U001").is_some());
}

#[test]
fn test_invalid_allow_glob_is_rejected() {
    let content = r#"
[[allow]]
units = "fixtures/[unclosed"
"#;
    let config: Config = toml::from_str(content).unwrap();
    assert!(config.compiled_allow().is_err());
}

#[test]
fn test_loader_walks_up_to_ancestor_config() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join(".vigil.toml"),
        "[secrets]\nentropy_threshold = 4.2\n",
    )
    .unwrap();
    let nested = dir.path().join("src").join("deep");
    fs::create_dir_all(&nested).unwrap();

    let config = Config::load_from_path(&nested).unwrap();
    assert!((config.secrets.entropy_threshold - 4.2).abs() < f64::EPSILON);
    assert_eq!(
        config.config_file_path.unwrap(),
        dir.path().join(".vigil.toml")
    );
}

#[test]
fn test_malformed_config_file_is_a_fatal_error() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(".vigil.toml"), "[scan\nexclude = [").unwrap();

    let err = Config::load_from_path(dir.path()).unwrap_err();
    match err {
        ScanError::Config(message) => {
            assert!(message.contains(".vigil.toml"), "message: {message}");
        }
        other => panic!("expected Config error, got {other}"),
    }
}
