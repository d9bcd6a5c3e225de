//! Window-based matchers for tainted sinks and unsafe parser/loader calls.
//!
//! These approximate data flow lexically: an identifier fed into a sink is
//! tainted when a nearby assignment pulls it from an external-input source,
//! and a sanitizer or hardening marker inside the window clears the call.

use super::CandidateHit;
use crate::registry::Rule;
use crate::source::{Line, SourceUnit};
use regex::Regex;
use std::sync::OnceLock;

#[allow(clippy::unwrap_used)]
fn ident_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[A-Za-z_]\w*").unwrap())
}

#[allow(clippy::unwrap_used)]
fn defused_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)defusedxml").unwrap())
}

/// Whether any line in `lines[lo..=hi]` matches `pattern`.
fn window_matches(lines: &[Line<'_>], lo: usize, hi: usize, pattern: &Regex) -> bool {
    lines[lo..=hi.min(lines.len() - 1)]
        .iter()
        .any(|line| pattern.is_match(line.text))
}

/// Identifiers referenced in a call-argument fragment, excluding string
/// literal contents. Only the first few matter for taint lookup.
fn argument_idents<'a>(fragment: &'a str) -> Vec<&'a str> {
    let mut idents = Vec::new();
    for segment in fragment.split(['"', '\'']).step_by(2) {
        for m in ident_re().find_iter(segment) {
            idents.push(m.as_str());
            if idents.len() >= 4 {
                return idents;
            }
        }
    }
    idents
}

/// Whether `name` is assigned from an external-input source within `window`
/// lines above `at` (index into `lines`).
fn assigned_from_source(
    lines: &[Line<'_>],
    at: usize,
    window: usize,
    name: &str,
    source: &Regex,
) -> bool {
    let lo = at.saturating_sub(window);
    lines[lo..at].iter().any(|line| {
        let trimmed = line.text.trim_start();
        trimmed.starts_with(name)
            && trimmed[name.len()..].trim_start().starts_with('=')
            && source.is_match(line.text)
    })
}

/// Flags sink calls (file opens, outbound requests) whose argument derives
/// from unsanitized external input with no containment check in the window.
pub(super) fn tainted_call_hits(
    unit: &SourceUnit,
    rule: &Rule,
    call: &Regex,
    source: &Regex,
    sanitizer: &Regex,
    window: usize,
) -> Vec<CandidateHit> {
    let lines: Vec<Line<'_>> = unit.lines().collect();
    let mut hits = Vec::new();

    for (idx, line) in lines.iter().enumerate() {
        for found in call.find_iter(line.text) {
            let argument = &line.text[found.end()..];
            let trimmed = argument.trim_start();
            // A plain literal argument is a fixed target.
            if (trimmed.starts_with('"') || trimmed.starts_with('\''))
                && !trimmed.contains('{')
                && !trimmed.contains('+')
            {
                continue;
            }

            let tainted = source.is_match(line.text)
                || argument_idents(argument)
                    .iter()
                    .any(|name| assigned_from_source(&lines, idx, window, name, source));
            if !tainted {
                continue;
            }

            let lo = idx.saturating_sub(window);
            if window_matches(&lines, lo, idx + window, sanitizer) {
                continue;
            }

            let matched = line.text[found.start()..].trim_end();
            hits.push(CandidateHit::spanning(
                rule,
                line,
                found.start()..found.start() + matched.len(),
                matched,
            ));
        }
    }
    hits
}

/// Flags unsafe deserialization calls on non-literal data with no
/// trusted-source marker in the statement.
pub(super) fn unsafe_load_hits(
    unit: &SourceUnit,
    rule: &Rule,
    call: &Regex,
    trusted: &Regex,
) -> Vec<CandidateHit> {
    let mut hits = Vec::new();
    for line in unit.lines() {
        for found in call.find_iter(line.text) {
            let argument = line.text[found.end()..].trim_start();
            // Literal payloads are local by construction.
            if argument.starts_with('"') || argument.starts_with('\'') {
                continue;
            }
            if trusted.is_match(line.text) {
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

/// Flags XML-parsing calls with no hardening marker in the window and no
/// defused parser in the unit.
pub(super) fn xml_parser_hits(
    unit: &SourceUnit,
    rule: &Rule,
    call: &Regex,
    hardened: &Regex,
    window: usize,
) -> Vec<CandidateHit> {
    if unit.lines().any(|line| defused_re().is_match(line.text)) {
        return Vec::new();
    }

    let lines: Vec<Line<'_>> = unit.lines().collect();
    let mut hits = Vec::new();
    for (idx, line) in lines.iter().enumerate() {
        for found in call.find_iter(line.text) {
            let lo = idx.saturating_sub(window);
            if window_matches(&lines, lo, idx + window, hardened) {
                continue;
            }
            let matched = line.text[found.start()..].trim_end();
            hits.push(CandidateHit::spanning(
                rule,
                line,
                found.start()..found.start() + matched.len(),
                matched,
            ));
        }
    }
    hits
}

/// Flags calls that become security-sensitive only near certain context
/// words (non-cryptographic randomness near `token`, `secret`, ...).
pub(super) fn proximity_hits(
    unit: &SourceUnit,
    rule: &Rule,
    call: &Regex,
    context: &Regex,
    window: usize,
) -> Vec<CandidateHit> {
    let lines: Vec<Line<'_>> = unit.lines().collect();
    let mut hits = Vec::new();
    for (idx, line) in lines.iter().enumerate() {
        for found in call.find_iter(line.text) {
            let lo = idx.saturating_sub(window);
            if !window_matches(&lines, lo, idx + window, context) {
                continue;
            }
            hits.push(CandidateHit::spanning(
                rule,
                line,
                found.range(),
                found.as_str(),
            ));
        }
    }
    hits
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::super::match_rule;
    use crate::registry::Registry;
    use crate::source::SourceUnit;

    fn hits_for(rule_id: &str, content: &str) -> usize {
        let registry = Registry::builtin().unwrap();
        let rule = registry.get(rule_id).unwrap();
        let unit = SourceUnit::from_text("test.py", content);
        match_rule(&unit, rule).len()
    }

    #[test]
    fn test_path_traversal_from_request_args() {
        let content = concat!(
            "filename = request.args.get('file')\n",
            "with open(filename, 'r') as f:\n",
            "    return f.read()\n",
        );
        assert_eq!(hits_for("VGL-P101", content), 1);
    }

    #[test]
    fn test_path_traversal_cleared_by_containment_check() {
        let content = concat!(
            "filename = request.args.get('file')\n",
            "safe = os.path.realpath(filename)\n",
            "with open(safe, 'r') as f:\n",
            "    return f.read()\n",
        );
        assert_eq!(hits_for("VGL-P101", content), 0);
    }

    #[test]
    fn test_fixed_path_open_is_clean() {
        assert_eq!(hits_for("VGL-P101", "with open('config.toml') as f:\n"), 0);
    }

    #[test]
    fn test_ssrf_from_request_args() {
        let content = concat!(
            "url = request.args.get('url')\n",
            "response = requests.get(url)\n",
        );
        assert_eq!(hits_for("VGL-N101", content), 1);
    }

    #[test]
    fn test_ssrf_cleared_by_allow_list() {
        let content = concat!(
            "url = request.args.get('url')\n",
            "if url.startswith(ALLOWED_PREFIX):\n",
            "    response = requests.get(url)\n",
        );
        assert_eq!(hits_for("VGL-N101", content), 0);
    }

    #[test]
    fn test_pickle_loads_on_variable_is_flagged() {
        assert_eq!(
            hits_for("VGL-D101", "return pickle.loads(session_data)\n"),
            1
        );
    }

    #[test]
    fn test_yaml_safe_loader_is_clean() {
        assert_eq!(
            hits_for("VGL-D101", "yaml.load(data, Loader=yaml.SafeLoader)\n"),
            0
        );
    }

    #[test]
    fn test_xml_fromstring_without_hardening_is_flagged() {
        assert_eq!(
            hits_for("VGL-X101", "root = ET.fromstring(xml_string)\n"),
            1
        );
    }

    #[test]
    fn test_defused_parser_suppresses_xxe() {
        let content = concat!(
            "import defusedxml.ElementTree as ET\n",
            "root = ET.fromstring(xml_string)\n",
        );
        assert_eq!(hits_for("VGL-X101", content), 0);
    }

    #[test]
    fn test_random_near_token_identifier_is_flagged() {
        let content = concat!(
            "def generate_token():\n",
            "    return random.randint(1000, 9999)\n",
        );
        assert_eq!(hits_for("VGL-C110", content), 1);
    }

    #[test]
    fn test_random_without_sensitive_context_is_clean() {
        let content = concat!(
            "def roll_dice():\n",
            "    return random.randint(1, 6)\n",
        );
        assert_eq!(hits_for("VGL-C110", content), 0);
    }
}
