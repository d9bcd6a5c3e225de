//! Builtin rule catalog.
//!
//! The engine only ever consumes a parsed in-memory definition list; this
//! module is the default list a driving CLI loads when no external rule
//! source is supplied. Custom patterns from configuration are appended to
//! these before [`super::Registry::load`].

use super::types::{MatcherSpec, RuleDefinition};

fn def(
    id: &str,
    category: &str,
    severity: &str,
    confidence: f64,
    message: &str,
    matcher: MatcherSpec,
) -> RuleDefinition {
    RuleDefinition {
        id: id.to_owned(),
        category: category.to_owned(),
        message: message.to_owned(),
        severity: severity.to_owned(),
        confidence,
        matcher,
    }
}

fn pattern(
    id: &str,
    category: &str,
    severity: &str,
    confidence: f64,
    message: &str,
    regex: &str,
) -> RuleDefinition {
    def(
        id,
        category,
        severity,
        confidence,
        message,
        MatcherSpec::LinePattern {
            pattern: regex.to_owned(),
        },
    )
}

/// Returns the builtin rule definitions covering all eleven categories.
#[must_use]
pub fn builtin_definitions() -> Vec<RuleDefinition> {
    vec![
        // --- hardcoded-secret: credential shapes (one sub-rule per shape) ---
        pattern(
            "VGL-S101",
            "hardcoded-secret",
            "high",
            0.9,
            "AWS access key ID",
            r"\bAKIA[0-9A-Z]{16}\b",
        ),
        pattern(
            "VGL-S102",
            "hardcoded-secret",
            "critical",
            0.9,
            "AWS secret access key",
            r#"(?i)aws[a-z_]{0,20}\s*[:=]\s*['"][A-Za-z0-9/+=]{40}['"]"#,
        ),
        pattern(
            "VGL-S103",
            "hardcoded-secret",
            "high",
            0.9,
            "Credential assigned to a secret-bearing identifier",
            r#"(?i)(api_?key|secret|token|passwd|password)\w*\s*[:=]\s*['"][A-Za-z0-9_/+=.\-]{20,}['"]"#,
        ),
        pattern(
            "VGL-S104",
            "hardcoded-secret",
            "critical",
            0.9,
            "GitHub personal access token",
            r"\bgh[pousr]_[A-Za-z0-9]{36}\b",
        ),
        pattern(
            "VGL-S105",
            "hardcoded-secret",
            "critical",
            0.9,
            "Stripe live secret key",
            r"\bsk_live_[A-Za-z0-9]{20,}\b",
        ),
        pattern(
            "VGL-S106",
            "hardcoded-secret",
            "high",
            0.9,
            "Secret key material (sk- prefix)",
            r"\bsk-[A-Za-z0-9_\-]{20,}\b",
        ),
        pattern(
            "VGL-S107",
            "hardcoded-secret",
            "high",
            0.9,
            "URL with embedded credentials",
            r"[a-z][a-z0-9+.\-]*://[^/\s:@'\x22]+:[^/\s@'\x22]+@[^\s'\x22]+",
        ),
        pattern(
            "VGL-S108",
            "hardcoded-secret",
            "high",
            0.9,
            "Slack webhook URL",
            r"https://hooks\.slack\.com/services/[A-Za-z0-9/]+",
        ),
        // --- hardcoded-secret: heuristic sub-rules ---
        def(
            "VGL-S200",
            "hardcoded-secret",
            "medium",
            0.5,
            "High-entropy string literal in an assignment",
            MatcherSpec::Entropy {
                threshold: 3.5,
                min_length: 16,
            },
        ),
        def(
            "VGL-S201",
            "hardcoded-secret",
            "medium",
            0.5,
            "Literal assigned to a sensitive identifier",
            MatcherSpec::SensitiveAssignment {
                names: "password|passwd|pwd|secret|api_?key|token|auth".to_owned(),
            },
        ),
        // --- injections ---
        def(
            "VGL-I101",
            "injection-sql",
            "high",
            0.85,
            "SQL statement built by string formatting reaches a query call without parameterization",
            MatcherSpec::SqlInjection {
                call: r"(?i)\b(execute|executemany|executescript|raw|query)\s*\(".to_owned(),
                placeholder: r"\?|%\(\w+\)s|(?::\w+\b)".to_owned(),
            },
        ),
        def(
            "VGL-I102",
            "injection-command",
            "high",
            0.85,
            "Shell command built from interpolated input",
            MatcherSpec::CommandInjection {
                call: r"(?i)\b(os\.system|os\.popen|subprocess\.(call|run|Popen|check_output|check_call)|commands\.getoutput)\s*\("
                    .to_owned(),
            },
        ),
        // --- tainted sinks ---
        def(
            "VGL-P101",
            "path-traversal",
            "high",
            0.75,
            "File opened from unsanitized external input with no containment check",
            MatcherSpec::TaintedCall {
                call: r"\b(open|io\.open|codecs\.open)\s*\(".to_owned(),
                source: r"(?i)(request\.(args|form|values|json|GET|POST|files)|input\s*\(|sys\.argv|os\.environ|params\[)"
                    .to_owned(),
                sanitizer: r"(?i)(realpath|abspath|canonical|secure_filename|\bbasename\b|startswith\s*\(|\.resolve\s*\()"
                    .to_owned(),
                window: 10,
            },
        ),
        def(
            "VGL-N101",
            "ssrf",
            "high",
            0.75,
            "Outbound request target derives from unsanitized external input",
            MatcherSpec::TaintedCall {
                call: r"(?i)\b(requests\.(get|post|put|delete|head|request)|urllib\.request\.urlopen|urlopen|httpx\.(get|post|request))\s*\("
                    .to_owned(),
                source: r"(?i)(request\.(args|form|values|json|GET|POST)|input\s*\(|sys\.argv|os\.environ|params\[)"
                    .to_owned(),
                sanitizer: r"(?i)(allow[_\-]?list|allowed_(hosts|domains|urls)|urlparse\s*\(|startswith\s*\()"
                    .to_owned(),
                window: 10,
            },
        ),
        // --- deserialization / xml ---
        def(
            "VGL-D101",
            "insecure-deserialization",
            "high",
            0.8,
            "Unsafe deserialization primitive on untrusted data",
            MatcherSpec::UnsafeLoad {
                call: r"(?i)\b(pickle\.loads?|marshal\.loads?|shelve\.open|yaml\.load|jsonpickle\.decode|dill\.loads?)\s*\("
                    .to_owned(),
                trusted: r"(?i)(Loader\s*=\s*yaml\.(Safe|Base)Loader|trusted|local_only)".to_owned(),
            },
        ),
        def(
            "VGL-X101",
            "xxe",
            "high",
            0.8,
            "XML parsed without disabling external entity resolution",
            MatcherSpec::XmlParser {
                call: r"(?i)\b(etree\.(fromstring|parse|XML)|ElementTree\.(fromstring|parse)|ET\.(fromstring|parse)|minidom\.parse(String)?|sax\.parse|xmlrpc)"
                    .to_owned(),
                hardened: r"(?i)(defusedxml|resolve_entities\s*=\s*False|no_network\s*=\s*True|forbid_dtd|FEATURE_SECURE_PROCESSING|disallow-doctype-decl)"
                    .to_owned(),
                window: 5,
            },
        ),
        // --- weak crypto ---
        pattern(
            "VGL-C101",
            "weak-crypto",
            "medium",
            0.8,
            "Use of broken MD5 hash",
            r#"(?i)\b(hashlib\.md5|md5\.new|Digest::MD5|MessageDigest\.getInstance\(\s*['"]MD5|hashlib\.new\(\s*['"](md4|md5))"#,
        ),
        pattern(
            "VGL-C102",
            "weak-crypto",
            "medium",
            0.7,
            "Use of SHA1 in a security context",
            r#"(?i)\b(hashlib\.sha1|sha1\.new|Digest::SHA1|MessageDigest\.getInstance\(\s*['"]SHA-?1|hashlib\.new\(\s*['"]sha1)"#,
        ),
        pattern(
            "VGL-C103",
            "weak-crypto",
            "high",
            0.8,
            "Use of broken cipher (DES/RC4)",
            r#"(?i)\b(DES\.new|Cipher\.DES|Cipher\.ARC4|ARC4\.new|algorithms\.(ARC4|TripleDES|Blowfish)|createCipheriv\(\s*['"](des|rc4))"#,
        ),
        // --- insecure randomness ---
        def(
            "VGL-C110",
            "insecure-randomness",
            "medium",
            0.7,
            "Non-cryptographic random source feeding a security-sensitive value",
            MatcherSpec::ProximityPattern {
                call: r"(?i)\b(random\.(random|randint|randrange|choice|choices|getrandbits|sample|uniform|randbytes)|Math\.random|\brand\(\))"
                    .to_owned(),
                context: r"(?i)(token|secret|key|password|nonce|session)".to_owned(),
                window: 3,
            },
        ),
        // --- hygiene ---
        def(
            "VGL-H101",
            "exception-swallowing",
            "low",
            0.8,
            "Catch-all exception handler discards the error",
            MatcherSpec::SwallowedException,
        ),
        def(
            "VGL-H102",
            "resource-leak",
            "medium",
            0.6,
            "Unbounded accumulation into a module-lifetime container",
            MatcherSpec::UnboundedGrowth,
        ),
    ]
}
