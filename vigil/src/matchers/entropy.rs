//! Shannon entropy and the guards that keep it from flagging every blob.

use rustc_hash::FxHashMap;

/// Shannon entropy of a string in bits per character.
#[must_use]
pub fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut counts: FxHashMap<char, usize> = FxHashMap::default();
    for c in s.chars() {
        *counts.entry(c).or_insert(0) += 1;
    }

    let len = s.chars().count() as f64;
    counts
        .values()
        .map(|&count| {
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Guards against well-known high-entropy non-secrets. Returns true when the
/// candidate should be skipped before the threshold is even consulted.
#[must_use]
pub fn is_entropy_exempt(s: &str) -> bool {
    // High-entropy secrets almost never contain several spaces; natural
    // language and SQL fragments do.
    if s.chars().filter(|&c| c == ' ').count() >= 3 {
        return true;
    }
    // Long pure-base64 blobs are usually payload data, not credentials.
    if s.len() > 64
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '/' || c == '=')
        && (s.ends_with('=') || s.contains('+') || s.contains('/'))
    {
        return true;
    }
    // Very long hex strings are hashes or binary dumps.
    if s.len() > 128 && s.chars().all(|c| c.is_ascii_hexdigit()) {
        return true;
    }
    // UUID shape.
    if s.len() == 36 && s.chars().filter(|&c| c == '-').count() == 4 {
        return true;
    }
    looks_like_path_or_url(s)
}

fn looks_like_path_or_url(s: &str) -> bool {
    if s.starts_with("data:")
        || s.starts_with("http://")
        || s.starts_with("https://")
        || s.starts_with("ftp://")
    {
        return true;
    }
    if s.contains('/') && (s.starts_with('/') || s.starts_with('.') || s.starts_with('~')) {
        return true;
    }
    // Windows drive paths.
    if s.contains('\\') && s.len() > 2 && s.chars().nth(1) == Some(':') {
        return true;
    }
    // Dotted package paths like "com.example.service".
    s.chars().filter(|&c| c == '.').count() >= 2 && !s.contains(' ')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entropy_of_uniform_string_is_zero() {
        assert!(shannon_entropy("aaaaaaaa") < f64::EPSILON);
    }

    #[test]
    fn test_entropy_of_empty_string_is_zero() {
        assert!(shannon_entropy("") < f64::EPSILON);
    }

    #[test]
    fn test_random_key_clears_threshold() {
        let entropy = shannon_entropy("wJalrXUtnFEMI/K7MDENG/bPxRfiCYEXAMPLEKEY");
        assert!(entropy >= 3.5, "entropy was {entropy}");
    }

    #[test]
    fn test_low_entropy_password_stays_below_threshold() {
        let entropy = shannon_entropy("admin123");
        assert!(entropy < 3.5, "entropy was {entropy}");
    }

    #[test]
    fn test_urls_and_paths_are_exempt() {
        assert!(is_entropy_exempt("https://example.com/a/b?q=Zm9vYmFy"));
        assert!(is_entropy_exempt("/usr/local/lib/libfoo.so.1.2"));
        assert!(is_entropy_exempt("com.example.internal.service"));
    }

    #[test]
    fn test_sentences_are_exempt() {
        assert!(is_entropy_exempt("the quick brown fox jumps over it"));
    }

    #[test]
    fn test_uuid_is_exempt() {
        assert!(is_entropy_exempt("f47ac10b-58cc-4372-a567-0e02b2c3d479"));
    }

    #[test]
    fn test_secret_material_is_not_exempt() {
        assert!(!is_entropy_exempt("wJalrXUtnFEMI7K7MDENGbPxRfiCYEXAMPLEKEY"));
    }
}
