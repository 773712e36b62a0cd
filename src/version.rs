//! Release version ordering.
//!
//! PyPI release keys follow PEP 440, which `semver` cannot represent
//! (`1.0`, `2.0rc1`, `1!3.0.post2`). Parsing and comparison come from
//! `pep440_rs`; strings it rejects still get a [`VersionKey`], which sorts
//! below every valid version.

use std::str::FromStr;

use pep440_rs::Version;

/// Sort key for an arbitrary release string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum VersionKey {
    /// Not a valid version; lower than anything that parses.
    Unparseable,
    Version(Version),
}

impl VersionKey {
    pub fn new(raw: &str) -> Self {
        Version::from_str(raw.trim()).map_or(VersionKey::Unparseable, VersionKey::Version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> VersionKey {
        let key = VersionKey::new(s);
        assert!(matches!(key, VersionKey::Version(_)), "{s} should parse");
        key
    }

    #[test]
    fn test_trailing_zeros_are_insignificant() {
        assert_eq!(key("1.0"), key("1.0.0"));
        assert!(key("1.0.1") > key("1.0"));
    }

    #[test]
    fn test_numeric_segments() {
        assert!(key("1.10") > key("1.9"));
        assert!(key("2.0") > key("1.99.99"));
    }

    #[test]
    fn test_release_phase_ordering() {
        let ordered = [
            "1.0.dev0", "1.0a1", "1.0a2", "1.0b1", "1.0rc1", "1.0", "1.0.post1", "1.1",
        ];
        for pair in ordered.windows(2) {
            assert!(key(pair[0]) < key(pair[1]), "{} < {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_epoch_and_local() {
        assert!(key("1!0.1") > key("99.0"));
        assert!(key("1.0+local") > key("1.0"));
        assert_eq!(key(" 1.0 "), key("1.0"));
    }

    #[test]
    fn test_rejects_invalid() {
        for bad in ["", "bad-version", "1.0.x", "latest"] {
            assert_eq!(VersionKey::new(bad), VersionKey::Unparseable, "{bad:?}");
        }
    }

    #[test]
    fn test_unparseable_sorts_lowest() {
        assert!(VersionKey::new("bad-version") < key("0"));
        assert!(VersionKey::new("bad-version") < key("0.0.dev0"));
        assert_eq!(VersionKey::new("nope"), VersionKey::new("also-nope"));
    }

    #[test]
    fn test_sorting_mixed_keys() {
        let mut keys = vec!["2.0", "bad-version", "10.0", "1.0rc1"];
        keys.sort_by_key(|k| std::cmp::Reverse(VersionKey::new(k)));
        assert_eq!(keys, vec!["10.0", "2.0", "1.0rc1", "bad-version"]);
    }
}
