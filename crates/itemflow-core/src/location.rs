//! Location descriptors: a raw address string plus its scheme.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Addressing scheme of a location, decided by string prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    Unknown,
    File,
    Http,
    Https,
    Bundle,
}

/// Prefixes in priority order; the first match wins.
const SCHEME_PREFIXES: [(&str, Scheme); 4] = [
    ("file://", Scheme::File),
    ("http://", Scheme::Http),
    ("https://", Scheme::Https),
    ("bundle://", Scheme::Bundle),
];

impl Scheme {
    /// The prefix that selects this scheme, if any.
    pub fn prefix(self) -> Option<&'static str> {
        SCHEME_PREFIXES
            .iter()
            .find(|(_, scheme)| *scheme == self)
            .map(|(prefix, _)| *prefix)
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Scheme::Unknown => "unknown",
            Scheme::File => "file",
            Scheme::Http => "http",
            Scheme::Https => "https",
            Scheme::Bundle => "bundle",
        };
        f.write_str(name)
    }
}

/// An immutable, classified location string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    raw: String,
    scheme: Scheme,
}

impl Location {
    /// Classify a raw location string. Never fails: anything without a known
    /// prefix (including the empty string) is `Scheme::Unknown`.
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let scheme = SCHEME_PREFIXES
            .iter()
            .find(|(prefix, _)| raw.starts_with(prefix))
            .map(|(_, scheme)| *scheme)
            .unwrap_or(Scheme::Unknown);
        Self { raw, scheme }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// The part after the scheme prefix. For `Unknown` this is the raw string.
    pub fn path(&self) -> &str {
        match self.scheme.prefix() {
            Some(prefix) => &self.raw[prefix.len()..],
            None => &self.raw,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<&str> for Location {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_schemes() {
        assert_eq!(Location::parse("file://a").scheme(), Scheme::File);
        assert_eq!(Location::parse("http://a").scheme(), Scheme::Http);
        assert_eq!(Location::parse("bundle://a").scheme(), Scheme::Bundle);
    }

    #[test]
    fn test_https_not_misclassified_as_http() {
        assert_eq!(Location::parse("https://a").scheme(), Scheme::Https);
    }

    #[test]
    fn test_unknown_schemes() {
        assert_eq!(Location::parse("ftp://a").scheme(), Scheme::Unknown);
        assert_eq!(Location::parse("").scheme(), Scheme::Unknown);
        assert_eq!(Location::parse("/tmp/a.json").scheme(), Scheme::Unknown);
        // Prefix match is case-sensitive
        assert_eq!(Location::parse("FILE://a").scheme(), Scheme::Unknown);
        // Prefix must sit at position zero
        assert_eq!(Location::parse(" file://a").scheme(), Scheme::Unknown);
    }

    #[test]
    fn test_parse_is_deterministic() {
        let a = Location::parse("bundle://x/y.json");
        let b = Location::parse("bundle://x/y.json");
        assert_eq!(a, b);
    }

    #[test]
    fn test_path_strips_prefix() {
        assert_eq!(Location::parse("file://test.json").path(), "test.json");
        assert_eq!(Location::parse("bundle://a/b.zip").path(), "a/b.zip");
        assert_eq!(Location::parse("plain").path(), "plain");
        assert_eq!(Location::parse("file://").path(), "");
    }

    #[test]
    fn test_raw_preserved() {
        let location = Location::parse("https://example.com/x");
        assert_eq!(location.raw(), "https://example.com/x");
        assert_eq!(location.to_string(), "https://example.com/x");
    }
}
