//! Version tokens and specifiers for schema descriptors.
//!
//! Two numbering schemes coexist:
//!
//! - Generic pages use dotted numeric tokens ("1.4", "2.0") compared
//!   numerically, so "1.4-2.0" covers every revision in between.
//! - Letter-coded vendor tokens ("A05") order by the numeric suffix after
//!   the leading letter; "A05-A07" contains "A06".
//!
//! Tokens from different schemes never match each other.

use std::fmt;
use std::str::FromStr;

/// A single version token.
#[derive(Debug, Clone, PartialEq)]
pub enum VersionToken {
    /// Dotted numeric scheme, compared as a float ("1.4" < "2.0")
    Dotted(f64),
    /// Letter-coded vendor scheme; ordering uses only the numeric suffix
    Lettered {
        /// Original spelling, kept for file names and messages
        raw: String,
        /// Numeric suffix after the leading letter
        number: u32,
    },
}

impl VersionToken {
    /// Numeric rank within the token's own scheme.
    fn rank(&self) -> f64 {
        match self {
            VersionToken::Dotted(v) => *v,
            VersionToken::Lettered { number, .. } => f64::from(*number),
        }
    }

    /// Whether two tokens belong to the same numbering scheme.
    pub fn same_scheme(&self, other: &VersionToken) -> bool {
        matches!(
            (self, other),
            (VersionToken::Dotted(_), VersionToken::Dotted(_))
                | (VersionToken::Lettered { .. }, VersionToken::Lettered { .. })
        )
    }

    /// Scheme-aware equality: dotted tokens compare numerically, lettered
    /// tokens by suffix.
    pub fn matches(&self, other: &VersionToken) -> bool {
        self.same_scheme(other) && self.rank() == other.rank()
    }
}

impl FromStr for VersionToken {
    type Err = InvalidVersion;

    fn from_str(s: &str) -> Result<Self, InvalidVersion> {
        if let Ok(v) = s.parse::<f64>() {
            return Ok(VersionToken::Dotted(v));
        }
        let mut chars = s.chars();
        let Some(first) = chars.next() else {
            return Err(InvalidVersion(s.to_string()));
        };
        let suffix = chars.as_str();
        if first.is_ascii_alphabetic() && !suffix.is_empty() {
            if let Ok(number) = suffix.parse::<u32>() {
                return Ok(VersionToken::Lettered {
                    raw: s.to_string(),
                    number,
                });
            }
        }
        Err(InvalidVersion(s.to_string()))
    }
}

impl fmt::Display for VersionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionToken::Dotted(v) => {
                if v.fract() == 0.0 {
                    write!(f, "{:.1}", v)
                } else {
                    write!(f, "{}", v)
                }
            }
            VersionToken::Lettered { raw, .. } => f.write_str(raw),
        }
    }
}

/// A token that could not be parsed under either scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidVersion(pub String);

impl fmt::Display for InvalidVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognized version token {:?}", self.0)
    }
}

impl std::error::Error for InvalidVersion {}

/// Version coverage of one schema descriptor: a single token or an
/// inclusive "A-B" range.
#[derive(Debug, Clone, PartialEq)]
pub enum VersionSpec {
    /// Exactly one version
    Exact(VersionToken),
    /// Inclusive range, both bounds in the same scheme
    Range(VersionToken, VersionToken),
}

impl VersionSpec {
    /// Whether `requested` falls under this specifier.
    ///
    /// Range containment is inclusive on both bounds; a version one unit
    /// outside either bound does not match.
    pub fn contains(&self, requested: &VersionToken) -> bool {
        match self {
            VersionSpec::Exact(token) => token.matches(requested),
            VersionSpec::Range(first, last) => {
                first.same_scheme(requested)
                    && last.same_scheme(requested)
                    && first.rank() <= requested.rank()
                    && requested.rank() <= last.rank()
            }
        }
    }
}

impl FromStr for VersionSpec {
    type Err = InvalidVersion;

    fn from_str(s: &str) -> Result<Self, InvalidVersion> {
        match s.split_once('-') {
            Some((first, last)) => Ok(VersionSpec::Range(first.parse()?, last.parse()?)),
            None => Ok(VersionSpec::Exact(s.parse()?)),
        }
    }
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionSpec::Exact(token) => token.fmt(f),
            VersionSpec::Range(first, last) => write!(f, "{}-{}", first, last),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(s: &str) -> VersionToken {
        s.parse().unwrap()
    }

    fn spec(s: &str) -> VersionSpec {
        s.parse().unwrap()
    }

    #[test]
    fn parse_dotted_and_lettered() {
        assert_eq!(token("1.4"), VersionToken::Dotted(1.4));
        assert_eq!(
            token("A05"),
            VersionToken::Lettered {
                raw: "A05".to_string(),
                number: 5
            }
        );
        assert!("".parse::<VersionToken>().is_err());
        assert!("Axy".parse::<VersionToken>().is_err());
    }

    #[test]
    fn dotted_range_bounds_are_inclusive() {
        let range = spec("1.4-2.0");
        assert!(range.contains(&token("1.4")));
        assert!(range.contains(&token("1.6")));
        assert!(range.contains(&token("2.0")));
        assert!(!range.contains(&token("1.3")));
        assert!(!range.contains(&token("2.1")));
    }

    #[test]
    fn lettered_range_strips_the_letter() {
        let range = spec("A05-A07");
        assert!(range.contains(&token("A05")));
        assert!(range.contains(&token("A06")));
        assert!(range.contains(&token("A07")));
        assert!(!range.contains(&token("A04")));
        assert!(!range.contains(&token("A08")));
    }

    #[test]
    fn exact_matches_single_token_only() {
        let exact = spec("2.0");
        assert!(exact.contains(&token("2.0")));
        assert!(!exact.contains(&token("1.4")));
    }

    #[test]
    fn schemes_never_cross_match() {
        assert!(!spec("1.4-2.0").contains(&token("A05")));
        assert!(!spec("A05-A07").contains(&token("1.4")));
        assert!(!spec("A05").contains(&token("5")));
    }

    #[test]
    fn display_round_trips_file_name_form() {
        assert_eq!(spec("1.4-2.0").to_string(), "1.4-2.0");
        assert_eq!(spec("A05").to_string(), "A05");
        assert_eq!(spec("2.0").to_string(), "2.0");
    }
}
