//! Version helpers.
//!
//! Portable documents carry a `MAJOR.MINOR.PATCH` format version. Parsing is
//! strict (schema validation rejects anything else); comparison is lenient so
//! that it can be used on arbitrary strings without failing.

use std::cmp::Ordering;
use std::fmt;

use crate::errors::{DocportError, DocportResult};
use crate::CURRENT_VERSION;

/// A parsed format version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FormatVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl FormatVersion {
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parse a version string (e.g. "1.1.0").
    pub fn parse(s: &str) -> DocportResult<Self> {
        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() != 3 {
            return Err(DocportError::invalid_argument(format!(
                "invalid format version: {s} (expected MAJOR.MINOR.PATCH)"
            )));
        }

        let mut nums = [0u64; 3];
        for (slot, part) in nums.iter_mut().zip(parts.iter()) {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(DocportError::invalid_argument(format!(
                    "invalid format version: {s}"
                )));
            }
            *slot = part.parse().map_err(|_| {
                DocportError::invalid_argument(format!("invalid format version: {s}"))
            })?;
        }

        Ok(Self::new(nums[0], nums[1], nums[2]))
    }

    /// The version this build reads and writes.
    pub fn current() -> Self {
        // CURRENT_VERSION is a literal checked by `current_version_parses`.
        Self::parse(CURRENT_VERSION).unwrap_or(Self::new(0, 0, 0))
    }
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Compare two version strings segment by segment.
///
/// Non-numeric segments count as 0 and shorter versions are padded with 0,
/// so "1.1" == "1.1.0".
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let pa = segments(a);
    let pb = segments(b);
    let len = pa.len().max(pb.len());

    for i in 0..len {
        let x = pa.get(i).copied().unwrap_or(0);
        let y = pb.get(i).copied().unwrap_or(0);
        match x.cmp(&y) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

fn segments(v: &str) -> Vec<u64> {
    v.trim()
        .split('.')
        .map(|s| s.parse::<u64>().unwrap_or(0))
        .collect()
}

/// True iff `version` is not newer than `CURRENT_VERSION`.
pub fn is_version_compatible(version: &str) -> bool {
    compare_versions(version, CURRENT_VERSION) != Ordering::Greater
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_version_parses() {
        let v = FormatVersion::parse(CURRENT_VERSION).unwrap();
        assert_eq!(v, FormatVersion::current());
        assert_eq!(v.to_string(), CURRENT_VERSION);
    }

    #[test]
    fn parse_rejects_malformed() {
        for bad in ["", "1", "1.0", "1.0.0.0", "v1.0.0", "1.a.0", "1..0", "1.0.-1"] {
            assert!(FormatVersion::parse(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn compare_is_numeric_not_lexical() {
        assert_eq!(compare_versions("1.10.0", "1.9.0"), Ordering::Greater);
        assert_eq!(compare_versions("1.0.0", "1.0.1"), Ordering::Less);
        assert_eq!(compare_versions("2.0.0", "2.0.0"), Ordering::Equal);
    }

    #[test]
    fn compare_pads_missing_segments() {
        assert_eq!(compare_versions("1.1", "1.1.0"), Ordering::Equal);
        assert_eq!(compare_versions("1", "0.9.9"), Ordering::Greater);
    }

    #[test]
    fn compatibility_gate() {
        assert!(is_version_compatible(CURRENT_VERSION));
        assert!(is_version_compatible("1.0.0"));
        assert!(!is_version_compatible("99.0.0"));
        assert!(!is_version_compatible("1.1.1"));
    }
}
