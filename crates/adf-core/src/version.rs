//! Library and format versioning, plus common sampling periods.

use std::fmt;

/// A `major.minor.patch` library version.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Version {
    /// Incremented on incompatible wire changes.
    pub major: u8,
    /// Incremented on compatible additions.
    pub minor: u8,
    /// Incremented on fixes that leave the wire untouched.
    pub patch: u8,
}

impl Version {
    /// The format version stamped into headers: `major << 8 | minor`.
    ///
    /// Patch releases never change the wire, so they share a format version.
    pub const fn format_version(self) -> u16 {
        ((self.major as u16) << 8) | self.minor as u16
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// The version of this build.
pub const VERSION: Version = Version {
    major: 1,
    minor: 0,
    patch: 0,
};

/// The format version written to and required from every header.
pub const FORMAT_VERSION: u16 = VERSION.format_version();

/// The version of this build. Pure; usable as a capability probe.
pub fn version() -> Version {
    VERSION
}

/// One day, in seconds.
pub const DAY: u32 = 86_400;
/// One week, in seconds.
pub const WEEK: u32 = 7 * DAY;
/// A 28-day month, in seconds.
pub const MONTH_28: u32 = 28 * DAY;
/// A 29-day month, in seconds.
pub const MONTH_29: u32 = 29 * DAY;
/// A 30-day month, in seconds.
pub const MONTH_30: u32 = 30 * DAY;
/// A 31-day month, in seconds.
pub const MONTH_31: u32 = 31 * DAY;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_dotted_triple() {
        assert_eq!(version().to_string(), "1.0.0");
    }

    #[test]
    fn format_version_ignores_patch() {
        let a = Version {
            major: 1,
            minor: 2,
            patch: 0,
        };
        let b = Version { patch: 9, ..a };
        assert_eq!(a.format_version(), b.format_version());
        assert_eq!(a.format_version(), 0x0102);
    }

    #[test]
    fn period_constants() {
        assert_eq!(WEEK, 604_800);
        assert_eq!(MONTH_31, 2_678_400);
    }
}
