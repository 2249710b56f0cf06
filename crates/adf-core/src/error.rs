//! Error types for the ADF engine.
//!
//! [`AdfError`] is the single status type returned by every codec and
//! repository operation. Variants are grouped by kind: corruption
//! (malformed bytes), structural violations (well-formed values that break
//! a domain invariant), null input (nothing to read / nowhere to write),
//! and the unreachable-invariant catch-all.
//!
//! [`MatrixError`] is kept separate: it describes shape misuse of a
//! [`Matrix`](crate::Matrix) and never leaves the matrix API.

use thiserror::Error;

/// Errors produced by ADF encode/decode and repository operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum AdfError {
    // ── Corruption ──────────────────────────────────────────────
    /// The header is truncated, carries an unknown enum byte, or was
    /// stamped with a different format version.
    #[error("header corrupted")]
    HeaderCorrupted,
    /// The metadata section is truncated or inconsistent with the series.
    #[error("metadata corrupted")]
    MetadataCorrupted,
    /// A series is truncated or does not match the header geometry.
    #[error("series corrupted")]
    SeriesCorrupted,

    // ── Structural violations ───────────────────────────────────
    /// A series declares `repeated == 0`.
    #[error("series repeated zero times")]
    ZeroRepeatedSeries,
    /// A series has no chunks, or the repository is empty.
    #[error("empty series")]
    EmptySeries,
    /// The requested time is outside the covered interval.
    #[error("time out of bound")]
    TimeOutOfBound,
    /// An additive list or the additive code registry exceeds `u16::MAX` entries.
    #[error("additive overflow")]
    AdditiveOverflow,

    // ── Null input ──────────────────────────────────────────────
    /// No bytes to decode a header from.
    #[error("null header source")]
    NullHeaderSource,
    /// No room to encode a header into.
    #[error("null header target")]
    NullHeaderTarget,
    /// No bytes to decode metadata from.
    #[error("null metadata source")]
    NullMetaSource,
    /// No room to encode metadata into.
    #[error("null metadata target")]
    NullMetaTarget,
    /// No bytes to decode a series from.
    #[error("null series source")]
    NullSeriesSource,
    /// No room to encode a series into.
    #[error("null series target")]
    NullSeriesTarget,
    /// No bytes to unmarshal a container from.
    #[error("null source")]
    NullSource,
    /// No room (or not enough room) to marshal a container into.
    #[error("null target")]
    NullTarget,
    /// No bytes to decode an additive list from.
    #[error("null additive source")]
    NullAdditiveSource,
    /// No room to encode an additive list into.
    #[error("null additive target")]
    NullAdditiveTarget,

    // ── Catch-all ───────────────────────────────────────────────
    /// An internal invariant was violated. Unreachable when the
    /// container invariants hold.
    #[error("runtime error")]
    RuntimeError,
}

impl AdfError {
    /// Stable numeric status code, for binding layers that expose
    /// integer results. `0` is reserved for success.
    pub fn code(self) -> u16 {
        match self {
            Self::HeaderCorrupted => 0x01,
            Self::MetadataCorrupted => 0x02,
            Self::SeriesCorrupted => 0x03,
            Self::ZeroRepeatedSeries => 0x04,
            Self::EmptySeries => 0x05,
            Self::TimeOutOfBound => 0x06,
            Self::AdditiveOverflow => 0x07,
            Self::NullHeaderSource => 0x08,
            Self::NullHeaderTarget => 0x09,
            Self::NullMetaSource => 0x0A,
            Self::NullMetaTarget => 0x0B,
            Self::NullSeriesSource => 0x0C,
            Self::NullSeriesTarget => 0x0D,
            Self::NullSource => 0x0E,
            Self::NullTarget => 0x0F,
            Self::NullAdditiveSource => 0x10,
            Self::NullAdditiveTarget => 0x11,
            Self::RuntimeError => 0xFFFF,
        }
    }

    /// Whether this error reports malformed or truncated bytes.
    pub fn is_corruption(self) -> bool {
        matches!(
            self,
            Self::HeaderCorrupted | Self::MetadataCorrupted | Self::SeriesCorrupted
        )
    }

    /// Whether this error reports a missing source or target.
    pub fn is_null_input(self) -> bool {
        matches!(
            self,
            Self::NullHeaderSource
                | Self::NullHeaderTarget
                | Self::NullMetaSource
                | Self::NullMetaTarget
                | Self::NullSeriesSource
                | Self::NullSeriesTarget
                | Self::NullSource
                | Self::NullTarget
                | Self::NullAdditiveSource
                | Self::NullAdditiveTarget
        )
    }
}

/// Shorthand result type for ADF operations.
pub type Result<T> = std::result::Result<T, AdfError>;

/// Shape misuse of a [`Matrix`](crate::Matrix).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum MatrixError {
    /// A row or flat buffer had the wrong number of elements.
    #[error("shape mismatch: expected {expected} elements, found {found}")]
    ShapeMismatch {
        /// Number of elements the matrix shape requires.
        expected: usize,
        /// Number of elements supplied.
        found: usize,
    },
    /// A cell index was outside the matrix.
    #[error("index ({row}, {column}) out of bounds for {rows}x{columns} matrix")]
    IndexOutOfBounds {
        /// Requested row.
        row: u32,
        /// Requested column.
        column: u32,
        /// Current row count.
        rows: u32,
        /// Column count.
        columns: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_unique() {
        let all = [
            AdfError::HeaderCorrupted,
            AdfError::MetadataCorrupted,
            AdfError::SeriesCorrupted,
            AdfError::ZeroRepeatedSeries,
            AdfError::EmptySeries,
            AdfError::TimeOutOfBound,
            AdfError::AdditiveOverflow,
            AdfError::NullHeaderSource,
            AdfError::NullHeaderTarget,
            AdfError::NullMetaSource,
            AdfError::NullMetaTarget,
            AdfError::NullSeriesSource,
            AdfError::NullSeriesTarget,
            AdfError::NullSource,
            AdfError::NullTarget,
            AdfError::NullAdditiveSource,
            AdfError::NullAdditiveTarget,
            AdfError::RuntimeError,
        ];
        let mut codes: Vec<u16> = all.iter().map(|e| e.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), all.len());
        assert!(!codes.contains(&0));
    }

    #[test]
    fn kinds_are_disjoint() {
        assert!(AdfError::SeriesCorrupted.is_corruption());
        assert!(!AdfError::SeriesCorrupted.is_null_input());
        assert!(AdfError::NullTarget.is_null_input());
        assert!(!AdfError::TimeOutOfBound.is_corruption());
        assert!(!AdfError::TimeOutOfBound.is_null_input());
    }

    #[test]
    fn display_is_lowercase_sentence() {
        assert_eq!(AdfError::TimeOutOfBound.to_string(), "time out of bound");
        let e = MatrixError::ShapeMismatch {
            expected: 3,
            found: 2,
        };
        assert_eq!(e.to_string(), "shape mismatch: expected 3 elements, found 2");
    }
}
