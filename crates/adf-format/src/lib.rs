//! Binary encoding and the series container for ADF telemetry.
//!
//! # Architecture
//!
//! - [`codec`] holds the little-endian primitives and the per-section
//!   encoders and decoders
//! - [`Metadata`] carries the period length, crop lifecycle times, and the
//!   additive code registry
//! - [`Adf`] owns a header, metadata, and the chronological series list,
//!   and provides marshal, unmarshal, and time-addressed mutation
//!
//! # Format
//!
//! ```text
//! [Signature | Header | CRC] [Metadata | CRC] [Series 1 | CRC] ... [Series N | CRC]
//! ```
//!
//! Each section closes with a CRC-16 of its own bytes, so a damaged byte is
//! reported as the corruption of the section it sits in.
//!
//! The header fixes the shape of every series (chunk count, wavelength
//! steps, soil probe depths), so series carry no per-matrix length prefix.
//! The metadata ends with the series count, which makes truncation of a
//! whole trailing series detectable.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod codec;
pub mod container;
#[cfg(feature = "serde")]
pub mod json;
pub mod metadata;

pub use codec::{header_size, metadata_size, series_size};
pub use container::Adf;
pub use metadata::Metadata;
