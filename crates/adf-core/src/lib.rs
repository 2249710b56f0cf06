//! Core types for the ADF (Agriculture Data Format) engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! in-memory model of a container: the header and its descriptors, the
//! per-episode [`Series`], the [`Matrix`] and [`AdditiveList`] building
//! blocks, and the [`AdfError`] taxonomy shared by the whole workspace.
//! Encoding lives in `adf-format`.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod additive;
pub mod descriptor;
pub mod error;
pub mod header;
pub mod matrix;
pub mod series;
pub mod version;

pub use additive::{Additive, AdditiveList, MAX_ADDITIVES};
pub use descriptor::{
    FarmingTechnique, PrecisionInfo, ReductionCode, ReductionInfo, SoilDepthInfo, Translation,
    WaveInfo,
};
pub use error::{AdfError, MatrixError, Result};
pub use header::Header;
pub use matrix::Matrix;
pub use series::{Series, EPSILON};
pub use version::{
    version, Version, DAY, FORMAT_VERSION, MONTH_28, MONTH_29, MONTH_30, MONTH_31, VERSION, WEEK,
};
