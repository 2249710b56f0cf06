//! ADF: a compact binary container for agricultural telemetry.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the ADF sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use adf::prelude::*;
//!
//! let header = Header::new(
//!     FarmingTechnique::Outdoor,
//!     WaveInfo::new(400, 700, 3),
//!     SoilDepthInfo::new(0, 500, 2),
//!     ReductionInfo::default(),
//!     PrecisionInfo::default(),
//!     1,
//! );
//! let series = Series {
//!     light_exposure: Matrix::from_rows(3, &[[0.1, 0.2, 0.3]]).unwrap(),
//!     soil_temp_c: Matrix::from_rows(2, &[[10.0, 10.5]]).unwrap(),
//!     env_temp_c: vec![20.0],
//!     water_use_ml: vec![5.0],
//!     ph: 7,
//!     p_bar: 1.0,
//!     soil_density_kg_m3: 1200.0,
//!     soil_additives: vec![Additive::new(1, 2.5)].into(),
//!     atm_additives: AdditiveList::new(),
//!     repeated: 1,
//! };
//!
//! let mut adf = Adf::new(header, DAY);
//! adf.add_series(series.clone()).unwrap();
//!
//! let bytes = adf.marshal().unwrap();
//! assert_eq!(bytes.len(), adf.size_bytes());
//!
//! let decoded = Adf::unmarshal(&bytes).unwrap();
//! assert_eq!(decoded.series(), &[series]);
//! assert_eq!(
//!     adf.update_series(decoded.series()[0].clone(), 86_400),
//!     Err(AdfError::TimeOutOfBound)
//! );
//! adf.dispose();
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `adf-core` | Header, descriptors, series, matrix, additives, errors |
//! | [`format`] | `adf-format` | Binary codec, metadata, and the `Adf` container |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types and the error taxonomy (`adf-core`).
pub use adf_core as types;

/// Binary codec and container (`adf-format`).
///
/// [`format::Adf`] is the container; [`format::codec`] exposes the section
/// encoders for callers that stream sections themselves.
pub use adf_format as format;

/// Common imports for typical ADF usage.
///
/// ```rust
/// use adf::prelude::*;
/// ```
pub mod prelude {
    // Container
    pub use adf_format::{Adf, Metadata};

    // Model
    pub use adf_core::{
        Additive, AdditiveList, FarmingTechnique, Header, Matrix, PrecisionInfo, ReductionCode,
        ReductionInfo, Series, SoilDepthInfo, Translation, Version, WaveInfo,
    };

    // Periods
    pub use adf_core::{DAY, MONTH_28, MONTH_29, MONTH_30, MONTH_31, WEEK};

    // Errors
    pub use adf_core::{AdfError, MatrixError};
}
