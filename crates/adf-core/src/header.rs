//! Container header: format version, sampling geometry, and per-channel policy.

use crate::descriptor::{FarmingTechnique, PrecisionInfo, ReductionInfo, SoilDepthInfo, WaveInfo};
use crate::error::{AdfError, Result};
use crate::version::FORMAT_VERSION;

/// Describes the shape every series in a container must have.
///
/// # Examples
///
/// ```
/// use adf_core::*;
///
/// let header = Header::new(
///     FarmingTechnique::Outdoor,
///     WaveInfo::new(400, 700, 3),
///     SoilDepthInfo::new(0, 500, 2),
///     ReductionInfo::default(),
///     PrecisionInfo::default(),
///     1,
/// );
/// assert_eq!(header.version, FORMAT_VERSION);
/// assert!(header.validate().is_ok());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct Header {
    /// Format version this header was written with.
    pub version: u16,
    /// Cultivation method.
    pub farming_technique: FarmingTechnique,
    /// Light spectrum sampling.
    pub wave_info: WaveInfo,
    /// Soil probe sampling.
    pub soil_info: SoilDepthInfo,
    /// Declared reduction per channel.
    pub reduction_info: ReductionInfo,
    /// Declared precision per channel.
    pub precision_info: PrecisionInfo,
    /// Chunks (rows) per series.
    pub n_chunks: u32,
}

impl Header {
    /// Create a header stamped with the running [`FORMAT_VERSION`].
    pub fn new(
        farming_technique: FarmingTechnique,
        wave_info: WaveInfo,
        soil_info: SoilDepthInfo,
        reduction_info: ReductionInfo,
        precision_info: PrecisionInfo,
        n_chunks: u32,
    ) -> Self {
        Self {
            version: FORMAT_VERSION,
            farming_technique,
            wave_info,
            soil_info,
            reduction_info,
            precision_info,
            n_chunks,
        }
    }

    /// Check the version gate and the wavelength bounds.
    pub fn validate(&self) -> Result<()> {
        if self.version != FORMAT_VERSION || !self.wave_info.is_valid() {
            return Err(AdfError::HeaderCorrupted);
        }
        Ok(())
    }
}
