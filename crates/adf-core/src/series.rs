//! One measurement episode.

use crate::additive::AdditiveList;
use crate::descriptor::PrecisionInfo;
use crate::error::{AdfError, Result};
use crate::header::Header;
use crate::matrix::Matrix;

/// Floor applied to every tolerance, so a zero precision still absorbs
/// float round-off.
pub const EPSILON: f32 = 1e-6;

/// Readings for one episode, standing for `repeated` consecutive periods.
///
/// Every chunked channel has one row per chunk; the chunk count must equal
/// the owning header's `n_chunks`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct Series {
    /// Light energy flux per chunk and wavelength step (chunks × wavelengths).
    pub light_exposure: Matrix<f32>,
    /// Soil temperature per chunk and probe depth, °C (chunks × depths).
    pub soil_temp_c: Matrix<f32>,
    /// Ambient temperature per chunk, °C.
    pub env_temp_c: Vec<f32>,
    /// Water use per chunk, millilitres.
    pub water_use_ml: Vec<f32>,
    /// Soil pH.
    #[cfg_attr(feature = "serde", serde(rename = "pH"))]
    pub ph: u8,
    /// Atmospheric pressure, bar.
    pub p_bar: f32,
    /// Soil density, kg/m³.
    pub soil_density_kg_m3: f32,
    /// Additives applied to the soil.
    pub soil_additives: AdditiveList,
    /// Additives released into the atmosphere.
    pub atm_additives: AdditiveList,
    /// Number of consecutive periods this episode stands for. Must be ≥ 1.
    pub repeated: u32,
}

impl Series {
    /// Number of chunks, taken from the light-exposure matrix.
    pub fn chunk_count(&self) -> u32 {
        self.light_exposure.rows()
    }

    /// Check this series against `header`.
    ///
    /// In order: `repeated == 0` is [`AdfError::ZeroRepeatedSeries`]; a
    /// channel with no chunks is [`AdfError::EmptySeries`]; a chunk count or
    /// column count that disagrees with the header is
    /// [`AdfError::SeriesCorrupted`]; an additive list longer than the `u16`
    /// wire prefix is [`AdfError::AdditiveOverflow`].
    pub fn validate(&self, header: &Header) -> Result<()> {
        if self.repeated == 0 {
            return Err(AdfError::ZeroRepeatedSeries);
        }
        if self.light_exposure.is_empty()
            || self.soil_temp_c.is_empty()
            || self.env_temp_c.is_empty()
            || self.water_use_ml.is_empty()
        {
            return Err(AdfError::EmptySeries);
        }
        let n_chunks = header.n_chunks;
        if self.light_exposure.rows() != n_chunks
            || self.soil_temp_c.rows() != n_chunks
            || self.env_temp_c.len() != n_chunks as usize
            || self.water_use_ml.len() != n_chunks as usize
            || self.light_exposure.columns() != u32::from(header.wave_info.n_wavelengths)
            || self.soil_temp_c.columns() != u32::from(header.soil_info.n_depth)
        {
            return Err(AdfError::SeriesCorrupted);
        }
        if !self.soil_additives.fits_wire() || !self.atm_additives.fits_wire() {
            return Err(AdfError::AdditiveOverflow);
        }
        Ok(())
    }

    /// Whether `self` and `other` are the same reading within `precision`.
    ///
    /// Float channels match when `|a - b| <= max(tolerance, EPSILON)`; pH
    /// and additive codes must match exactly. `repeated` is ignored.
    pub fn approx_eq(&self, other: &Series, precision: &PrecisionInfo) -> bool {
        self.ph == other.ph
            && self.light_exposure.shape() == other.light_exposure.shape()
            && self.soil_temp_c.shape() == other.soil_temp_c.shape()
            && within(self.p_bar, other.p_bar, precision.pressure)
            && within(
                self.soil_density_kg_m3,
                other.soil_density_kg_m3,
                precision.soil_density,
            )
            && all_within(
                self.light_exposure.as_slice(),
                other.light_exposure.as_slice(),
                precision.light_exposure,
            )
            && all_within(
                self.soil_temp_c.as_slice(),
                other.soil_temp_c.as_slice(),
                precision.soil_temp,
            )
            && all_within(&self.env_temp_c, &other.env_temp_c, precision.env_temp)
            && all_within(&self.water_use_ml, &other.water_use_ml, precision.water_use)
            && additives_within(
                &self.soil_additives,
                &other.soil_additives,
                precision.additive_concentration,
            )
            && additives_within(
                &self.atm_additives,
                &other.atm_additives,
                precision.additive_concentration,
            )
    }
}

fn within(a: f32, b: f32, tolerance: f32) -> bool {
    (a - b).abs() <= tolerance.max(EPSILON)
}

fn all_within(a: &[f32], b: &[f32], tolerance: f32) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(&x, &y)| within(x, y, tolerance))
}

fn additives_within(a: &AdditiveList, b: &AdditiveList, tolerance: f32) -> bool {
    a.len() == b.len()
        && a.iter().zip(b).all(|(x, y)| {
            x.code == y.code && within(x.concentration, y.concentration, tolerance)
        })
}
