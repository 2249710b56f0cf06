//! Fixed-layout descriptors carried by the header: sampling geometry,
//! declared reduction policy, and quantization precision per channel.

use std::num::NonZeroU16;

/// Cultivation method the data was collected under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "SCREAMING_SNAKE_CASE")
)]
#[repr(u8)]
pub enum FarmingTechnique {
    /// Regular open-field farming.
    #[default]
    Regular = 0,
    /// Indoor cultivation.
    Indoor = 1,
    /// Indoor cultivation in a protected environment.
    IndoorProtected = 2,
    /// Outdoor cultivation.
    Outdoor = 3,
    /// Artificial soil substrate.
    ArtificialSoil = 4,
    /// Hydroponics.
    Hydroponics = 5,
    /// Anthroponics.
    Anthroponics = 6,
    /// Aeroponics.
    Aeroponics = 7,
    /// Fogponics.
    Fogponics = 8,
}

impl From<FarmingTechnique> for u8 {
    fn from(t: FarmingTechnique) -> u8 {
        t as u8
    }
}

impl TryFrom<u8> for FarmingTechnique {
    type Error = u8;

    fn try_from(v: u8) -> Result<Self, u8> {
        Ok(match v {
            0 => Self::Regular,
            1 => Self::Indoor,
            2 => Self::IndoorProtected,
            3 => Self::Outdoor,
            4 => Self::ArtificialSoil,
            5 => Self::Hydroponics,
            6 => Self::Anthroponics,
            7 => Self::Aeroponics,
            8 => Self::Fogponics,
            other => return Err(other),
        })
    }
}

/// Aggregation assumed to have been applied upstream to a channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "SCREAMING_SNAKE_CASE")
)]
#[repr(u8)]
pub enum ReductionCode {
    /// Raw readings.
    #[default]
    None = 0,
    /// Arithmetic mean over the period.
    Average = 1,
    /// Moving average over the period.
    MovingAverage = 2,
}

impl From<ReductionCode> for u8 {
    fn from(c: ReductionCode) -> u8 {
        c as u8
    }
}

impl TryFrom<u8> for ReductionCode {
    type Error = u8;

    fn try_from(v: u8) -> Result<Self, u8> {
        match v {
            0 => Ok(Self::None),
            1 => Ok(Self::Average),
            2 => Ok(Self::MovingAverage),
            other => Err(other),
        }
    }
}

/// Light spectrum sampling: `n_wavelengths` steps over
/// `[min_wavelen_nm, max_wavelen_nm]`.
///
/// `n_wavelengths` is the column count of every light-exposure matrix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct WaveInfo {
    /// Lower bound of the spectrum, in nanometres.
    pub min_wavelen_nm: u16,
    /// Upper bound of the spectrum, in nanometres.
    pub max_wavelen_nm: u16,
    /// Number of spectrum steps.
    pub n_wavelengths: u16,
}

impl WaveInfo {
    /// Create a wave descriptor.
    pub const fn new(min_wavelen_nm: u16, max_wavelen_nm: u16, n_wavelengths: u16) -> Self {
        Self {
            min_wavelen_nm,
            max_wavelen_nm,
            n_wavelengths,
        }
    }

    /// `min_wavelen_nm <= max_wavelen_nm`.
    pub fn is_valid(&self) -> bool {
        self.min_wavelen_nm <= self.max_wavelen_nm
    }
}

/// Vertical offset of the soil probe column.
///
/// Selects the on-wire form of [`SoilDepthInfo`]: `Absent` encodes without
/// the translation field, `Translated` carries it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub enum Translation {
    /// No translation.
    #[default]
    Absent,
    /// Translated by the given amount.
    Translated(NonZeroU16),
}

/// Soil temperature sampling: `n_depth` probes down to `max_soil_depth_mm`.
///
/// `n_depth` is the column count of every soil-temperature matrix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct SoilDepthInfo {
    /// Optional probe translation.
    pub translation: Translation,
    /// Deepest probe, in millimetres.
    pub max_soil_depth_mm: u16,
    /// Number of probes.
    pub n_depth: u16,
}

impl SoilDepthInfo {
    /// Create a soil descriptor. `translation_y == 0` means no translation.
    pub const fn new(translation_y: u16, max_soil_depth_mm: u16, n_depth: u16) -> Self {
        let translation = match NonZeroU16::new(translation_y) {
            Some(y) => Translation::Translated(y),
            None => Translation::Absent,
        };
        Self {
            translation,
            max_soil_depth_mm,
            n_depth,
        }
    }

    /// The translation value, `0` when absent.
    pub fn translation_y(&self) -> u16 {
        match self.translation {
            Translation::Absent => 0,
            Translation::Translated(y) => y.get(),
        }
    }

    /// Whether the translated wire form is used.
    pub fn is_translated(&self) -> bool {
        self.translation_y() != 0
    }
}

/// Declared reduction policy per channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct ReductionInfo {
    /// Soil density channel.
    pub soil_density: ReductionCode,
    /// Pressure channel.
    pub pressure: ReductionCode,
    /// Light exposure channel.
    pub light_exposure: ReductionCode,
    /// Water use channel.
    pub water_use: ReductionCode,
    /// Soil temperature channel.
    pub soil_temp: ReductionCode,
    /// Ambient temperature channel.
    pub env_temp: ReductionCode,
    /// Additive concentration channel.
    pub additive_concentration: ReductionCode,
}

impl ReductionInfo {
    /// The same code on every channel.
    pub const fn uniform(code: ReductionCode) -> Self {
        Self {
            soil_density: code,
            pressure: code,
            light_exposure: code,
            water_use: code,
            soil_temp: code,
            env_temp: code,
            additive_concentration: code,
        }
    }

    /// Codes in wire order.
    pub fn to_bytes(&self) -> [u8; 7] {
        [
            self.soil_density.into(),
            self.pressure.into(),
            self.light_exposure.into(),
            self.water_use.into(),
            self.soil_temp.into(),
            self.env_temp.into(),
            self.additive_concentration.into(),
        ]
    }

    /// Parse codes in wire order; `Err` carries the first unknown byte.
    pub fn from_bytes(b: [u8; 7]) -> Result<Self, u8> {
        Ok(Self {
            soil_density: b[0].try_into()?,
            pressure: b[1].try_into()?,
            light_exposure: b[2].try_into()?,
            water_use: b[3].try_into()?,
            soil_temp: b[4].try_into()?,
            env_temp: b[5].try_into()?,
            additive_concentration: b[6].try_into()?,
        })
    }
}

/// Declared quantization tolerance per channel.
///
/// Used by [`Series::approx_eq`](crate::Series::approx_eq) to decide whether
/// two episodes are the same reading.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct PrecisionInfo {
    /// Soil density tolerance.
    pub soil_density: f32,
    /// Pressure tolerance.
    pub pressure: f32,
    /// Light exposure tolerance.
    pub light_exposure: f32,
    /// Water use tolerance.
    pub water_use: f32,
    /// Soil temperature tolerance.
    pub soil_temp: f32,
    /// Ambient temperature tolerance.
    pub env_temp: f32,
    /// Additive concentration tolerance.
    pub additive_concentration: f32,
}

impl PrecisionInfo {
    /// Tolerances in wire order.
    pub fn to_array(&self) -> [f32; 7] {
        [
            self.soil_density,
            self.pressure,
            self.light_exposure,
            self.water_use,
            self.soil_temp,
            self.env_temp,
            self.additive_concentration,
        ]
    }

    /// Tolerances from wire order.
    pub fn from_array(a: [f32; 7]) -> Self {
        Self {
            soil_density: a[0],
            pressure: a[1],
            light_exposure: a[2],
            water_use: a[3],
            soil_temp: a[4],
            env_temp: a[5],
            additive_concentration: a[6],
        }
    }
}
