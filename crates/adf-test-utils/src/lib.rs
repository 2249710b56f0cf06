//! Test fixtures for ADF development.
//!
//! - [`scenario_header`] / [`scenario_series`]: the one-chunk outdoor
//!   reference container used across the test suites
//! - [`SeriesBuilder`]: series of any shape with constant channel values
//! - [`random_series`]: deterministic pseudo-random series from a seed

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use adf_core::{
    Additive, AdditiveList, FarmingTechnique, Header, Matrix, PrecisionInfo, ReductionInfo,
    Series, SoilDepthInfo, WaveInfo,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Header of the reference scenario: outdoor, 400–700 nm in 3 steps, two
/// soil probes down to 500 mm, one chunk per series.
pub fn scenario_header() -> Header {
    Header::new(
        FarmingTechnique::Outdoor,
        WaveInfo::new(400, 700, 3),
        SoilDepthInfo::new(0, 500, 2),
        ReductionInfo::default(),
        PrecisionInfo::default(),
        1,
    )
}

/// The single series of the reference scenario.
pub fn scenario_series() -> Series {
    SeriesBuilder::for_header(&scenario_header())
        .light(&[0.1, 0.2, 0.3])
        .soil_temp(&[10.0, 10.5])
        .env_temp(20.0)
        .water_use(5.0)
        .soil_additive(1, 2.5)
        .build()
}

/// A header with the given geometry and defaults elsewhere.
pub fn shaped_header(n_chunks: u32, n_wavelengths: u16, n_depth: u16) -> Header {
    Header::new(
        FarmingTechnique::Regular,
        WaveInfo::new(380, 780, n_wavelengths),
        SoilDepthInfo::new(0, 1_000, n_depth),
        ReductionInfo::default(),
        PrecisionInfo::default(),
        n_chunks,
    )
}

/// Builds a series that fits a header, repeating one row per chunk.
pub struct SeriesBuilder {
    n_chunks: u32,
    light: Vec<f32>,
    soil_temp: Vec<f32>,
    env_temp: f32,
    water_use: f32,
    ph: u8,
    p_bar: f32,
    soil_density: f32,
    soil_additives: AdditiveList,
    atm_additives: AdditiveList,
    repeated: u32,
}

impl SeriesBuilder {
    /// Zero-valued rows shaped by `header`, pH 7, 1 bar, 1200 kg/m³, one period.
    pub fn for_header(header: &Header) -> Self {
        Self {
            n_chunks: header.n_chunks,
            light: vec![0.0; usize::from(header.wave_info.n_wavelengths)],
            soil_temp: vec![0.0; usize::from(header.soil_info.n_depth)],
            env_temp: 0.0,
            water_use: 0.0,
            ph: 7,
            p_bar: 1.0,
            soil_density: 1200.0,
            soil_additives: AdditiveList::new(),
            atm_additives: AdditiveList::new(),
            repeated: 1,
        }
    }

    pub fn light(mut self, row: &[f32]) -> Self {
        self.light = row.to_vec();
        self
    }

    pub fn soil_temp(mut self, row: &[f32]) -> Self {
        self.soil_temp = row.to_vec();
        self
    }

    pub fn env_temp(mut self, v: f32) -> Self {
        self.env_temp = v;
        self
    }

    pub fn water_use(mut self, v: f32) -> Self {
        self.water_use = v;
        self
    }

    pub fn ph(mut self, v: u8) -> Self {
        self.ph = v;
        self
    }

    pub fn soil_density(mut self, v: f32) -> Self {
        self.soil_density = v;
        self
    }

    pub fn soil_additive(mut self, code: u32, concentration: f32) -> Self {
        self.soil_additives.push(Additive::new(code, concentration));
        self
    }

    pub fn atm_additive(mut self, code: u32, concentration: f32) -> Self {
        self.atm_additives.push(Additive::new(code, concentration));
        self
    }

    pub fn repeated(mut self, n: u32) -> Self {
        self.repeated = n;
        self
    }

    /// Build the series.
    ///
    /// Panics if a row override does not match the header's column count.
    pub fn build(self) -> Series {
        let rows = self.n_chunks as usize;
        let tile = |row: &[f32]| -> Vec<f32> { row.repeat(rows) };
        Series {
            light_exposure: Matrix::from_flat(
                self.n_chunks,
                self.light.len() as u32,
                tile(&self.light),
            )
            .expect("light row shape"),
            soil_temp_c: Matrix::from_flat(
                self.n_chunks,
                self.soil_temp.len() as u32,
                tile(&self.soil_temp),
            )
            .expect("soil temp row shape"),
            env_temp_c: vec![self.env_temp; rows],
            water_use_ml: vec![self.water_use; rows],
            ph: self.ph,
            p_bar: self.p_bar,
            soil_density_kg_m3: self.soil_density,
            soil_additives: self.soil_additives,
            atm_additives: self.atm_additives,
            repeated: self.repeated,
        }
    }
}

/// A seeded RNG for fixture generation.
pub fn rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// A series that fits `header`, with every channel drawn from `rng`.
///
/// Additive codes are drawn from `0..code_space` so that callers control how
/// fast the container registry grows.
pub fn random_series(rng: &mut impl Rng, header: &Header, code_space: u32) -> Series {
    let rows = header.n_chunks as usize;
    let wave = usize::from(header.wave_info.n_wavelengths);
    let depth = usize::from(header.soil_info.n_depth);
    let mut floats = |n: usize, lo: f32, hi: f32| -> Vec<f32> {
        (0..n).map(|_| rng.random_range(lo..hi)).collect()
    };

    let light = floats(rows * wave, 0.0, 2_000.0);
    let soil = floats(rows * depth, -5.0, 40.0);
    let env = floats(rows, -10.0, 45.0);
    let water = floats(rows, 0.0, 500.0);

    let mut additives = |max: usize| -> AdditiveList {
        let n = rng.random_range(0..=max);
        (0..n)
            .map(|_| {
                Additive::new(
                    rng.random_range(0..code_space.max(1)),
                    rng.random_range(0.0..100.0),
                )
            })
            .collect()
    };
    let soil_additives = additives(4);
    let atm_additives = additives(2);

    Series {
        light_exposure: Matrix::from_flat(header.n_chunks, wave as u32, light)
            .expect("light shape"),
        soil_temp_c: Matrix::from_flat(header.n_chunks, depth as u32, soil)
            .expect("soil shape"),
        env_temp_c: env,
        water_use_ml: water,
        ph: rng.random_range(3..=10),
        p_bar: rng.random_range(0.9..1.1),
        soil_density_kg_m3: rng.random_range(900.0..1_800.0),
        soil_additives,
        atm_additives,
        repeated: rng.random_range(1..=5),
    }
}
