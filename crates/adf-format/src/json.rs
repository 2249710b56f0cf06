//! JSON view of series and headers, for inspection and debugging.
//!
//! Field names are camelCase (`lightExposure`, `soilTempC`, `pH`, ...).
//! This is not the canonical form: the binary layout in [`codec`](crate::codec)
//! is what [`Adf::marshal`](crate::Adf::marshal) writes.

use adf_core::{Header, Series};

/// Render a series as JSON.
pub fn series_to_json(series: &Series) -> serde_json::Result<String> {
    serde_json::to_string(series)
}

/// Parse a series from JSON. Matrices are shape-checked.
///
/// The result is not validated against any header; pass it through
/// [`Adf::add_series`](crate::Adf::add_series) for that.
pub fn series_from_json(json: &str) -> serde_json::Result<Series> {
    serde_json::from_str(json)
}

/// Render a header as JSON.
pub fn header_to_json(header: &Header) -> serde_json::Result<String> {
    serde_json::to_string(header)
}

/// Parse a header from JSON.
pub fn header_from_json(json: &str) -> serde_json::Result<Header> {
    serde_json::from_str(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use adf_core::{
        Additive, AdditiveList, FarmingTechnique, Matrix, PrecisionInfo, ReductionInfo,
        SoilDepthInfo, WaveInfo,
    };
    use serde_json::Value;

    fn series() -> Series {
        Series {
            light_exposure: Matrix::from_rows(3, &[[0.1, 0.2, 0.3]]).unwrap(),
            soil_temp_c: Matrix::from_rows(2, &[[10.0, 10.5]]).unwrap(),
            env_temp_c: vec![20.0],
            water_use_ml: vec![5.0],
            ph: 7,
            p_bar: 1.0,
            soil_density_kg_m3: 1200.0,
            soil_additives: vec![Additive::new(1, 2.5)].into(),
            atm_additives: AdditiveList::new(),
            repeated: 1,
        }
    }

    #[test]
    fn series_uses_camel_case_names() {
        let json = series_to_json(&series()).unwrap();
        let v: Value = serde_json::from_str(&json).unwrap();
        for key in [
            "lightExposure",
            "soilTempC",
            "envTempC",
            "waterUseMl",
            "pH",
            "pBar",
            "soilDensityKgM3",
            "soilAdditives",
            "atmAdditives",
            "repeated",
        ] {
            assert!(v.get(key).is_some(), "missing {key}");
        }
        assert_eq!(v["soilAdditives"][0]["code"], 1);
        assert_eq!(v["pH"], 7);
    }

    #[test]
    fn series_json_roundtrip() {
        let s = series();
        let back = series_from_json(&series_to_json(&s).unwrap()).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn malformed_matrix_is_rejected() {
        let mut v: Value = serde_json::from_str(&series_to_json(&series()).unwrap()).unwrap();
        v["lightExposure"]["rows"] = Value::from(2);
        assert!(series_from_json(&v.to_string()).is_err());
    }

    #[test]
    fn header_json_roundtrip() {
        let h = Header::new(
            FarmingTechnique::Hydroponics,
            WaveInfo::new(400, 700, 3),
            SoilDepthInfo::new(25, 500, 2),
            ReductionInfo::default(),
            PrecisionInfo::default(),
            4,
        );
        let json = header_to_json(&h).unwrap();
        assert!(json.contains("\"HYDROPONICS\""));
        assert_eq!(header_from_json(&json).unwrap(), h);
    }
}
