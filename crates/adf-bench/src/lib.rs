//! Benchmark profiles for the ADF codec and container.
//!
//! - [`reference_profile`]: one growing season of daily series, 24 chunks each
//! - [`stress_profile`]: a year of hourly-chunked series with a wide spectrum

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use adf_core::{Header, DAY};
use adf_format::Adf;
use adf_test_utils::{random_series, rng, shaped_header};

/// 120 series, 24 chunks × 16 wavelengths × 4 depths, daily period.
pub fn reference_profile(seed: u64) -> Adf {
    build(shaped_header(24, 16, 4), 120, seed)
}

/// 365 series, 24 chunks × 128 wavelengths × 8 depths, daily period.
pub fn stress_profile(seed: u64) -> Adf {
    build(shaped_header(24, 128, 8), 365, seed)
}

fn build(header: Header, n_series: usize, seed: u64) -> Adf {
    let mut rng = rng(seed);
    let mut adf = Adf::new(header, DAY);
    for _ in 0..n_series {
        adf.add_series(random_series(&mut rng, &header, 64))
            .expect("random series fits its own header");
    }
    adf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profiles_are_deterministic() {
        assert_eq!(reference_profile(3), reference_profile(3));
        assert_eq!(reference_profile(3).series_count(), 120);
    }
}
