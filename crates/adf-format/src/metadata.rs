//! Container-level metadata: period length, crop lifecycle times, and the
//! registry of additive codes seen across all series.

use adf_core::{AdfError, Result, Series, MAX_ADDITIVES};
use indexmap::IndexSet;

/// Metadata stored between the header and the series list.
///
/// The additive registry keeps first-seen order so that encoding is
/// deterministic. Codes are only ever added: removing or replacing the
/// series that introduced a code leaves the code registered.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Metadata {
    /// Length of one period, in seconds.
    pub period_sec: u32,
    /// Seeding time, seconds from the start of the first series.
    pub seed_time: Option<u64>,
    /// Harvest time, seconds from the start of the first series.
    pub harvest_time: Option<u64>,
    /// Every additive code referenced by a series, in first-seen order.
    pub additive_codes: IndexSet<u32>,
}

impl Metadata {
    /// Metadata with the given period and nothing else set.
    pub fn new(period_sec: u32) -> Self {
        Self {
            period_sec,
            ..Self::default()
        }
    }

    /// Codes in `series` that the registry does not hold yet.
    fn unseen_codes(&self, series: &Series) -> IndexSet<u32> {
        series
            .soil_additives
            .codes()
            .chain(series.atm_additives.codes())
            .filter(|code| !self.additive_codes.contains(code))
            .collect()
    }

    /// Register every additive code used by `series`.
    ///
    /// Either all new codes are registered or none are: if the registry
    /// would exceed [`MAX_ADDITIVES`] entries this fails with
    /// [`AdfError::AdditiveOverflow`] and leaves the registry untouched.
    /// Returns how many codes were added.
    pub fn register_additives(&mut self, series: &Series) -> Result<usize> {
        let unseen = self.unseen_codes(series);
        if self.additive_codes.len() + unseen.len() > MAX_ADDITIVES {
            return Err(AdfError::AdditiveOverflow);
        }
        let added = unseen.len();
        self.additive_codes.extend(unseen);
        Ok(added)
    }

    /// Whether every additive code in `series` is registered.
    pub fn covers(&self, series: &Series) -> bool {
        series
            .soil_additives
            .codes()
            .chain(series.atm_additives.codes())
            .all(|code| self.additive_codes.contains(&code))
    }

    /// Whether the seed and harvest times, when set, fall before `coverage`
    /// seconds.
    pub fn times_within(&self, coverage: u64) -> bool {
        [self.seed_time, self.harvest_time]
            .into_iter()
            .flatten()
            .all(|t| t < coverage)
    }

    /// Clear the seed and harvest times at or past `coverage` seconds.
    /// Returns how many were cleared.
    pub fn clear_times_from(&mut self, coverage: u64) -> usize {
        let mut cleared = 0;
        for slot in [&mut self.seed_time, &mut self.harvest_time] {
            if slot.is_some_and(|t| t >= coverage) {
                *slot = None;
                cleared += 1;
            }
        }
        cleared
    }
}
