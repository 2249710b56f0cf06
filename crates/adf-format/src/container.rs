//! The `Adf` container: a header, metadata, and the series repository.
//!
//! Series are stored in chronological order. Series `i` covers the
//! half-open interval starting at `period_sec × Σ repeated[0..i]` and
//! lasting `period_sec × repeated[i]` seconds.

use adf_core::{AdfError, Header, Result, Series, Version};
use indexmap::IndexSet;
use tracing::{debug, trace, warn};

use crate::codec;
use crate::metadata::Metadata;

/// An ADF container.
///
/// Owns its header and every series; nothing inside is shared. Mutations
/// either succeed completely or leave the container unchanged.
///
/// # Examples
///
/// ```
/// use adf_core::*;
/// use adf_format::Adf;
///
/// let header = Header::new(
///     FarmingTechnique::Outdoor,
///     WaveInfo::new(400, 700, 3),
///     SoilDepthInfo::new(0, 500, 2),
///     ReductionInfo::default(),
///     PrecisionInfo::default(),
///     1,
/// );
/// let adf = Adf::new(header, DAY);
/// let bytes = adf.marshal().unwrap();
/// assert_eq!(bytes.len(), adf.size_bytes());
/// assert_eq!(Adf::unmarshal(&bytes).unwrap(), adf);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Adf {
    header: Header,
    metadata: Metadata,
    series: Vec<Series>,
}

impl Adf {
    /// An empty container.
    pub fn new(header: Header, period_sec: u32) -> Self {
        Self {
            header,
            metadata: Metadata::new(period_sec),
            series: Vec::new(),
        }
    }

    /// The compiled format version.
    pub fn version() -> Version {
        adf_core::version()
    }

    /// Release the container.
    ///
    /// Consuming `self` means no method can be called afterwards and no
    /// borrowed series can outlive it.
    pub fn dispose(self) {
        trace!(series = self.series.len(), "container disposed");
    }

    // ── Accessors ───────────────────────────────────────────────

    /// The header every series must fit.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Container metadata.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Length of one period, in seconds.
    pub fn period_sec(&self) -> u32 {
        self.metadata.period_sec
    }

    /// Seeding time, if recorded.
    pub fn seed_time(&self) -> Option<u64> {
        self.metadata.seed_time
    }

    /// Harvest time, if recorded.
    pub fn harvest_time(&self) -> Option<u64> {
        self.metadata.harvest_time
    }

    /// Every additive code seen, in first-seen order.
    pub fn additive_codes(&self) -> &IndexSet<u32> {
        &self.metadata.additive_codes
    }

    /// Stored series, oldest first.
    pub fn series(&self) -> &[Series] {
        &self.series
    }

    /// Number of stored series.
    pub fn series_count(&self) -> usize {
        self.series.len()
    }

    /// Number of periods covered (`Σ repeated`).
    pub fn period_count(&self) -> u64 {
        self.series.iter().map(|s| u64::from(s.repeated)).sum()
    }

    /// Seconds covered (`period_sec × Σ repeated`), saturating at `u64::MAX`.
    pub fn coverage_secs(&self) -> u64 {
        u64::from(self.metadata.period_sec).saturating_mul(self.period_count())
    }

    /// The series covering `time`, if any.
    pub fn series_at(&self, time: u64) -> Option<&Series> {
        self.locate(time).ok().map(|(i, _)| &self.series[i])
    }

    /// Index of the series covering `time` and the period offset of `time`
    /// inside that series' run.
    fn locate(&self, time: u64) -> Result<(usize, u32)> {
        let period = u128::from(self.metadata.period_sec);
        if period == 0 {
            return Err(AdfError::TimeOutOfBound);
        }
        let time = u128::from(time);
        let mut start = 0u128;
        for (i, s) in self.series.iter().enumerate() {
            let end = start + period * u128::from(s.repeated);
            if time < end {
                // Less than `repeated`, so it fits in u32.
                let offset = ((time - start) / period) as u32;
                return Ok((i, offset));
            }
            start = end;
        }
        Err(AdfError::TimeOutOfBound)
    }

    /// Forget seed and harvest times the repository no longer covers.
    fn clear_uncovered_times(&mut self) {
        let coverage = self.coverage_secs();
        let cleared = self.metadata.clear_times_from(coverage);
        if cleared > 0 {
            debug!(cleared, coverage, "lifecycle times past coverage cleared");
        }
    }

    fn check_within_coverage(&self, time: u64) -> Result<()> {
        if self.series.is_empty() || time >= self.coverage_secs() {
            return Err(AdfError::TimeOutOfBound);
        }
        Ok(())
    }

    // ── Lifecycle times ─────────────────────────────────────────

    /// Record the seeding time.
    ///
    /// Fails with [`AdfError::TimeOutOfBound`] if the container is empty or
    /// `time` is at or past the covered span. A later mutation that shrinks
    /// the covered span below `time` clears it again.
    pub fn set_seed_time(&mut self, time: u64) -> Result<()> {
        self.check_within_coverage(time)?;
        self.metadata.seed_time = Some(time);
        debug!(time, "seed time set");
        Ok(())
    }

    /// Record the harvest time. Same bounds as [`set_seed_time`](Self::set_seed_time).
    pub fn set_harvest_time(&mut self, time: u64) -> Result<()> {
        self.check_within_coverage(time)?;
        self.metadata.harvest_time = Some(time);
        debug!(time, "harvest time set");
        Ok(())
    }

    // ── Repository mutation ─────────────────────────────────────

    /// Validate `series` and register its additive codes.
    ///
    /// Nothing is mutated unless both succeed.
    fn admit(&mut self, series: &Series) -> Result<()> {
        series.validate(&self.header)?;
        self.metadata.register_additives(series)?;
        Ok(())
    }

    /// Append a series after validating it.
    ///
    /// On error the repository is unchanged.
    pub fn add_series(&mut self, series: Series) -> Result<()> {
        self.admit(&series)?;
        self.series.push(series);
        debug!(
            series = self.series.len(),
            periods = self.period_count(),
            "series added"
        );
        Ok(())
    }

    /// Append a series, or extend the last one if it holds the same reading.
    ///
    /// Two series hold the same reading when they agree within the header's
    /// precision (see [`Series::approx_eq`]). Merging adds `repeated` to the
    /// last series and keeps its values. Fails with
    /// [`AdfError::RuntimeError`] if the merged count would overflow `u32`.
    pub fn record_series(&mut self, series: Series) -> Result<()> {
        series.validate(&self.header)?;
        let precision = self.header.precision_info;
        if let Some(last) = self.series.last_mut() {
            if last.approx_eq(&series, &precision) {
                last.repeated = last
                    .repeated
                    .checked_add(series.repeated)
                    .ok_or(AdfError::RuntimeError)?;
                debug!(
                    series = self.series.len(),
                    periods = self.period_count(),
                    "series merged"
                );
                return Ok(());
            }
        }
        self.add_series(series)
    }

    /// Replace the series covering `time`.
    ///
    /// Fails with [`AdfError::TimeOutOfBound`] if the repository is empty or
    /// `time` is at or past the covered span; otherwise validates as
    /// [`add_series`](Self::add_series) does. Seed and harvest times past
    /// the new coverage are cleared.
    pub fn update_series(&mut self, series: Series, time: u64) -> Result<()> {
        let (index, _) = self.locate(time)?;
        self.admit(&series)?;
        self.series[index] = series;
        self.clear_uncovered_times();
        debug!(
            index,
            time,
            periods = self.period_count(),
            "series updated"
        );
        Ok(())
    }

    /// Replace only the period covering `time`.
    ///
    /// The run containing `time` is split into the periods before it, the
    /// new series (whose `repeated` is kept as given), and the periods after
    /// it. Empty parts are dropped.
    pub fn update_period(&mut self, series: Series, time: u64) -> Result<()> {
        let (index, offset) = self.locate(time)?;
        self.admit(&series)?;

        let old = &self.series[index];
        let after = old.repeated - offset - 1;
        let mut parts = Vec::with_capacity(3);
        if offset > 0 {
            let mut before = old.clone();
            before.repeated = offset;
            parts.push(before);
        }
        let tail = (after > 0).then(|| {
            let mut tail = old.clone();
            tail.repeated = after;
            tail
        });
        parts.push(series);
        parts.extend(tail);
        self.series.splice(index..=index, parts);

        debug!(
            index,
            offset,
            series = self.series.len(),
            periods = self.period_count(),
            "period updated"
        );
        Ok(())
    }

    /// Remove and return the most recently added series.
    ///
    /// Fails with [`AdfError::EmptySeries`] if the repository is empty.
    /// Additive codes stay registered; seed and harvest times past the new
    /// coverage are cleared.
    pub fn remove_series(&mut self) -> Result<Series> {
        let removed = self.series.pop().ok_or(AdfError::EmptySeries)?;
        self.clear_uncovered_times();
        debug!(
            series = self.series.len(),
            periods = self.period_count(),
            "series removed"
        );
        Ok(removed)
    }

    /// Remove the most recent period.
    ///
    /// Decrements the last series' `repeated`, dropping the series once it
    /// reaches zero. Fails with [`AdfError::EmptySeries`] if the repository
    /// is empty. Seed and harvest times past the new coverage are cleared.
    pub fn remove_period(&mut self) -> Result<()> {
        let last = self.series.last_mut().ok_or(AdfError::EmptySeries)?;
        if last.repeated > 1 {
            last.repeated -= 1;
        } else {
            self.series.pop();
        }
        self.clear_uncovered_times();
        debug!(
            series = self.series.len(),
            periods = self.period_count(),
            "period removed"
        );
        Ok(())
    }

    // ── Encoding ────────────────────────────────────────────────

    /// Exact length of [`marshal`](Self::marshal)'s output.
    pub fn size_bytes(&self) -> usize {
        codec::header_size(&self.header)
            + codec::metadata_size(&self.metadata)
            + self
                .series
                .iter()
                .map(|s| codec::series_size(&self.header, s))
                .sum::<usize>()
    }

    /// Encode into a new buffer of exactly [`size_bytes`](Self::size_bytes).
    pub fn marshal(&self) -> Result<Vec<u8>> {
        let size = self.size_bytes();
        let mut buf = vec![0u8; size];
        let written = self.marshal_into(&mut buf).map_err(|e| {
            if e.is_null_input() {
                // The buffer was sized by size_bytes, so running out of room
                // means the size computation disagrees with the encoder.
                AdfError::RuntimeError
            } else {
                e
            }
        })?;
        if written != size {
            return Err(AdfError::RuntimeError);
        }
        debug!(bytes = size, series = self.series.len(), "container marshalled");
        Ok(buf)
    }

    /// Encode into `target`, returning the number of bytes written.
    ///
    /// Fails with [`AdfError::HeaderCorrupted`] if the header would not
    /// decode, and with [`AdfError::NullTarget`] if `target` is shorter than
    /// [`size_bytes`](Self::size_bytes); nothing is written in either case.
    pub fn marshal_into(&self, target: &mut [u8]) -> Result<usize> {
        self.header.validate().inspect_err(|e| {
            warn!(error = %e, "refusing to encode an invalid header");
        })?;
        let total = target.len();
        if total < self.size_bytes() {
            return Err(AdfError::NullTarget);
        }
        let series_count =
            u32::try_from(self.series.len()).map_err(|_| AdfError::RuntimeError)?;
        let mut w: &mut [u8] = target;
        codec::encode_header(&mut w, &self.header)?;
        codec::encode_metadata(&mut w, &self.metadata, series_count)?;
        for s in &self.series {
            codec::encode_series(&mut w, &self.header, s)?;
        }
        Ok(total - w.len())
    }

    /// Decode a container.
    ///
    /// The whole input must be consumed: partial containers are never
    /// returned, and trailing bytes are [`AdfError::SeriesCorrupted`].
    pub fn unmarshal(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err(AdfError::NullSource);
        }
        let mut r = bytes;
        let offset = |r: &[u8]| bytes.len() - r.len();

        let header = codec::decode_header(&mut r).map_err(|e| {
            warn!(section = "header", offset = offset(r), error = %e, "decode rejected");
            e
        })?;
        let (metadata, series_count) = codec::decode_metadata(&mut r).map_err(|e| {
            let e = match e {
                AdfError::NullMetaSource => AdfError::MetadataCorrupted,
                other => other,
            };
            warn!(section = "metadata", offset = offset(r), error = %e, "decode rejected");
            e
        })?;

        // The remaining input bounds how many series can follow.
        let fit = r.len() / codec::min_series_size(&header);
        let mut series = Vec::with_capacity((series_count as usize).min(fit));
        for index in 0..series_count {
            let s = codec::decode_series(&mut r, &header).map_err(|e| {
                let e = match e {
                    AdfError::NullSeriesSource => AdfError::SeriesCorrupted,
                    other => other,
                };
                warn!(section = "series", index, offset = offset(r), error = %e, "decode rejected");
                e
            })?;
            if !metadata.covers(&s) {
                warn!(index, "series uses an unregistered additive code");
                return Err(AdfError::MetadataCorrupted);
            }
            series.push(s);
        }
        if !r.is_empty() {
            warn!(trailing = r.len(), "trailing bytes after last series");
            return Err(AdfError::SeriesCorrupted);
        }
        let coverage = u64::from(metadata.period_sec).saturating_mul(
            series.iter().map(|s| u64::from(s.repeated)).sum::<u64>(),
        );
        if !metadata.times_within(coverage) {
            warn!(coverage, "lifecycle time outside the covered span");
            return Err(AdfError::MetadataCorrupted);
        }

        debug!(
            bytes = bytes.len(),
            series = series.len(),
            "container unmarshalled"
        );
        Ok(Self {
            header,
            metadata,
            series,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adf_core::{
        Additive, AdditiveList, FarmingTechnique, Matrix, PrecisionInfo, ReductionInfo,
        SoilDepthInfo, WaveInfo, DAY, MAX_ADDITIVES,
    };

    fn header() -> Header {
        Header::new(
            FarmingTechnique::Outdoor,
            WaveInfo::new(400, 700, 3),
            SoilDepthInfo::new(0, 500, 2),
            ReductionInfo::default(),
            PrecisionInfo::default(),
            1,
        )
    }

    fn series(density: f32, repeated: u32) -> Series {
        Series {
            light_exposure: Matrix::from_rows(3, &[[0.1, 0.2, 0.3]]).unwrap(),
            soil_temp_c: Matrix::from_rows(2, &[[10.0, 10.5]]).unwrap(),
            env_temp_c: vec![20.0],
            water_use_ml: vec![5.0],
            ph: 7,
            p_bar: 1.0,
            soil_density_kg_m3: density,
            soil_additives: vec![Additive::new(1, 2.5)].into(),
            atm_additives: AdditiveList::new(),
            repeated,
        }
    }

    fn densities(adf: &Adf) -> Vec<(f32, u32)> {
        adf.series()
            .iter()
            .map(|s| (s.soil_density_kg_m3, s.repeated))
            .collect()
    }

    #[test]
    fn new_container_is_empty() {
        let adf = Adf::new(header(), DAY);
        assert_eq!(adf.series_count(), 0);
        assert_eq!(adf.period_count(), 0);
        assert_eq!(adf.coverage_secs(), 0);
        assert_eq!(adf.period_sec(), DAY);
        assert!(adf.series_at(0).is_none());
    }

    #[test]
    fn coverage_and_locate() {
        let mut adf = Adf::new(header(), 10);
        adf.add_series(series(1.0, 2)).unwrap();
        adf.add_series(series(2.0, 3)).unwrap();
        assert_eq!(adf.period_count(), 5);
        assert_eq!(adf.coverage_secs(), 50);
        assert_eq!(adf.locate(0), Ok((0, 0)));
        assert_eq!(adf.locate(19), Ok((0, 1)));
        assert_eq!(adf.locate(20), Ok((1, 0)));
        assert_eq!(adf.locate(49), Ok((1, 2)));
        assert_eq!(adf.locate(50), Err(AdfError::TimeOutOfBound));
        assert_eq!(adf.series_at(25).map(|s| s.soil_density_kg_m3), Some(2.0));
    }

    #[test]
    fn zero_period_covers_nothing() {
        let mut adf = Adf::new(header(), 0);
        adf.add_series(series(1.0, 1)).unwrap();
        assert_eq!(adf.coverage_secs(), 0);
        assert_eq!(
            adf.update_series(series(2.0, 1), 0),
            Err(AdfError::TimeOutOfBound)
        );
    }

    #[test]
    fn rejected_add_leaves_repository_unchanged() {
        let mut adf = Adf::new(header(), DAY);
        adf.add_series(series(1.0, 1)).unwrap();
        assert_eq!(
            adf.add_series(series(1.0, 0)),
            Err(AdfError::ZeroRepeatedSeries)
        );
        let mut wrong_shape = series(1.0, 1);
        wrong_shape.env_temp_c.push(1.0);
        assert_eq!(
            adf.add_series(wrong_shape),
            Err(AdfError::SeriesCorrupted)
        );
        assert_eq!(adf.series_count(), 1);
    }

    #[test]
    fn remove_series_is_lifo() {
        let mut adf = Adf::new(header(), DAY);
        assert_eq!(adf.remove_series(), Err(AdfError::EmptySeries));
        adf.add_series(series(1.0, 1)).unwrap();
        adf.add_series(series(2.0, 4)).unwrap();
        let removed = adf.remove_series().unwrap();
        assert_eq!(removed.soil_density_kg_m3, 2.0);
        assert_eq!(densities(&adf), vec![(1.0, 1)]);
    }

    #[test]
    fn remove_period_decrements_then_pops() {
        let mut adf = Adf::new(header(), DAY);
        adf.add_series(series(1.0, 1)).unwrap();
        adf.add_series(series(2.0, 2)).unwrap();
        adf.remove_period().unwrap();
        assert_eq!(densities(&adf), vec![(1.0, 1), (2.0, 1)]);
        adf.remove_period().unwrap();
        assert_eq!(densities(&adf), vec![(1.0, 1)]);
        adf.remove_period().unwrap();
        assert_eq!(adf.remove_period(), Err(AdfError::EmptySeries));
    }

    #[test]
    fn record_series_merges_equal_readings() {
        let mut adf = Adf::new(header(), DAY);
        adf.record_series(series(1.0, 1)).unwrap();
        adf.record_series(series(1.0, 2)).unwrap();
        adf.record_series(series(3.0, 1)).unwrap();
        adf.record_series(series(1.0, 1)).unwrap();
        assert_eq!(densities(&adf), vec![(1.0, 3), (3.0, 1), (1.0, 1)]);
        assert_eq!(
            adf.record_series(series(1.0, 0)),
            Err(AdfError::ZeroRepeatedSeries)
        );
    }

    #[test]
    fn record_series_uses_header_precision() {
        let mut h = header();
        h.precision_info.soil_density = 0.5;
        let mut adf = Adf::new(h, DAY);
        adf.record_series(series(1.0, 1)).unwrap();
        adf.record_series(series(1.4, 1)).unwrap();
        assert_eq!(densities(&adf), vec![(1.0, 2)]);
    }

    #[test]
    fn record_series_overflow_is_runtime_error() {
        let mut adf = Adf::new(header(), 1);
        adf.add_series(series(1.0, u32::MAX)).unwrap();
        assert_eq!(
            adf.record_series(series(1.0, 1)),
            Err(AdfError::RuntimeError)
        );
        assert_eq!(densities(&adf), vec![(1.0, u32::MAX)]);
    }

    #[test]
    fn update_series_replaces_whole_run() {
        let mut adf = Adf::new(header(), 10);
        adf.add_series(series(1.0, 3)).unwrap();
        adf.update_series(series(9.0, 1), 25).unwrap();
        assert_eq!(densities(&adf), vec![(9.0, 1)]);
    }

    #[test]
    fn update_period_splits_run() {
        let mut adf = Adf::new(header(), 10);
        adf.add_series(series(1.0, 5)).unwrap();
        adf.update_period(series(9.0, 1), 25).unwrap();
        assert_eq!(densities(&adf), vec![(1.0, 2), (9.0, 1), (1.0, 2)]);
        assert_eq!(adf.period_count(), 5);

        adf.update_period(series(7.0, 1), 0).unwrap();
        assert_eq!(
            densities(&adf),
            vec![(7.0, 1), (1.0, 1), (9.0, 1), (1.0, 2)]
        );

        adf.update_period(series(6.0, 1), 49).unwrap();
        assert_eq!(
            densities(&adf),
            vec![(7.0, 1), (1.0, 1), (9.0, 1), (1.0, 1), (6.0, 1)]
        );
        assert_eq!(
            adf.update_period(series(6.0, 1), 50),
            Err(AdfError::TimeOutOfBound)
        );
    }

    #[test]
    fn update_validates_after_locating() {
        let mut adf = Adf::new(header(), 10);
        assert_eq!(
            adf.update_series(series(1.0, 0), 0),
            Err(AdfError::TimeOutOfBound)
        );
        adf.add_series(series(1.0, 1)).unwrap();
        assert_eq!(
            adf.update_series(series(1.0, 0), 0),
            Err(AdfError::ZeroRepeatedSeries)
        );
        assert_eq!(densities(&adf), vec![(1.0, 1)]);
    }

    #[test]
    fn seed_and_harvest_need_coverage() {
        let mut adf = Adf::new(header(), DAY);
        assert_eq!(adf.set_seed_time(0), Err(AdfError::TimeOutOfBound));
        adf.add_series(series(1.0, 2)).unwrap();
        adf.set_seed_time(0).unwrap();
        adf.set_harvest_time(2 * u64::from(DAY) - 1).unwrap();
        assert_eq!(
            adf.set_harvest_time(2 * u64::from(DAY)),
            Err(AdfError::TimeOutOfBound)
        );
        assert_eq!(adf.seed_time(), Some(0));
        assert_eq!(adf.harvest_time(), Some(2 * u64::from(DAY) - 1));
    }

    #[test]
    fn additive_codes_accumulate_and_persist() {
        let mut adf = Adf::new(header(), DAY);
        let mut s = series(1.0, 1);
        s.atm_additives = vec![Additive::new(40, 0.1)].into();
        adf.add_series(s).unwrap();
        adf.remove_series().unwrap();
        assert_eq!(
            adf.additive_codes().iter().copied().collect::<Vec<_>>(),
            vec![1, 40]
        );
    }

    #[test]
    fn registry_overflow_is_atomic() {
        let mut adf = Adf::new(header(), DAY);
        let mut big = series(1.0, 1);
        big.soil_additives = (0..MAX_ADDITIVES as u32)
            .map(|c| Additive::new(c, 1.0))
            .collect();
        adf.add_series(big).unwrap();
        assert_eq!(adf.additive_codes().len(), MAX_ADDITIVES);

        let mut extra = series(2.0, 1);
        extra.atm_additives = vec![Additive::new(u32::MAX, 1.0)].into();
        assert_eq!(adf.add_series(extra), Err(AdfError::AdditiveOverflow));
        assert_eq!(adf.series_count(), 1);
        assert_eq!(adf.additive_codes().len(), MAX_ADDITIVES);
    }

    #[test]
    fn marshal_into_short_buffer() {
        let mut adf = Adf::new(header(), DAY);
        adf.add_series(series(1.0, 1)).unwrap();
        let mut buf = vec![0u8; adf.size_bytes() - 1];
        assert_eq!(adf.marshal_into(&mut buf), Err(AdfError::NullTarget));
        assert!(buf.iter().all(|&b| b == 0));

        let mut roomy = vec![0u8; adf.size_bytes() + 8];
        assert_eq!(adf.marshal_into(&mut roomy), Ok(adf.size_bytes()));
        assert_eq!(&roomy[..adf.size_bytes()], adf.marshal().unwrap().as_slice());
    }

    #[test]
    fn unmarshal_rejects_empty_and_trailing_input() {
        assert_eq!(Adf::unmarshal(&[]), Err(AdfError::NullSource));

        let mut adf = Adf::new(header(), DAY);
        adf.add_series(series(1.0, 1)).unwrap();
        let mut bytes = adf.marshal().unwrap();
        bytes.push(0);
        assert_eq!(Adf::unmarshal(&bytes), Err(AdfError::SeriesCorrupted));
    }

    #[test]
    fn unmarshal_rejects_unregistered_code() {
        let mut adf = Adf::new(header(), DAY);
        adf.add_series(series(1.0, 1)).unwrap();
        let mut bytes = adf.marshal().unwrap();
        // Registry holds code 1; rewrite it so the series' code is unknown.
        let meta_start = codec::HEADER_BASE_SIZE;
        let registry_code = meta_start + 4 + 1 + 1 + 2;
        bytes[registry_code..registry_code + 4].copy_from_slice(&2u32.to_le_bytes());
        let crc_at = meta_start + codec::metadata_size(adf.metadata()) - codec::CRC_SIZE;
        let crc = codec::checksum(&bytes[meta_start..crc_at]);
        bytes[crc_at..crc_at + 2].copy_from_slice(&crc.to_le_bytes());
        assert_eq!(Adf::unmarshal(&bytes), Err(AdfError::MetadataCorrupted));
    }

    #[test]
    fn inverted_wavelength_range_is_rejected_by_marshal() {
        let mut h = header();
        h.wave_info = WaveInfo::new(700, 400, 3);
        let mut adf = Adf::new(h, DAY);
        adf.add_series(series(1.0, 1)).unwrap();
        assert_eq!(adf.marshal(), Err(AdfError::HeaderCorrupted));

        let mut buf = vec![0u8; adf.size_bytes()];
        assert_eq!(adf.marshal_into(&mut buf), Err(AdfError::HeaderCorrupted));
        assert!(buf.iter().all(|&b| b == 0));
    }

    #[test]
    fn huge_declared_series_count_fails_without_reserving() {
        let mut adf = Adf::new(header(), DAY);
        adf.add_series(series(1.0, 1)).unwrap();
        let mut bytes = adf.marshal().unwrap();
        let meta_start = codec::HEADER_BASE_SIZE;
        let crc_at = meta_start + codec::metadata_size(adf.metadata()) - codec::CRC_SIZE;
        bytes[crc_at - 4..crc_at].copy_from_slice(&u32::MAX.to_le_bytes());
        let crc = codec::checksum(&bytes[meta_start..crc_at]);
        bytes[crc_at..crc_at + 2].copy_from_slice(&crc.to_le_bytes());
        assert_eq!(Adf::unmarshal(&bytes), Err(AdfError::SeriesCorrupted));
    }

    #[test]
    fn flipped_byte_in_any_section_is_that_sections_corruption() {
        let mut adf = Adf::new(header(), DAY);
        adf.add_series(series(1.0, 1)).unwrap();
        adf.add_series(series(2.0, 2)).unwrap();
        adf.set_seed_time(5).unwrap();
        let bytes = adf.marshal().unwrap();
        let meta_start = codec::HEADER_BASE_SIZE;
        let series_start = meta_start + codec::metadata_size(adf.metadata());

        let flip = |at: usize| {
            let mut b = bytes.clone();
            b[at] ^= 0x04;
            Adf::unmarshal(&b)
        };
        // Precision byte, period, second series' density.
        assert_eq!(flip(30), Err(AdfError::HeaderCorrupted));
        assert_eq!(flip(meta_start + 1), Err(AdfError::MetadataCorrupted));
        let second = series_start + codec::series_size(adf.header(), &adf.series()[0]);
        assert_eq!(flip(second + 34), Err(AdfError::SeriesCorrupted));
        assert_eq!(flip(bytes.len() - 1), Err(AdfError::SeriesCorrupted));
    }

    #[test]
    fn shrinking_coverage_clears_lifecycle_times() {
        let mut adf = Adf::new(header(), 10);
        adf.add_series(series(1.0, 2)).unwrap();
        adf.add_series(series(2.0, 3)).unwrap();
        adf.set_seed_time(5).unwrap();
        adf.set_harvest_time(45).unwrap();

        adf.remove_period().unwrap();
        assert_eq!(adf.harvest_time(), None);
        assert_eq!(adf.seed_time(), Some(5));

        adf.set_harvest_time(35).unwrap();
        adf.update_series(series(3.0, 1), 25).unwrap();
        assert_eq!(adf.coverage_secs(), 30);
        assert_eq!(adf.harvest_time(), None);

        adf.remove_series().unwrap();
        assert_eq!(adf.seed_time(), Some(5));
        adf.remove_series().unwrap();
        assert_eq!(adf.seed_time(), None);

        adf.add_series(series(1.0, 1)).unwrap();
        assert_eq!(Adf::unmarshal(&adf.marshal().unwrap()), Ok(adf));
    }

    #[test]
    fn unmarshal_rejects_lifecycle_time_past_coverage() {
        let mut adf = Adf::new(header(), 10);
        adf.add_series(series(1.0, 2)).unwrap();
        adf.set_seed_time(19).unwrap();
        let mut bytes = adf.marshal().unwrap();
        // period(4) + seed flag(1), then the seed time.
        let seed_at = codec::HEADER_BASE_SIZE + 5;
        bytes[seed_at..seed_at + 8].copy_from_slice(&20u64.to_le_bytes());
        let crc_at = codec::HEADER_BASE_SIZE + codec::metadata_size(adf.metadata()) - 2;
        let crc = codec::checksum(&bytes[codec::HEADER_BASE_SIZE..crc_at]);
        bytes[crc_at..crc_at + 2].copy_from_slice(&crc.to_le_bytes());
        assert_eq!(Adf::unmarshal(&bytes), Err(AdfError::MetadataCorrupted));
    }

    #[test]
    fn version_is_compiled_constant() {
        assert_eq!(Adf::version(), adf_core::VERSION);
    }

    #[test]
    fn dispose_consumes() {
        let adf = Adf::new(header(), DAY);
        adf.dispose();
    }
}
