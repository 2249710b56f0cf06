//! Binary encode/decode for the ADF format.
//!
//! All integers and floats are little-endian, with no alignment padding.
//! Counts are fixed-width prefixes (`u16` for additive lists and the
//! additive code registry, `u32` for the series count). Matrices and
//! per-chunk arrays carry no prefix: their shape comes from the header.
//!
//! A buffer opens with the four-byte [`SIGNATURE`]. The header, the
//! metadata section and every series each close with a CRC-16 trailer
//! ([`CRC_SIZE`] bytes) computed over that section's bytes, the header's
//! covering the signature too.
//!
//! Section decoders report a completely empty source as the section's
//! `Null*Source` error and a partial section or a checksum mismatch as the
//! section's corruption error. Section encoders report an exhausted output
//! as `Null*Target`.

use std::io::{self, Read, Write};

use adf_core::{
    Additive, AdditiveList, AdfError, FarmingTechnique, Header, Matrix, PrecisionInfo,
    ReductionInfo, Result, Series, SoilDepthInfo, WaveInfo, FORMAT_VERSION, MAX_ADDITIVES,
};
use crc::{Crc, Digest, CRC_16_IBM_3740};
use indexmap::IndexSet;
use tracing::warn;

use crate::metadata::Metadata;

/// Leading four bytes of every ADF buffer (`u32` LE).
pub const SIGNATURE: u32 = 0x4041_4446;

/// Size of the CRC-16 trailer closing each section.
pub const CRC_SIZE: usize = 2;

/// Size of an untranslated header, in bytes.
pub const HEADER_BASE_SIZE: usize = 4 // signature
    + 2 // version
    + 1 // farming technique
    + 2 + 2 + 2 // wave info
    + 1 // soil form
    + 2 + 2 // max soil depth, n depth
    + 7 // reduction info
    + 7 * 4 // precision info
    + 4 // n_chunks
    + CRC_SIZE;

/// Soil form byte: no translation field follows.
pub const SOIL_FORM_PLAIN: u8 = 0;
/// Soil form byte: a `u16` translation field follows.
pub const SOIL_FORM_TRANSLATED: u8 = 1;

/// Encoded size of one additive entry (code + concentration).
pub const ADDITIVE_SIZE: usize = 4 + 4;

// CRC-16, polynomial 0x1021, initial value 0xFFFF.
static SECTION_CRC: Crc<u16> = Crc::<u16>::new(&CRC_16_IBM_3740);

/// Section checksum of `bytes`.
pub fn checksum(bytes: &[u8]) -> u16 {
    SECTION_CRC.checksum(bytes)
}

/// Writer that checksums everything passing through it.
///
/// [`CrcWriter::seal`] appends the checksum to the inner writer.
struct CrcWriter<'a> {
    inner: &'a mut dyn Write,
    digest: Digest<'static, u16>,
}

impl<'a> CrcWriter<'a> {
    fn new(inner: &'a mut dyn Write) -> Self {
        Self {
            inner,
            digest: SECTION_CRC.digest(),
        }
    }

    fn seal(self) -> io::Result<()> {
        write_u16_le(self.inner, self.digest.finalize())
    }
}

impl Write for CrcWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.digest.update(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Read the trailer of the section spanning `start` up to the current
/// position of `r`, and compare it against the section's checksum.
fn verify_crc(start: &[u8], r: &mut &[u8], corrupt: AdfError) -> Result<()> {
    let section = &start[..start.len() - r.len()];
    let stored = read_u16_le(r).map_err(|_| corrupt)?;
    let computed = checksum(section);
    if stored != computed {
        warn!(stored, computed, error = %corrupt, "section checksum mismatch");
        return Err(corrupt);
    }
    Ok(())
}

// ── Primitive writers ───────────────────────────────────────────

/// Write a single byte.
pub fn write_u8(w: &mut dyn Write, v: u8) -> io::Result<()> {
    w.write_all(&[v])
}

/// Write a little-endian u16.
pub fn write_u16_le(w: &mut dyn Write, v: u16) -> io::Result<()> {
    w.write_all(&v.to_le_bytes())
}

/// Write a little-endian u32.
pub fn write_u32_le(w: &mut dyn Write, v: u32) -> io::Result<()> {
    w.write_all(&v.to_le_bytes())
}

/// Write a little-endian u64.
pub fn write_u64_le(w: &mut dyn Write, v: u64) -> io::Result<()> {
    w.write_all(&v.to_le_bytes())
}

/// Write a little-endian f32.
pub fn write_f32_le(w: &mut dyn Write, v: f32) -> io::Result<()> {
    w.write_all(&v.to_le_bytes())
}

/// Write a run of little-endian f32s with no length prefix.
pub fn write_f32_slice(w: &mut dyn Write, values: &[f32]) -> io::Result<()> {
    for &v in values {
        write_f32_le(w, v)?;
    }
    Ok(())
}

// ── Primitive readers ───────────────────────────────────────────

/// Read a single byte.
pub fn read_u8(r: &mut dyn Read) -> io::Result<u8> {
    let mut buf = [0u8; 1];
    r.read_exact(&mut buf)?;
    Ok(buf[0])
}

/// Read a little-endian u16.
pub fn read_u16_le(r: &mut dyn Read) -> io::Result<u16> {
    let mut buf = [0u8; 2];
    r.read_exact(&mut buf)?;
    Ok(u16::from_le_bytes(buf))
}

/// Read a little-endian u32.
pub fn read_u32_le(r: &mut dyn Read) -> io::Result<u32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

/// Read a little-endian u64.
pub fn read_u64_le(r: &mut dyn Read) -> io::Result<u64> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}

/// Read a little-endian f32.
pub fn read_f32_le(r: &mut dyn Read) -> io::Result<f32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(f32::from_le_bytes(buf))
}

/// Read `count` little-endian f32s.
///
/// The remaining input is checked before allocating, so a corrupt count
/// cannot trigger a huge allocation.
pub fn read_f32_vec(r: &mut &[u8], count: usize) -> io::Result<Vec<f32>> {
    let byte_len = count
        .checked_mul(4)
        .filter(|&n| n <= r.len())
        .ok_or_else(|| io::Error::from(io::ErrorKind::UnexpectedEof))?;
    let (head, tail) = r.split_at(byte_len);
    let values = head
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();
    *r = tail;
    Ok(values)
}

// ── Sizes ───────────────────────────────────────────────────────

/// Encoded size of `header`, signature and trailer included.
pub fn header_size(header: &Header) -> usize {
    if header.soil_info.is_translated() {
        HEADER_BASE_SIZE + 2
    } else {
        HEADER_BASE_SIZE
    }
}

/// Encoded size of `meta`, including the series count and the trailer.
pub fn metadata_size(meta: &Metadata) -> usize {
    // Presence flag, plus the u64 when present.
    let optional_time = |t: Option<u64>| -> usize {
        if t.is_some() {
            9
        } else {
            1
        }
    };
    4 // period_sec
        + optional_time(meta.seed_time)
        + optional_time(meta.harvest_time)
        + 2
        + 4 * meta.additive_codes.len()
        + 4 // series count
        + CRC_SIZE
}

/// Encoded size of an additive list (count prefix + entries).
pub fn additives_size(list: &AdditiveList) -> usize {
    2 + ADDITIVE_SIZE * list.len()
}

/// Encoded size of a series that fits `header`.
///
/// Chunked channels are sized from the header, not from the series, since
/// a valid series always has exactly `header.n_chunks` rows.
pub fn series_size(header: &Header, series: &Series) -> usize {
    series_fixed_size(header)
        + additives_size(&series.soil_additives)
        + additives_size(&series.atm_additives)
}

/// Smallest encoded size of a series under `header`: both additive lists
/// empty.
pub fn min_series_size(header: &Header) -> usize {
    series_fixed_size(header) + 2 * additives_size(&AdditiveList::new())
}

fn series_fixed_size(header: &Header) -> usize {
    let chunks = header.n_chunks as usize;
    let per_chunk = usize::from(header.wave_info.n_wavelengths)
        + usize::from(header.soil_info.n_depth)
        + 2; // env temp, water use
    chunks * per_chunk * 4
        + 1 // pH
        + 4 // p_bar
        + 4 // soil density
        + 4 // repeated
        + CRC_SIZE
}

// ── Header encode/decode ────────────────────────────────────────

/// Encode a header, preceded by the signature and followed by its trailer.
///
/// A header that would not decode (stale version, inverted wavelength
/// range) is [`AdfError::HeaderCorrupted`] and nothing is written.
pub fn encode_header(w: &mut dyn Write, header: &Header) -> Result<()> {
    header.validate()?;
    let target = |_: io::Error| AdfError::NullHeaderTarget;
    let mut w = CrcWriter::new(w);
    write_header_fields(&mut w, header).map_err(target)?;
    w.seal().map_err(target)
}

fn write_header_fields(w: &mut dyn Write, h: &Header) -> io::Result<()> {
    write_u32_le(w, SIGNATURE)?;
    write_u16_le(w, h.version)?;
    write_u8(w, h.farming_technique.into())?;
    write_u16_le(w, h.wave_info.min_wavelen_nm)?;
    write_u16_le(w, h.wave_info.max_wavelen_nm)?;
    write_u16_le(w, h.wave_info.n_wavelengths)?;
    if h.soil_info.is_translated() {
        write_u8(w, SOIL_FORM_TRANSLATED)?;
        write_u16_le(w, h.soil_info.translation_y())?;
    } else {
        write_u8(w, SOIL_FORM_PLAIN)?;
    }
    write_u16_le(w, h.soil_info.max_soil_depth_mm)?;
    write_u16_le(w, h.soil_info.n_depth)?;
    w.write_all(&h.reduction_info.to_bytes())?;
    for p in h.precision_info.to_array() {
        write_f32_le(w, p)?;
    }
    write_u32_le(w, h.n_chunks)
}

/// Decode and validate a header.
///
/// The signature and version are checked before anything else is read: a
/// foreign buffer or one from a different format version is
/// [`AdfError::HeaderCorrupted`] regardless of what follows.
pub fn decode_header(r: &mut &[u8]) -> Result<Header> {
    if r.is_empty() {
        return Err(AdfError::NullHeaderSource);
    }
    let start: &[u8] = *r;
    let bad = |_: io::Error| AdfError::HeaderCorrupted;

    let signature = read_u32_le(r).map_err(bad)?;
    if signature != SIGNATURE {
        warn!(found = signature, "not an ADF buffer");
        return Err(AdfError::HeaderCorrupted);
    }
    let version = read_u16_le(r).map_err(bad)?;
    if version != FORMAT_VERSION {
        warn!(found = version, expected = FORMAT_VERSION, "header version mismatch");
        return Err(AdfError::HeaderCorrupted);
    }
    let tec_byte = read_u8(r).map_err(bad)?;
    let farming_technique = FarmingTechnique::try_from(tec_byte).map_err(|v| {
        warn!(value = v, "unknown farming technique");
        AdfError::HeaderCorrupted
    })?;
    let wave_info = WaveInfo::new(
        read_u16_le(r).map_err(bad)?,
        read_u16_le(r).map_err(bad)?,
        read_u16_le(r).map_err(bad)?,
    );
    let translation_y = match read_u8(r).map_err(bad)? {
        SOIL_FORM_PLAIN => 0,
        SOIL_FORM_TRANSLATED => match read_u16_le(r).map_err(bad)? {
            // The translated form never carries a zero translation.
            0 => return Err(AdfError::HeaderCorrupted),
            y => y,
        },
        form => {
            warn!(form, "unknown soil depth form");
            return Err(AdfError::HeaderCorrupted);
        }
    };
    let soil_info = SoilDepthInfo::new(
        translation_y,
        read_u16_le(r).map_err(bad)?,
        read_u16_le(r).map_err(bad)?,
    );
    let mut reduction = [0u8; 7];
    r.read_exact(&mut reduction).map_err(bad)?;
    let reduction_info = ReductionInfo::from_bytes(reduction).map_err(|v| {
        warn!(value = v, "unknown reduction code");
        AdfError::HeaderCorrupted
    })?;
    let mut precision = [0f32; 7];
    for p in precision.iter_mut() {
        *p = read_f32_le(r).map_err(bad)?;
    }
    let n_chunks = read_u32_le(r).map_err(bad)?;
    verify_crc(start, r, AdfError::HeaderCorrupted)?;

    let header = Header {
        version,
        farming_technique,
        wave_info,
        soil_info,
        reduction_info,
        precision_info: PrecisionInfo::from_array(precision),
        n_chunks,
    };
    header.validate()?;
    Ok(header)
}

// ── Metadata encode/decode ──────────────────────────────────────

/// Encode the metadata section followed by the series count.
pub fn encode_metadata(w: &mut dyn Write, meta: &Metadata, series_count: u32) -> Result<()> {
    if meta.additive_codes.len() > MAX_ADDITIVES {
        return Err(AdfError::AdditiveOverflow);
    }
    let target = |_: io::Error| AdfError::NullMetaTarget;
    let mut w = CrcWriter::new(w);
    write_metadata_fields(&mut w, meta, series_count).map_err(target)?;
    w.seal().map_err(target)
}

fn write_optional_time(w: &mut dyn Write, t: Option<u64>) -> io::Result<()> {
    match t {
        Some(t) => {
            write_u8(w, 1)?;
            write_u64_le(w, t)
        }
        None => write_u8(w, 0),
    }
}

fn write_metadata_fields(w: &mut dyn Write, meta: &Metadata, series_count: u32) -> io::Result<()> {
    write_u32_le(w, meta.period_sec)?;
    write_optional_time(w, meta.seed_time)?;
    write_optional_time(w, meta.harvest_time)?;
    write_u16_le(w, meta.additive_codes.len() as u16)?;
    for &code in &meta.additive_codes {
        write_u32_le(w, code)?;
    }
    write_u32_le(w, series_count)
}

fn read_optional_time(r: &mut &[u8], field: &'static str) -> Result<Option<u64>> {
    let bad = |_: io::Error| AdfError::MetadataCorrupted;
    match read_u8(r).map_err(bad)? {
        0 => Ok(None),
        1 => Ok(Some(read_u64_le(r).map_err(bad)?)),
        flag => {
            warn!(field, flag, "invalid presence flag");
            Err(AdfError::MetadataCorrupted)
        }
    }
}

/// Decode the metadata section, returning it with the declared series count.
pub fn decode_metadata(r: &mut &[u8]) -> Result<(Metadata, u32)> {
    if r.is_empty() {
        return Err(AdfError::NullMetaSource);
    }
    let start: &[u8] = *r;
    let bad = |_: io::Error| AdfError::MetadataCorrupted;

    let period_sec = read_u32_le(r).map_err(bad)?;
    let seed_time = read_optional_time(r, "seed_time")?;
    let harvest_time = read_optional_time(r, "harvest_time")?;

    let n_codes = usize::from(read_u16_le(r).map_err(bad)?);
    if r.len() < 4 * n_codes {
        return Err(AdfError::MetadataCorrupted);
    }
    let mut additive_codes = IndexSet::with_capacity(n_codes);
    for _ in 0..n_codes {
        let code = read_u32_le(r).map_err(bad)?;
        if !additive_codes.insert(code) {
            warn!(code, "duplicate additive code in registry");
            return Err(AdfError::MetadataCorrupted);
        }
    }
    let series_count = read_u32_le(r).map_err(bad)?;
    verify_crc(start, r, AdfError::MetadataCorrupted)?;

    let meta = Metadata {
        period_sec,
        seed_time,
        harvest_time,
        additive_codes,
    };
    Ok((meta, series_count))
}

// ── Additive list encode/decode ─────────────────────────────────

/// Encode an additive list (`u16` count + entries).
///
/// Fails with [`AdfError::AdditiveOverflow`] if the list has more than
/// `u16::MAX` entries; nothing is written in that case.
pub fn encode_additives(w: &mut dyn Write, list: &AdditiveList) -> Result<()> {
    if !list.fits_wire() {
        return Err(AdfError::AdditiveOverflow);
    }
    write_additive_entries(w, list).map_err(|_| AdfError::NullAdditiveTarget)
}

fn write_additive_entries(w: &mut dyn Write, list: &AdditiveList) -> io::Result<()> {
    write_u16_le(w, list.len() as u16)?;
    for a in list {
        write_u32_le(w, a.code)?;
        write_f32_le(w, a.concentration)?;
    }
    Ok(())
}

/// Decode an additive list.
pub fn decode_additives(r: &mut &[u8]) -> Result<AdditiveList> {
    if r.is_empty() {
        return Err(AdfError::NullAdditiveSource);
    }
    let bad = |_: io::Error| AdfError::SeriesCorrupted;
    let count = usize::from(read_u16_le(r).map_err(bad)?);
    if r.len() < count * ADDITIVE_SIZE {
        return Err(AdfError::SeriesCorrupted);
    }
    let mut list = AdditiveList::with_capacity(count);
    for _ in 0..count {
        let code = read_u32_le(r).map_err(bad)?;
        let concentration = read_f32_le(r).map_err(bad)?;
        list.push(Additive::new(code, concentration));
    }
    Ok(list)
}

// ── Series encode/decode ────────────────────────────────────────

/// Encode one series laid out by `header`.
///
/// The series is validated against the header first, so the bytes written
/// always equal [`series_size`].
pub fn encode_series(w: &mut dyn Write, header: &Header, series: &Series) -> Result<()> {
    series.validate(header)?;
    let target = |_: io::Error| AdfError::NullSeriesTarget;
    let additive_target = |e: AdfError| match e {
        AdfError::NullAdditiveTarget => AdfError::NullSeriesTarget,
        other => other,
    };
    let mut crc_w = CrcWriter::new(w);
    let w: &mut dyn Write = &mut crc_w;

    write_f32_slice(w, series.light_exposure.as_slice()).map_err(target)?;
    write_f32_slice(w, series.soil_temp_c.as_slice()).map_err(target)?;
    write_f32_slice(w, &series.env_temp_c).map_err(target)?;
    write_f32_slice(w, &series.water_use_ml).map_err(target)?;
    write_u8(w, series.ph).map_err(target)?;
    write_f32_le(w, series.p_bar).map_err(target)?;
    write_f32_le(w, series.soil_density_kg_m3).map_err(target)?;
    encode_additives(w, &series.soil_additives).map_err(additive_target)?;
    encode_additives(w, &series.atm_additives).map_err(additive_target)?;
    write_u32_le(w, series.repeated).map_err(target)?;
    crc_w.seal().map_err(target)
}

fn read_matrix(r: &mut &[u8], rows: u32, columns: u16) -> Result<Matrix<f32>> {
    let columns = u32::from(columns);
    let count = (rows as usize)
        .checked_mul(columns as usize)
        .ok_or(AdfError::SeriesCorrupted)?;
    let data = read_f32_vec(r, count).map_err(|_| AdfError::SeriesCorrupted)?;
    Matrix::from_flat(rows, columns, data).map_err(|_| AdfError::RuntimeError)
}

/// Decode and validate one series laid out by `header`.
///
/// After the bytes are read and the trailer checked, the series goes through
/// [`Series::validate`]: `repeated == 0` is
/// [`AdfError::ZeroRepeatedSeries`], a header with zero chunks yields
/// [`AdfError::EmptySeries`].
pub fn decode_series(r: &mut &[u8], header: &Header) -> Result<Series> {
    if r.is_empty() {
        return Err(AdfError::NullSeriesSource);
    }
    let start: &[u8] = *r;
    let bad = |_: io::Error| AdfError::SeriesCorrupted;
    let in_series = |e: AdfError| match e {
        AdfError::NullAdditiveSource => AdfError::SeriesCorrupted,
        other => other,
    };
    let n_chunks = header.n_chunks;

    let light_exposure = read_matrix(r, n_chunks, header.wave_info.n_wavelengths)?;
    let soil_temp_c = read_matrix(r, n_chunks, header.soil_info.n_depth)?;
    let env_temp_c = read_f32_vec(r, n_chunks as usize).map_err(bad)?;
    let water_use_ml = read_f32_vec(r, n_chunks as usize).map_err(bad)?;
    let ph = read_u8(r).map_err(bad)?;
    let p_bar = read_f32_le(r).map_err(bad)?;
    let soil_density_kg_m3 = read_f32_le(r).map_err(bad)?;
    let soil_additives = decode_additives(r).map_err(in_series)?;
    let atm_additives = decode_additives(r).map_err(in_series)?;
    let repeated = read_u32_le(r).map_err(bad)?;
    verify_crc(start, r, AdfError::SeriesCorrupted)?;

    let series = Series {
        light_exposure,
        soil_temp_c,
        env_temp_c,
        water_use_ml,
        ph,
        p_bar,
        soil_density_kg_m3,
        soil_additives,
        atm_additives,
        repeated,
    };
    series.validate(header)?;
    Ok(series)
}
