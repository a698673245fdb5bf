//! Transcript file codec (spec §4.3, §6.1, C4).
//!
//! Bit-exact port of `aztec_common/streaming_transcript.{hpp,cpp}`: a 28-byte
//! network-byte-order manifest, an uncompressed G1 array, an uncompressed G2
//! array, and a trailing Blake2b-512 checksum. Writes are atomic (write to a
//! temp file in the same directory, then rename).

use std::fs::{self, File};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::bigint::{read_u32_be, write_u32_be};
use crate::checksum;
use crate::curve::{decode_g1, decode_g2, encode_g1, encode_g2, G1, G2};
use crate::error::{CoreError, CoreResult};

pub const MANIFEST_SIZE: usize = 28;
pub const G1_POINT_SIZE: usize = 64;
pub const G2_POINT_SIZE: usize = 128;

/// The 28-byte transcript header (spec §3, §6.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Manifest {
    pub transcript_number: u32,
    pub total_transcripts: u32,
    pub total_g1_points: u32,
    pub total_g2_points: u32,
    pub num_g1_points: u32,
    pub num_g2_points: u32,
    pub start_from: u32,
}

impl Manifest {
    pub fn to_bytes(&self) -> [u8; MANIFEST_SIZE] {
        let mut buf = [0u8; MANIFEST_SIZE];
        let fields = [
            self.transcript_number,
            self.total_transcripts,
            self.total_g1_points,
            self.total_g2_points,
            self.num_g1_points,
            self.num_g2_points,
            self.start_from,
        ];
        for (i, field) in fields.iter().enumerate() {
            let mut word = [0u8; 4];
            write_u32_be(*field, &mut word);
            buf[i * 4..i * 4 + 4].copy_from_slice(&word);
        }
        buf
    }

    pub fn from_bytes(buf: &[u8; MANIFEST_SIZE]) -> Self {
        let mut word = [0u8; 4];
        let mut read_field = |offset: usize| -> u32 {
            word.copy_from_slice(&buf[offset..offset + 4]);
            read_u32_be(&word)
        };
        Manifest {
            transcript_number: read_field(0),
            total_transcripts: read_field(4),
            total_g1_points: read_field(8),
            total_g2_points: read_field(12),
            num_g1_points: read_field(16),
            num_g2_points: read_field(20),
            start_from: read_field(24),
        }
    }

    /// Total size in bytes of the transcript file this manifest describes
    /// (spec §4.5.2's `get_transcript_size`).
    pub fn transcript_size(&self) -> usize {
        MANIFEST_SIZE
            + G1_POINT_SIZE * self.num_g1_points as usize
            + G2_POINT_SIZE * self.num_g2_points as usize
            + checksum::DIGEST_LENGTH
    }
}

fn io_err(path: &Path, source: std::io::Error) -> CoreError {
    CoreError::io(path, source)
}

/// Reads only the first 28 bytes of a transcript file.
pub fn read_manifest(path: &Path) -> CoreResult<Manifest> {
    let mut file = File::open(path).map_err(|e| io_err(path, e))?;
    let mut buf = [0u8; MANIFEST_SIZE];
    file.read_exact(&mut buf).map_err(|e| io_err(path, e))?;
    Ok(Manifest::from_bytes(&buf))
}

/// Reads the whole transcript file, validates the checksum, and decodes
/// every point.
pub fn read_transcript(path: &Path) -> CoreResult<(Manifest, Vec<G1>, Vec<G2>)> {
    let mut file = File::open(path).map_err(|e| io_err(path, e))?;
    let mut buffer = Vec::new();
    file.read_to_end(&mut buffer).map_err(|e| io_err(path, e))?;

    if buffer.len() < MANIFEST_SIZE + checksum::DIGEST_LENGTH {
        return Err(CoreError::FormatError {
            path: path.to_path_buf(),
            reason: "file shorter than manifest + checksum".to_string(),
        });
    }

    let message_length = buffer.len() - checksum::DIGEST_LENGTH;
    checksum::validate(&buffer, message_length, path)?;

    let mut manifest_bytes = [0u8; MANIFEST_SIZE];
    manifest_bytes.copy_from_slice(&buffer[0..MANIFEST_SIZE]);
    let manifest = Manifest::from_bytes(&manifest_bytes);

    let g1_bytes = manifest.num_g1_points as usize * G1_POINT_SIZE;
    let g2_bytes = manifest.num_g2_points as usize * G2_POINT_SIZE;
    let expected_len = MANIFEST_SIZE + g1_bytes + g2_bytes + checksum::DIGEST_LENGTH;
    if buffer.len() != expected_len {
        return Err(CoreError::FormatError {
            path: path.to_path_buf(),
            reason: format!(
                "expected {expected_len} bytes for manifest-declared point counts, found {}",
                buffer.len()
            ),
        });
    }

    let g1_start = MANIFEST_SIZE;
    let g2_start = g1_start + g1_bytes;
    let g1_points = decode_g1_array(&buffer[g1_start..g1_start + g1_bytes])?;
    let g2_points = decode_g2_array(&buffer[g2_start..g2_start + g2_bytes])?;

    Ok((manifest, g1_points, g2_points))
}

fn decode_g1_array(buf: &[u8]) -> CoreResult<Vec<G1>> {
    buf.chunks_exact(G1_POINT_SIZE)
        .enumerate()
        .map(|(i, chunk)| decode_g1(chunk, &format!("g1[{i}]")))
        .collect()
}

fn decode_g2_array(buf: &[u8]) -> CoreResult<Vec<G2>> {
    buf.chunks_exact(G2_POINT_SIZE)
        .enumerate()
        .map(|(i, chunk)| decode_g2(chunk, &format!("g2[{i}]")))
        .collect()
}

/// Resolves a possibly-negative logical offset (negative counts from the
/// end) and a count into a clamped `[start, end)` range over `total` items,
/// per spec §4.3's windowed-read contract.
fn clamp_range(offset: i64, count: usize, total: u32) -> (usize, usize) {
    let total = total as i64;
    let start = if offset < 0 { total + offset } else { offset };
    if start < 0 || start >= total {
        return (0, 0);
    }
    let start = start as usize;
    let available = (total as usize).saturating_sub(start);
    (start, start + available.min(count))
}

/// Seeks to the byte offset of the requested G1 range and reads only those
/// bytes, without touching the rest of the file (used by the verifier for
/// efficient anchor extraction).
pub fn read_g1_slice(path: &Path, offset: i64, count: usize) -> CoreResult<Vec<G1>> {
    let manifest = read_manifest(path)?;
    let (start, end) = clamp_range(offset, count, manifest.num_g1_points);
    if start == end {
        return Ok(Vec::new());
    }
    let mut file = File::open(path).map_err(|e| io_err(path, e))?;
    let byte_offset = MANIFEST_SIZE + start * G1_POINT_SIZE;
    file.seek(SeekFrom::Start(byte_offset as u64))
        .map_err(|e| io_err(path, e))?;
    let mut buf = vec![0u8; (end - start) * G1_POINT_SIZE];
    file.read_exact(&mut buf).map_err(|e| io_err(path, e))?;
    decode_g1_array(&buf)
}

/// Seeks to the byte offset of the requested G2 range and reads only those
/// bytes.
pub fn read_g2_slice(path: &Path, offset: i64, count: usize) -> CoreResult<Vec<G2>> {
    let manifest = read_manifest(path)?;
    let (start, end) = clamp_range(offset, count, manifest.num_g2_points);
    if start == end {
        return Ok(Vec::new());
    }
    let mut file = File::open(path).map_err(|e| io_err(path, e))?;
    let g1_section = manifest.num_g1_points as usize * G1_POINT_SIZE;
    let byte_offset = MANIFEST_SIZE + g1_section + start * G2_POINT_SIZE;
    file.seek(SeekFrom::Start(byte_offset as u64))
        .map_err(|e| io_err(path, e))?;
    let mut buf = vec![0u8; (end - start) * G2_POINT_SIZE];
    file.read_exact(&mut buf).map_err(|e| io_err(path, e))?;
    decode_g2_array(&buf)
}

/// Builds the transcript byte buffer and writes it atomically: a sibling
/// temp file is written and flushed, then renamed into place, so a reader
/// never observes a partially-written transcript.
pub fn write_transcript(
    path: &Path,
    manifest: &Manifest,
    g1_points: &[G1],
    g2_points: &[G2],
) -> CoreResult<()> {
    let payload_len =
        MANIFEST_SIZE + G1_POINT_SIZE * g1_points.len() + G2_POINT_SIZE * g2_points.len();
    let mut buffer = Vec::with_capacity(payload_len + checksum::DIGEST_LENGTH);
    buffer.extend_from_slice(&manifest.to_bytes());
    for point in g1_points {
        buffer.extend_from_slice(&encode_g1(point));
    }
    for point in g2_points {
        buffer.extend_from_slice(&encode_g2(point));
    }
    let digest = checksum::create(&buffer);
    buffer.extend_from_slice(&digest);

    let tmp_path = path.with_extension("tmp");
    {
        let mut file = File::create(&tmp_path).map_err(|e| io_err(&tmp_path, e))?;
        file.write_all(&buffer).map_err(|e| io_err(&tmp_path, e))?;
        file.sync_all().map_err(|e| io_err(&tmp_path, e))?;
    }
    fs::rename(&tmp_path, path).map_err(|e| io_err(path, e))?;
    Ok(())
}

/// `<dir>/transcript<n>.dat`
pub fn input_path(dir: &Path, n: u32) -> std::path::PathBuf {
    dir.join(format!("transcript{n}.dat"))
}

/// `<dir>/transcript<n>_out.dat`
pub fn output_path(dir: &Path, n: u32) -> std::path::PathBuf {
    dir.join(format!("transcript{n}_out.dat"))
}
