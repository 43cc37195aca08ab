//! Container writer: one input file to one compressed container file.
//!
//! The input is read in block-size chunks. Each chunk is compressed with the
//! engine (linked mode threads an [`EncodeStream`] across chunks) and stored
//! compressed — or raw with the high size bit set, whenever compression did
//! not actually shrink it. Checksums are xxHash32 throughout.

use std::io::{Read, Write};

use xxhash_rust::xxh32::Xxh32;

use super::file_io::{open_dst_file, open_src_file};
use super::prefs::{display_level, Prefs, MAGICNUMBER};
use super::ContainerError;
use crate::block::compress::{compress_bound, compress_fast, ACCELERATION_DEFAULT};
use crate::block::stream::EncodeStream;
use crate::util::transfer_file_times;
use crate::xxhash::xxh32_oneshot;

/// High bit of a block-size word: the block is stored uncompressed.
pub(crate) const UNCOMPRESSED_BIT: u32 = 0x8000_0000;

/// End-of-blocks marker.
pub(crate) const END_MARK: u32 = 0;

/// Frame format version encoded in the descriptor's two top bits.
pub(crate) const FLG_VERSION: u8 = 0b01 << 6;

pub(crate) const FLG_BLOCK_INDEPENDENCE: u8 = 1 << 5;
pub(crate) const FLG_BLOCK_CHECKSUM: u8 = 1 << 4;
pub(crate) const FLG_CONTENT_SIZE: u8 = 1 << 3;
pub(crate) const FLG_CONTENT_CHECKSUM: u8 = 1 << 2;
pub(crate) const FLG_DICT_ID: u8 = 1 << 0;

// ---------------------------------------------------------------------------
// Result type
// ---------------------------------------------------------------------------

/// Byte counters from a successful container compression run.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompressStats {
    /// Total uncompressed source bytes processed.
    pub bytes_in: u64,
    /// Total compressed bytes written to the destination.
    pub bytes_out: u64,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Negative levels select the engine's acceleration; everything else runs
/// the default fast compressor.
pub(crate) fn acceleration_for_level(level: i32) -> i32 {
    if level < 0 {
        -level
    } else {
        ACCELERATION_DEFAULT
    }
}

/// Container blocks are capped at 4 MiB, far below the engine limit.
fn engine_limit(e: crate::block::compress::SrcTooLarge) -> ContainerError {
    ContainerError::Io(std::io::Error::new(
        std::io::ErrorKind::InvalidInput,
        e.to_string(),
    ))
}

/// Fill `buf` from `reader`, stopping only at EOF. Returns bytes filled.
fn read_to_capacity(reader: &mut impl Read, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}

/// Descriptor bytes (FLG, BD) for the given preferences.
fn frame_descriptor(prefs: &Prefs) -> [u8; 2] {
    let mut flg = FLG_VERSION;
    if prefs.block_independence {
        flg |= FLG_BLOCK_INDEPENDENCE;
    }
    if prefs.block_checksum {
        flg |= FLG_BLOCK_CHECKSUM;
    }
    if prefs.stream_checksum {
        flg |= FLG_CONTENT_CHECKSUM;
    }
    let bd = (prefs.block_size_id as u8) << 4;
    [flg, bd]
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Compress `input` into the container file `output`.
///
/// `level` follows the command-line convention: negative values map to the
/// engine's acceleration factor, non-negative values run the default fast
/// compressor. Source timestamps are transferred onto the output.
pub fn compress_filename(
    prefs: &Prefs,
    input: &str,
    output: &str,
    level: i32,
) -> Result<CompressStats, ContainerError> {
    if level >= 3 {
        display_level(
            4,
            "high-compression levels are not available; using the fast compressor\n",
        );
    }
    let acceleration = acceleration_for_level(level);
    let block_size = prefs.effective_block_size();
    debug_assert!(block_size > 0);

    let mut reader = open_src_file(input)?;
    let mut writer = open_dst_file(prefs, output)?;
    let mut stats = CompressStats::default();

    // Magic + descriptor + header check byte.
    writer.write_all(&MAGICNUMBER.to_le_bytes())?;
    let descriptor = frame_descriptor(prefs);
    writer.write_all(&descriptor)?;
    writer.write_all(&[(xxh32_oneshot(&descriptor, 0) >> 8) as u8])?;
    stats.bytes_out += 7;

    let mut linked = (!prefs.block_independence).then(|| EncodeStream::with_acceleration(acceleration));
    let mut content_hash = prefs.stream_checksum.then(|| Xxh32::new(0));

    let mut src_block = vec![0u8; block_size];
    let mut compressed = Vec::with_capacity(compress_bound(block_size).unwrap_or(block_size));
    loop {
        let n = read_to_capacity(&mut reader, &mut src_block)?;
        if n == 0 {
            break;
        }
        let chunk = &src_block[..n];
        stats.bytes_in += n as u64;
        if let Some(hash) = content_hash.as_mut() {
            hash.update(chunk);
        }

        compressed.clear();
        match linked.as_mut() {
            Some(stream) => {
                compressed = stream.compress_next(chunk).map_err(engine_limit)?;
            }
            None => {
                compress_fast(chunk, &mut compressed, acceleration).map_err(engine_limit)?;
            }
        }

        // Store whichever representation is smaller.
        let (size_word, payload): (u32, &[u8]) = if compressed.len() >= n {
            (n as u32 | UNCOMPRESSED_BIT, chunk)
        } else {
            (compressed.len() as u32, &compressed)
        };
        writer.write_all(&size_word.to_le_bytes())?;
        writer.write_all(payload)?;
        stats.bytes_out += 4 + payload.len() as u64;
        if prefs.block_checksum {
            writer.write_all(&xxh32_oneshot(payload, 0).to_le_bytes())?;
            stats.bytes_out += 4;
        }

        display_level(
            3,
            &format!("\rRead : {} MiB   ", stats.bytes_in >> 20),
        );
    }

    writer.write_all(&END_MARK.to_le_bytes())?;
    stats.bytes_out += 4;
    if let Some(hash) = content_hash {
        writer.write_all(&hash.digest().to_le_bytes())?;
        stats.bytes_out += 4;
    }
    writer.flush()?;
    drop(writer);

    transfer_file_times(input, output);

    let ratio = if stats.bytes_in == 0 {
        0.0
    } else {
        stats.bytes_out as f64 * 100.0 / stats.bytes_in as f64
    };
    display_level(
        2,
        &format!(
            "Compressed {} bytes into {} bytes ==> {:.2}%\n",
            stats.bytes_in, stats.bytes_out, ratio
        ),
    );
    Ok(stats)
}
