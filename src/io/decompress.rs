//! Container reader: parse frames, verify checksums, restore the content.
//!
//! Accepts concatenated frames and silently skips skippable frames. Each
//! frame carries its own descriptor, so block size, linking mode, and
//! checksum settings come from the data, not from caller preferences —
//! `Prefs` only contributes the overwrite policy here.

use std::io::{Read, Write};

use xxhash_rust::xxh32::Xxh32;

use super::compress::{
    END_MARK, FLG_BLOCK_CHECKSUM, FLG_BLOCK_INDEPENDENCE, FLG_CONTENT_CHECKSUM, FLG_CONTENT_SIZE,
    FLG_DICT_ID, FLG_VERSION, UNCOMPRESSED_BIT,
};
use super::file_io::{open_dst_file, open_src_file};
use super::prefs::{container_block_size, display_level, Prefs, MAGICNUMBER, SKIPPABLE0, SKIPPABLE_MASK};
use super::ContainerError;
use crate::block::decompress::decompress_safe;
use crate::block::stream::DecodeWindow;
use crate::util::transfer_file_times;
use crate::xxhash::xxh32_oneshot;

/// Returns `true` if `magic` is in the skippable-frame range.
#[inline]
pub fn is_skippable_magic_number(magic: u32) -> bool {
    (magic & SKIPPABLE_MASK) == SKIPPABLE0
}

// ---------------------------------------------------------------------------
// Read helpers
// ---------------------------------------------------------------------------

/// Read exactly `buf.len()` bytes, or 0 at a clean EOF. Anything in between
/// is a truncated stream.
fn read_exact_or_eof(reader: &mut impl Read, buf: &mut [u8]) -> Result<usize, ContainerError> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..])?;
        if n == 0 {
            if filled == 0 {
                return Ok(0);
            }
            return Err(ContainerError::Header("truncated stream"));
        }
        filled += n;
    }
    Ok(filled)
}

fn read_u32_le(reader: &mut impl Read) -> Result<u32, ContainerError> {
    let mut buf = [0u8; 4];
    if read_exact_or_eof(reader, &mut buf)? != 4 {
        return Err(ContainerError::Header("truncated stream"));
    }
    Ok(u32::from_le_bytes(buf))
}

// ---------------------------------------------------------------------------
// Frame decoding
// ---------------------------------------------------------------------------

/// Parsed frame descriptor.
struct FrameHeader {
    block_independence: bool,
    block_checksum: bool,
    content_checksum: bool,
    max_block_size: usize,
}

/// Read and validate the descriptor that follows a frame magic.
fn read_frame_header(reader: &mut impl Read) -> Result<FrameHeader, ContainerError> {
    let mut descriptor = Vec::with_capacity(2);
    let mut flg_bd = [0u8; 2];
    if read_exact_or_eof(reader, &mut flg_bd)? != 2 {
        return Err(ContainerError::Header("truncated frame descriptor"));
    }
    descriptor.extend_from_slice(&flg_bd);
    let [flg, bd] = flg_bd;

    if flg & 0b1100_0000 != FLG_VERSION {
        return Err(ContainerError::Header("unsupported frame version"));
    }
    if flg & 0b0000_0010 != 0 || bd & 0b1000_1111 != 0 {
        return Err(ContainerError::Header("reserved bits set"));
    }
    if flg & FLG_DICT_ID != 0 {
        return Err(ContainerError::Header("dictionary id not supported"));
    }
    // A content-size field is tolerated on read even though the writer never
    // emits one; it participates in the header checksum.
    if flg & FLG_CONTENT_SIZE != 0 {
        let mut content_size = [0u8; 8];
        if read_exact_or_eof(reader, &mut content_size)? != 8 {
            return Err(ContainerError::Header("truncated frame descriptor"));
        }
        descriptor.extend_from_slice(&content_size);
    }

    let mut hc = [0u8; 1];
    if read_exact_or_eof(reader, &mut hc)? != 1 {
        return Err(ContainerError::Header("truncated frame descriptor"));
    }
    let expected = (xxh32_oneshot(&descriptor, 0) >> 8) as u8;
    if hc[0] != expected {
        return Err(ContainerError::HeaderChecksum {
            expected,
            actual: hc[0],
        });
    }

    let bsid = (bd >> 4) as u32;
    let max_block_size = container_block_size(bsid);
    if max_block_size == 0 {
        return Err(ContainerError::Header("invalid block size id"));
    }

    Ok(FrameHeader {
        block_independence: flg & FLG_BLOCK_INDEPENDENCE != 0,
        block_checksum: flg & FLG_BLOCK_CHECKSUM != 0,
        content_checksum: flg & FLG_CONTENT_CHECKSUM != 0,
        max_block_size,
    })
}

/// Decode every block of one frame, writing plaintext to `writer`.
fn decode_frame(
    reader: &mut impl Read,
    writer: &mut impl Write,
    header: &FrameHeader,
) -> Result<u64, ContainerError> {
    let mut window = (!header.block_independence).then(DecodeWindow::new);
    let mut content_hash = header.content_checksum.then(|| Xxh32::new(0));
    let mut decoded_total = 0u64;
    let mut block_index = 0u64;
    let mut block_buf = vec![0u8; header.max_block_size];

    loop {
        let size_word = read_u32_le(reader)?;
        if size_word == END_MARK {
            break;
        }
        let stored_raw = size_word & UNCOMPRESSED_BIT != 0;
        let data_len = (size_word & !UNCOMPRESSED_BIT) as usize;
        if data_len > header.max_block_size {
            return Err(ContainerError::Header("block larger than declared maximum"));
        }
        let mut data = vec![0u8; data_len];
        if data_len > 0 && read_exact_or_eof(reader, &mut data)? != data_len {
            return Err(ContainerError::Header("truncated stream"));
        }
        if header.block_checksum {
            let stored = read_u32_le(reader)?;
            if xxh32_oneshot(&data, 0) != stored {
                return Err(ContainerError::BlockChecksum { block: block_index });
            }
        }

        let plain: &[u8] = if stored_raw {
            if let Some(w) = window.as_mut() {
                w.record_raw(&data);
            }
            &data
        } else {
            let n = match window.as_mut() {
                Some(w) => {
                    let out = w
                        .decode_continue(&data, header.max_block_size)
                        .map_err(|source| ContainerError::Block {
                            block: block_index,
                            source,
                        })?;
                    block_buf[..out.len()].copy_from_slice(&out);
                    out.len()
                }
                None => decompress_safe(&data, &mut block_buf).map_err(|source| {
                    ContainerError::Block {
                        block: block_index,
                        source,
                    }
                })?,
            };
            &block_buf[..n]
        };

        writer.write_all(plain)?;
        decoded_total += plain.len() as u64;
        if let Some(hash) = content_hash.as_mut() {
            hash.update(plain);
        }
        block_index += 1;
        display_level(3, &format!("\rDecoded : {} MiB  ", decoded_total >> 20));
    }

    if let Some(hash) = content_hash {
        let stored = read_u32_le(reader)?;
        let actual = hash.digest();
        if stored != actual {
            return Err(ContainerError::ContentChecksum {
                expected: stored,
                actual,
            });
        }
    }
    Ok(decoded_total)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Decompress the container file `input` into `output`.
///
/// Handles any number of concatenated frames, skipping skippable frames.
/// Returns the total number of decoded bytes.
pub fn decompress_filename(
    prefs: &Prefs,
    input: &str,
    output: &str,
) -> Result<u64, ContainerError> {
    let mut reader = open_src_file(input)?;
    let mut writer = open_dst_file(prefs, output)?;

    let mut decoded_total = 0u64;
    let mut frames = 0u32;
    loop {
        let mut magic_bytes = [0u8; 4];
        if read_exact_or_eof(&mut reader, &mut magic_bytes)? == 0 {
            break;
        }
        let magic = u32::from_le_bytes(magic_bytes);

        if is_skippable_magic_number(magic) {
            let skip_len = read_u32_le(&mut reader)? as u64;
            let copied = std::io::copy(&mut (&mut reader).take(skip_len), &mut std::io::sink())?;
            if copied != skip_len {
                return Err(ContainerError::Header("truncated skippable frame"));
            }
            display_level(4, &format!("Skipped {} bytes of user data\n", skip_len));
            continue;
        }
        if magic != MAGICNUMBER {
            return Err(ContainerError::BadMagic(magic));
        }

        let header = read_frame_header(&mut reader)?;
        decoded_total += decode_frame(&mut reader, &mut writer, &header)?;
        frames += 1;
    }
    if frames == 0 {
        return Err(ContainerError::Header("no frame detected"));
    }

    writer.flush()?;
    drop(writer);
    transfer_file_times(input, output);

    display_level(
        2,
        &format!("Successfully decoded {} bytes\n", decoded_total),
    );
    Ok(decoded_total)
}
