//! Single-shot frame codec: one buffer, one length-prefixed frame.
//!
//! A frame is a 4-byte little-endian header holding the *uncompressed*
//! length, followed by the engine's compressed payload:
//!
//! ```text
//! offset 0..3 : little-endian u32 = uncompressed input length
//! offset 4..N : compressed payload, exactly as the engine emitted it
//! ```
//!
//! No magic number, no version, no checksum — those belong to the file
//! container ([`crate::io`]), not to in-memory frames. The header is what
//! makes decoding safe: the decoder allocates exactly the advertised size
//! and hands the engine a hard output bound.

use crate::block::compress::{compress_bound, compress_fast, ACCELERATION_DEFAULT};
use crate::block::decompress::decompress_safe;
use crate::block::types::MAX_INPUT_SIZE;

/// Size of the little-endian length header.
pub const HEADER_SIZE: usize = 4;

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

/// Failures shared by frame decoding and streaming sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// Input shorter than the 4-byte length header.
    InputTooShort,
    /// The header advertises a size beyond what the engine can represent;
    /// rejected before any allocation so a corrupt or hostile header cannot
    /// drive one.
    InvalidHeaderSize(u32),
    /// The engine found invalid compressed data at this payload offset.
    CorruptInput {
        /// Byte offset into the compressed payload.
        offset: usize,
    },
    /// A block-size id outside the supported range was supplied.
    InvalidBlockSizeId(u32),
}

impl core::fmt::Display for FrameError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FrameError::InputTooShort => write!(f, "input too short"),
            FrameError::InvalidHeaderSize(size) => {
                write!(f, "invalid size in header: 0x{:x}", size)
            }
            FrameError::CorruptInput { offset } => write!(f, "corrupt input at byte {}", offset),
            FrameError::InvalidBlockSizeId(id) => write!(f, "invalid block size id: {}", id),
        }
    }
}

impl std::error::Error for FrameError {}

// ─────────────────────────────────────────────────────────────────────────────
// Encode
// ─────────────────────────────────────────────────────────────────────────────

/// Frame `input`: length header plus compressed payload, exact length.
///
/// Empty input produces a header-only frame without touching the engine.
/// Compression itself cannot fail — worst case the payload grows within the
/// engine's bound, which is reserved up front.
///
/// # Panics
///
/// If `input` exceeds the engine's maximum block size (`MAX_INPUT_SIZE`,
/// just under 2 GiB); such a length cannot be represented in the header.
pub fn encode(input: &[u8]) -> Vec<u8> {
    encode_fast(input, ACCELERATION_DEFAULT)
}

/// [`encode`] with an explicit engine acceleration factor.
pub fn encode_fast(input: &[u8], acceleration: i32) -> Vec<u8> {
    let bound = compress_bound(input.len())
        .unwrap_or_else(|| panic!("input of {} bytes exceeds the maximum frame size", input.len()));
    let mut frame = Vec::with_capacity(HEADER_SIZE + bound);
    frame.extend_from_slice(&(input.len() as u32).to_le_bytes());
    if !input.is_empty() {
        // Bound was checked above; the engine cannot refuse this input.
        let _ = compress_fast(input, &mut frame, acceleration);
    }
    frame
}

// ─────────────────────────────────────────────────────────────────────────────
// Decode
// ─────────────────────────────────────────────────────────────────────────────

/// Decode one complete frame back into its original bytes.
///
/// The header is validated before anything is allocated; the payload is then
/// decompressed into a buffer of exactly the advertised size. On any failure
/// no partial output escapes.
pub fn decode(frame: &[u8]) -> Result<Vec<u8>, FrameError> {
    if frame.len() < HEADER_SIZE {
        return Err(FrameError::InputTooShort);
    }
    let advertised = u32::from_le_bytes(frame[..HEADER_SIZE].try_into().unwrap());
    if advertised > MAX_INPUT_SIZE as u32 {
        return Err(FrameError::InvalidHeaderSize(advertised));
    }
    if advertised == 0 {
        return Ok(Vec::new());
    }
    let expected = advertised as usize;
    let mut output = vec![0u8; expected];
    let written = decompress_safe(&frame[HEADER_SIZE..], &mut output)
        .map_err(|e| FrameError::CorruptInput { offset: e.offset })?;
    if written != expected {
        // The payload ran dry before filling the advertised size; the frame
        // is truncated or its header lies.
        return Err(FrameError::CorruptInput {
            offset: frame.len() - HEADER_SIZE,
        });
    }
    Ok(output)
}
