//! Cross-block streaming state for the block engine.
//!
//! Two owned, non-cloneable state types:
//! - [`EncodeStream`] — compression side: a contiguous history buffer that
//!   successive blocks are appended to, so each block's back-references may
//!   reach up to 64 KiB into earlier blocks.
//! - [`DecodeWindow`] — decompression side: the last 64 KiB of decoded
//!   plaintext, updated in place by every successful continuation decode.
//!
//! A window is only meaningful for the single logical stream it was created
//! for. Feeding it blocks from a different stream produces garbage output,
//! not an error; neither type can detect the mixup.

use super::compress::{compress_bound, compress_with_history, SrcTooLarge, ACCELERATION_DEFAULT};
use super::decompress::{decompress_safe_with_dict, DecompressError};
use super::types::WINDOW_SIZE;

/// History kept beyond the window before the encode buffer is compacted.
/// Compacting on every block would be quadratic; a slack of one extra window
/// keeps amortized cost linear while preserving full reference reach.
const ENCODE_COMPACT_TRIGGER: usize = 2 * WINDOW_SIZE;

// ─────────────────────────────────────────────────────────────────────────────
// EncodeStream
// ─────────────────────────────────────────────────────────────────────────────

/// Streaming block compressor.
///
/// Each [`compress_next`](Self::compress_next) call appends the input to the
/// internal history and compresses it against everything still inside the
/// 64 KiB window, producing blocks that only a decoder carrying the matching
/// [`DecodeWindow`] (fed the same blocks, in the same order) can decode.
#[derive(Default)]
pub struct EncodeStream {
    history: Vec<u8>,
    acceleration: i32,
}

impl EncodeStream {
    /// Fresh stream with empty history and default acceleration.
    pub fn new() -> Self {
        Self::with_acceleration(ACCELERATION_DEFAULT)
    }

    /// Fresh stream with an explicit acceleration factor for every block.
    pub fn with_acceleration(acceleration: i32) -> Self {
        Self {
            history: Vec::new(),
            acceleration,
        }
    }

    /// Compress the next block of the stream, returning its compressed form.
    ///
    /// The input becomes part of the history whether or not the caller keeps
    /// the compressed block, mirroring what the matching decoder will hold
    /// after decoding it.
    pub fn compress_next(&mut self, src: &[u8]) -> Result<Vec<u8>, SrcTooLarge> {
        let bound = compress_bound(src.len()).ok_or(SrcTooLarge(src.len()))?;
        if self.history.len() > ENCODE_COMPACT_TRIGGER {
            let cut = self.history.len() - WINDOW_SIZE;
            self.history.drain(..cut);
        }
        let from = self.history.len();
        self.history.extend_from_slice(src);
        let mut dst = Vec::with_capacity(bound);
        compress_with_history(&self.history, from, self.acceleration, &mut dst);
        Ok(dst)
    }

    /// Bytes of history currently available for back-references.
    pub fn history_len(&self) -> usize {
        self.history.len().min(WINDOW_SIZE)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// DecodeWindow
// ─────────────────────────────────────────────────────────────────────────────

/// Decoder-side window state.
///
/// Constructed empty, mutated in place by every successful
/// [`decode_continue`](Self::decode_continue), never shared and never reset:
/// a new logical stream needs a new window. After a decode error the
/// contents are unspecified and the window must be discarded.
#[derive(Default)]
pub struct DecodeWindow {
    history: Vec<u8>,
}

impl DecodeWindow {
    /// Empty window: the next decode may not reference any history.
    pub fn new() -> Self {
        Self {
            history: Vec::new(),
        }
    }

    /// Decode one block against the current window, then absorb the output
    /// into the window so the following block's references resolve.
    ///
    /// `dst_capacity` bounds the decoded size of this block; it comes from
    /// the stream's block-size parameter, not from the data itself.
    pub fn decode_continue(
        &mut self,
        src: &[u8],
        dst_capacity: usize,
    ) -> Result<Vec<u8>, DecompressError> {
        let mut dst = vec![0u8; dst_capacity];
        let n = decompress_safe_with_dict(src, &mut dst, &self.history)?;
        dst.truncate(n);
        self.absorb(&dst);
        Ok(dst)
    }

    /// Record a block that was stored uncompressed: it is part of the
    /// decoded stream, so later back-references may reach into it.
    pub fn record_raw(&mut self, block: &[u8]) {
        self.absorb(block);
    }

    /// Bytes of decoded history currently retained.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    fn absorb(&mut self, output: &[u8]) {
        if output.len() >= WINDOW_SIZE {
            self.history.clear();
            self.history
                .extend_from_slice(&output[output.len() - WINDOW_SIZE..]);
            return;
        }
        self.history.extend_from_slice(output);
        if self.history.len() > WINDOW_SIZE {
            let cut = self.history.len() - WINDOW_SIZE;
            self.history.drain(..cut);
        }
    }
}
