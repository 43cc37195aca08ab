//! Stateful streaming-decode sessions.
//!
//! A [`StreamDecoder`] owns one decode window and turns a sequence of frames
//! (produced in order by a streaming encoder) back into plaintext chunks,
//! preserving back-reference continuity across calls. One session per
//! logical stream: the window is created empty, never shared, never reset.
//!
//! Unlike [`crate::frame::decode`], the output buffer here is sized by a
//! block-size id — these are fixed-size blocks of a block-structured stream,
//! not arbitrary single buffers — so the frame header is checked for
//! presence but not used for sizing.

use crate::block::stream::DecodeWindow;
use crate::frame::{FrameError, HEADER_SIZE};

/// Default block-size id: `1 << (8 + 2*7)` = 4 MiB decode buffers.
pub const DEFAULT_BLOCK_SIZE_ID: u32 = 7;

/// Largest accepted block-size id; anything above would resolve to a buffer
/// the engine's signed-32-bit sizes cannot express.
pub const MAX_BLOCK_SIZE_ID: u32 = 11;

/// Resolve a block-size id to its decode-buffer size: `1 << (8 + 2*id)`.
///
/// Returns `None` outside `0..=`[`MAX_BLOCK_SIZE_ID`]; rejecting the id
/// happens before any buffer of that size could be allocated.
pub fn block_size_from_id(id: u32) -> Option<usize> {
    if id > MAX_BLOCK_SIZE_ID {
        return None;
    }
    Some(1usize << (8 + 2 * id))
}

/// Streaming decoder session.
///
/// Not `Clone`: duplicating the window would silently desynchronize every
/// subsequent decode on both copies. Calls must be serialized by the owner;
/// the session performs no internal locking.
///
/// # After a decode error
///
/// When [`decode_next`](Self::decode_next) reports corruption, the window
/// contents are unspecified: the failed frame may have been partially
/// applied. The session cannot produce correct output for any further frame
/// of the stream — drop it and, if the source can be re-obtained, start a
/// new session from the beginning. There is deliberately no reset-on-error.
#[derive(Default)]
pub struct StreamDecoder {
    window: DecodeWindow,
}

impl StreamDecoder {
    /// New session with an empty window. No engine state is touched until
    /// the first frame arrives.
    pub fn new() -> Self {
        Self {
            window: DecodeWindow::new(),
        }
    }

    /// Decode the next frame of the stream, returning its plaintext chunk.
    ///
    /// `block_size_id` fixes the decode-buffer size (see
    /// [`block_size_from_id`]); pass [`DEFAULT_BLOCK_SIZE_ID`] unless the
    /// producing stream used a different block size. Frames must arrive in
    /// exactly their production order — there is no reordering, buffering,
    /// or skip-ahead.
    pub fn decode_next(
        &mut self,
        frame_bytes: &[u8],
        block_size_id: u32,
    ) -> Result<Vec<u8>, FrameError> {
        if frame_bytes.len() < HEADER_SIZE {
            return Err(FrameError::InputTooShort);
        }
        let capacity = block_size_from_id(block_size_id)
            .ok_or(FrameError::InvalidBlockSizeId(block_size_id))?;
        self.decode_next_into_capacity(frame_bytes, capacity)
    }

    /// [`decode_next`](Self::decode_next) with an explicit buffer capacity
    /// instead of a block-size id.
    ///
    /// A capacity of zero is a degenerate no-op: it returns an empty chunk
    /// without calling the engine and without touching the window, so a
    /// following real decode behaves as if this call never happened.
    pub fn decode_next_into_capacity(
        &mut self,
        frame_bytes: &[u8],
        dst_capacity: usize,
    ) -> Result<Vec<u8>, FrameError> {
        if frame_bytes.len() < HEADER_SIZE {
            return Err(FrameError::InputTooShort);
        }
        if dst_capacity == 0 {
            return Ok(Vec::new());
        }
        let payload = &frame_bytes[HEADER_SIZE..];
        self.window
            .decode_continue(payload, dst_capacity)
            .map_err(|e| FrameError::CorruptInput { offset: e.offset })
    }
}
