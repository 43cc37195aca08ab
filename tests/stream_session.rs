//! Streaming-decode session behavior: continuity across calls, the
//! state-dependence that makes a session more than a loop over the one-shot
//! decoder, and the validation / degenerate-input contract.

use lz4pack::block::stream::EncodeStream;
use lz4pack::frame::FrameError;
use lz4pack::stream::{block_size_from_id, StreamDecoder, DEFAULT_BLOCK_SIZE_ID, MAX_BLOCK_SIZE_ID};

/// Wrap one streaming-compressed block in the frame layout the session
/// expects: a little-endian length header followed by the payload.
fn frame_block(encoder: &mut EncodeStream, chunk: &[u8]) -> Vec<u8> {
    let mut frame = (chunk.len() as u32).to_le_bytes().to_vec();
    frame.extend_from_slice(&encoder.compress_next(chunk).unwrap());
    frame
}

/// A long plaintext whose windows resemble each other enough that a
/// streaming encoder will reference earlier blocks.
fn long_plaintext() -> Vec<u8> {
    b"All work and no play makes a dull stream session. "
        .iter()
        .copied()
        .cycle()
        .take(40_000)
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Continuity
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn ordered_frames_reconstruct_the_plaintext() {
    let plaintext = long_plaintext();
    let mut encoder = EncodeStream::new();
    let frames: Vec<Vec<u8>> = plaintext
        .chunks(1_000)
        .map(|chunk| frame_block(&mut encoder, chunk))
        .collect();

    let mut session = StreamDecoder::new();
    let mut reconstructed = Vec::new();
    for frame in &frames {
        // Id 4 -> 64 KiB buffers, ample for 1000-byte chunks.
        reconstructed.extend(session.decode_next(frame, 4).unwrap());
    }
    assert_eq!(reconstructed, plaintext);
}

#[test]
fn a_fresh_session_cannot_decode_mid_stream() {
    let plaintext = long_plaintext();
    let mut encoder = EncodeStream::new();
    let frames: Vec<Vec<u8>> = plaintext
        .chunks(1_000)
        .map(|chunk| frame_block(&mut encoder, chunk))
        .collect();

    // Skipping the first frame severs the window the second depends on.
    let mut cold = StreamDecoder::new();
    match cold.decode_next(&frames[1], 4) {
        Err(FrameError::CorruptInput { .. }) => {}
        Err(other) => panic!("unexpected error: {:?}", other),
        Ok(out) => assert_ne!(
            out,
            plaintext[1_000..2_000].to_vec(),
            "a stateless decode of a chained block must not succeed correctly"
        ),
    }
}

#[test]
fn sessions_do_not_share_state() {
    let plaintext = long_plaintext();
    let mut encoder = EncodeStream::new();
    let frames: Vec<Vec<u8>> = plaintext
        .chunks(2_000)
        .map(|chunk| frame_block(&mut encoder, chunk))
        .collect();

    // Decoding the full stream in one session must not help another.
    let mut warm = StreamDecoder::new();
    for frame in &frames {
        warm.decode_next(frame, 4).unwrap();
    }
    let mut other = StreamDecoder::new();
    match other.decode_next(&frames[2], 4) {
        Err(_) => {}
        Ok(out) => assert_ne!(out, plaintext[4_000..6_000].to_vec()),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Validation
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn short_frames_are_rejected_uniformly() {
    let mut session = StreamDecoder::new();
    for input in [&b""[..], &b"x"[..], &b"xyz"[..]] {
        assert_eq!(
            session.decode_next(input, DEFAULT_BLOCK_SIZE_ID),
            Err(FrameError::InputTooShort)
        );
    }
}

#[test]
fn out_of_range_block_size_id_fails_without_an_engine_call() {
    let plaintext = long_plaintext();
    let mut encoder = EncodeStream::new();
    let f0 = frame_block(&mut encoder, &plaintext[..1_000]);
    let f1 = frame_block(&mut encoder, &plaintext[1_000..2_000]);

    let mut session = StreamDecoder::new();
    assert_eq!(
        session.decode_next(&f0, MAX_BLOCK_SIZE_ID + 1),
        Err(FrameError::InvalidBlockSizeId(MAX_BLOCK_SIZE_ID + 1))
    );
    // The rejected call must not have consumed the frame into the window:
    // the stream still decodes from its true beginning.
    assert_eq!(session.decode_next(&f0, 4).unwrap(), &plaintext[..1_000]);
    assert_eq!(session.decode_next(&f1, 4).unwrap(), &plaintext[1_000..2_000]);
}

#[test]
fn block_size_id_resolution_bounds() {
    assert_eq!(block_size_from_id(DEFAULT_BLOCK_SIZE_ID), Some(4 << 20));
    assert!(block_size_from_id(MAX_BLOCK_SIZE_ID).is_some());
    assert_eq!(block_size_from_id(MAX_BLOCK_SIZE_ID + 1), None);
}

// ─────────────────────────────────────────────────────────────────────────────
// Zero-capacity shortcut
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn zero_capacity_returns_empty_and_leaves_the_window_alone() {
    let plaintext = long_plaintext();
    let mut encoder = EncodeStream::new();
    let f0 = frame_block(&mut encoder, &plaintext[..1_000]);
    let f1 = frame_block(&mut encoder, &plaintext[1_000..2_000]);

    let mut session = StreamDecoder::new();
    assert_eq!(session.decode_next(&f0, 4).unwrap(), &plaintext[..1_000]);

    // Degenerate call between two real ones.
    assert_eq!(
        session.decode_next_into_capacity(&f1, 0).unwrap(),
        Vec::<u8>::new()
    );

    // The next real call behaves as if the zero-capacity call never
    // happened: the window still lines up with frame 1.
    assert_eq!(session.decode_next(&f1, 4).unwrap(), &plaintext[1_000..2_000]);
}
