// lz4pack — length-prefixed LZ4 framing, streaming decode sessions, and an
// .lz4 file container.
//
// Three caller-composed layers, no shared ownership between them:
//   frame  — one buffer in, one 4-byte-length-prefixed frame out (and back)
//   stream — a session decoding ordered frames with a persistent 64 KiB window
//   file   — flat options translated onto the on-disk container codec (io)
// The block engine underneath (block) is what all three delegate to.

pub mod block;
pub mod file;
pub mod frame;
pub mod io;
pub mod stream;
pub mod util;
pub mod xxhash;

// ── Top-level re-exports ──────────────────────────────────────────────────────
pub use block::compress::{compress_bound, ACCELERATION_DEFAULT};
pub use frame::{decode, encode, encode_fast, FrameError, HEADER_SIZE};
pub use stream::{block_size_from_id, StreamDecoder, DEFAULT_BLOCK_SIZE_ID};
