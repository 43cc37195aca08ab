//! The block compression engine: LZ4 block format, one-shot and streaming.
//!
//! Layout:
//! - [`types`]      — format constants, hashes, byte helpers
//! - [`compress`]   — bound calculation and the greedy match finder
//! - [`decompress`] — bounded, offset-reporting safe decoder
//! - [`stream`]     — cross-block history state (encode and decode sides)

pub mod compress;
pub mod decompress;
pub mod stream;
pub mod types;

pub use compress::{compress_bound, compress_default, compress_fast, ACCELERATION_DEFAULT};
pub use decompress::{decompress_safe, decompress_safe_with_dict, DecompressError};
pub use stream::{DecodeWindow, EncodeStream};
