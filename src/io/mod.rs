//! The file codec: an on-disk compressed-container format over the block
//! engine.
//!
//! Containers are sequences of frames. Each frame is a magic number, a
//! two-byte descriptor (+ xxHash32 header check byte), a run of size-prefixed
//! blocks (compressed or stored raw, optionally block-checksummed, linked or
//! independent), an end mark, and an optional whole-stream checksum.
//!
//! - [`prefs`]      — preference value type and the notification level
//! - [`file_io`]    — source/destination resolution and the overwrite policy
//! - [`compress`]   — container writer ([`compress_filename`])
//! - [`decompress`] — container reader ([`decompress_filename`])

pub mod compress;
pub mod decompress;
pub mod file_io;
pub mod prefs;

pub use compress::{compress_filename, CompressStats};
pub use decompress::decompress_filename;
pub use prefs::{set_notification_level, BlockMode, Prefs, BLOCKSIZEID_DEFAULT, MAGICNUMBER};

use crate::block::decompress::DecompressError;

// ─────────────────────────────────────────────────────────────────────────────
// Error type
// ─────────────────────────────────────────────────────────────────────────────

/// Failures of container-level compression or decompression.
#[derive(Debug)]
pub enum ContainerError {
    /// Underlying file I/O failure.
    Io(std::io::Error),
    /// Destination exists and the overwrite preference forbids replacing it.
    DestinationExists(String),
    /// The input does not start with a recognized frame magic.
    BadMagic(u32),
    /// Structurally invalid frame: truncation, reserved bits, bad ids.
    Header(&'static str),
    /// The descriptor check byte does not match the descriptor.
    HeaderChecksum { expected: u8, actual: u8 },
    /// A per-block checksum mismatch in block `block` (0-based).
    BlockChecksum { block: u64 },
    /// The whole-stream checksum does not match the decoded content.
    ContentChecksum { expected: u32, actual: u32 },
    /// Block `block` (0-based) failed to decompress.
    Block { block: u64, source: DecompressError },
}

impl core::fmt::Display for ContainerError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ContainerError::Io(e) => write!(f, "i/o error: {}", e),
            ContainerError::DestinationExists(path) => {
                write!(f, "{}: already exists; not overwritten", path)
            }
            ContainerError::BadMagic(magic) => {
                write!(f, "unrecognized frame magic: 0x{:08x}", magic)
            }
            ContainerError::Header(what) => write!(f, "invalid frame header: {}", what),
            ContainerError::HeaderChecksum { expected, actual } => write!(
                f,
                "header checksum mismatch: expected 0x{:02x}, got 0x{:02x}",
                expected, actual
            ),
            ContainerError::BlockChecksum { block } => {
                write!(f, "block checksum mismatch in block {}", block)
            }
            ContainerError::ContentChecksum { expected, actual } => write!(
                f,
                "content checksum mismatch: expected 0x{:08x}, got 0x{:08x}",
                expected, actual
            ),
            ContainerError::Block { block, source } => {
                write!(f, "block {}: {}", block, source)
            }
        }
    }
}

impl std::error::Error for ContainerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ContainerError::Io(e) => Some(e),
            ContainerError::Block { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ContainerError {
    fn from(e: std::io::Error) -> Self {
        ContainerError::Io(e)
    }
}
