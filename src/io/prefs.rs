// prefs.rs — container preferences and the global notification level.
//
// The preference set is a plain value type owned by the caller; only the
// notification level is global, because diagnostics from every layer funnel
// through it.

use std::sync::atomic::{AtomicI32, Ordering};

use crate::block::types::{KB, MB};

// ---------------------------------------------------------------------------
// Magic numbers
// ---------------------------------------------------------------------------

pub const MAGICNUMBER_SIZE: usize = 4;

/// Container frame magic.
pub const MAGICNUMBER: u32 = 0x184D_2204;

/// First value of the skippable-frame magic range.
pub const SKIPPABLE0: u32 = 0x184D_2A50;

/// Mask selecting the skippable-frame range `[0x184D2A50, 0x184D2A5F]`.
pub const SKIPPABLE_MASK: u32 = 0xFFFF_FFF0;

// ---------------------------------------------------------------------------
// Block sizing
// ---------------------------------------------------------------------------

/// Default container block-size id (7 = 4 MiB blocks).
pub const BLOCKSIZEID_DEFAULT: u32 = 7;

pub const MIN_BLOCK_SIZE_ID: u32 = 4;
pub const MAX_BLOCK_SIZE_ID: u32 = 7;

const BLOCK_SIZE_TABLE: [usize; 4] = [64 * KB, 256 * KB, MB, 4 * MB];

/// Container block size for an id in `4..=7`, or 0 for anything else.
pub fn container_block_size(bsid: u32) -> usize {
    if !(MIN_BLOCK_SIZE_ID..=MAX_BLOCK_SIZE_ID).contains(&bsid) {
        return 0;
    }
    BLOCK_SIZE_TABLE[(bsid - MIN_BLOCK_SIZE_ID) as usize]
}

// ---------------------------------------------------------------------------
// Notification level
// ---------------------------------------------------------------------------

/// Global notification level. 0 = silent, 1 = errors only, 2 = results +
/// warnings, 3 = progress, 4+ = verbose.
pub static DISPLAY_LEVEL: AtomicI32 = AtomicI32::new(0);

/// Write `msg` to stderr if the current notification level is >= `level`.
#[inline]
pub fn display_level(level: i32, msg: &str) {
    if DISPLAY_LEVEL.load(Ordering::Relaxed) >= level {
        eprint!("{}", msg);
    }
}

/// Set the global notification level. Returns the value stored.
pub fn set_notification_level(level: i32) -> i32 {
    DISPLAY_LEVEL.store(level, Ordering::Relaxed);
    level
}

// ---------------------------------------------------------------------------
// Block mode
// ---------------------------------------------------------------------------

/// Whether container blocks depend on the previous block or stand alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockMode {
    /// Blocks share a 64 KiB dictionary window.
    Linked = 0,
    /// Each block is compressed independently.
    Independent = 1,
}

// ---------------------------------------------------------------------------
// Preferences
// ---------------------------------------------------------------------------

/// Tunable parameters for container compression and decompression.
#[derive(Clone, Debug)]
pub struct Prefs {
    /// Overwrite existing destination files. Default: true.
    pub overwrite: bool,
    /// Container block-size id (4–7 for 64 KiB – 4 MiB). Default: 7.
    pub block_size_id: u32,
    /// Explicit block size in bytes (0 = derive from `block_size_id`).
    pub block_size: usize,
    /// Append a per-block xxHash32 checksum. Default: false.
    pub block_checksum: bool,
    /// Append a whole-stream xxHash32 checksum. Default: true.
    pub stream_checksum: bool,
    /// Compress blocks independently (`true`) or linked (`false`). Default: true.
    pub block_independence: bool,
}

impl Default for Prefs {
    fn default() -> Self {
        Prefs {
            overwrite: true,
            block_size_id: BLOCKSIZEID_DEFAULT,
            block_size: 0,
            block_checksum: false,
            stream_checksum: true,
            block_independence: true,
        }
    }
}

impl Prefs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables destination-file overwrite. Returns the new value.
    pub fn set_overwrite(&mut self, yes: bool) -> bool {
        self.overwrite = yes;
        yes
    }

    /// Sets the block-size id (4–7). Returns the corresponding block size in
    /// bytes, or 0 if the id is out of range (the id is then left unchanged).
    pub fn set_block_size_id(&mut self, bsid: u32) -> usize {
        let size = container_block_size(bsid);
        if size == 0 {
            return 0;
        }
        self.block_size_id = bsid;
        self.block_size = size;
        size
    }

    /// Sets block linking mode. Returns `true` if blocks are now independent.
    pub fn set_block_mode(&mut self, mode: BlockMode) -> bool {
        self.block_independence = mode == BlockMode::Independent;
        self.block_independence
    }

    /// Enables or disables per-block checksums. Returns the new value.
    pub fn set_block_checksum_mode(&mut self, enable: bool) -> bool {
        self.block_checksum = enable;
        enable
    }

    /// Enables or disables the whole-stream checksum. Returns the new value.
    pub fn set_stream_checksum_mode(&mut self, enable: bool) -> bool {
        self.stream_checksum = enable;
        enable
    }

    /// Block size actually used for I/O: the explicit size when set, else the
    /// size derived from the id.
    pub fn effective_block_size(&self) -> usize {
        if self.block_size != 0 {
            self.block_size
        } else {
            container_block_size(self.block_size_id)
        }
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
