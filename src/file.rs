//! File-container front-end: flat options in, file codec calls out.
//!
//! This adapter owns no state beyond one call. It translates a flat record
//! of raw option values into container [`Prefs`], validates each field
//! independently, and delegates to [`crate::io`]. Validation is
//! best-effort by design: an out-of-range field is skipped with a warning
//! while every valid field still takes effect — one bad value never blocks
//! the rest of the configuration, and never aborts the operation.

use crate::io::prefs::{display_level, set_notification_level, BlockMode, Prefs};
use crate::io::{compress_filename, decompress_filename, CompressStats, ContainerError};

/// Suffix appended to compressed outputs and stripped from inputs on
/// decompression.
pub const LZ4_SUFFIX: &str = ".lz4";

// ─────────────────────────────────────────────────────────────────────────────
// Options record
// ─────────────────────────────────────────────────────────────────────────────

/// Flat, independently-validated container options.
///
/// Fields are raw integers on purpose: out-of-range values must be
/// representable so they can be diagnosed and skipped rather than rejected
/// at the type level. Legal ranges:
///
/// | field             | range | meaning                                |
/// |-------------------|-------|----------------------------------------|
/// | `overwrite`       | 0..=1 | replace existing outputs               |
/// | `block_size_id`   | 4..=7 | 64 KiB / 256 KiB / 1 MiB / 4 MiB       |
/// | `block_mode`      | 0..=1 | 0 = linked, 1 = independent            |
/// | `block_checksum`  | 0..=1 | per-block xxHash32                     |
/// | `stream_checksum` | 0..=1 | whole-stream xxHash32                  |
/// | `verbosity`       | 0..=4 | global notification level              |
#[derive(Clone, Copy, Debug)]
pub struct FileOptions {
    pub overwrite: i32,
    pub block_size_id: i32,
    pub block_mode: i32,
    pub block_checksum: i32,
    pub stream_checksum: i32,
    pub verbosity: i32,
}

impl Default for FileOptions {
    fn default() -> Self {
        FileOptions {
            overwrite: 1,
            block_size_id: 7,
            block_mode: 1,
            block_checksum: 0,
            stream_checksum: 1,
            verbosity: 0,
        }
    }
}

impl FileOptions {
    /// Apply every field to a fresh `Prefs`, skipping invalid ones.
    ///
    /// Returns the resulting preferences together with one warning message
    /// per skipped field. The corresponding preference keeps its default.
    pub fn apply(&self) -> (Prefs, Vec<String>) {
        let mut prefs = Prefs::default();
        let mut warnings = Vec::new();
        let warn = |field: &str, warnings: &mut Vec<String>| {
            warnings.push(format!("Invalid input for {}. Using default value.", field));
        };

        match self.overwrite {
            0 | 1 => {
                prefs.set_overwrite(self.overwrite == 1);
            }
            _ => warn("overwrite", &mut warnings),
        }
        match self.block_size_id {
            4..=7 => {
                prefs.set_block_size_id(self.block_size_id as u32);
            }
            _ => warn("blockSizeID", &mut warnings),
        }
        match self.block_checksum {
            0 | 1 => {
                prefs.set_block_checksum_mode(self.block_checksum == 1);
            }
            _ => warn("blockCheck", &mut warnings),
        }
        match self.stream_checksum {
            0 | 1 => {
                prefs.set_stream_checksum_mode(self.stream_checksum == 1);
            }
            _ => warn("streamCheck", &mut warnings),
        }
        match self.verbosity {
            0..=4 => {
                set_notification_level(self.verbosity);
            }
            _ => warn("verbosity", &mut warnings),
        }
        match self.block_mode {
            0 => {
                prefs.set_block_mode(BlockMode::Linked);
            }
            1 => {
                prefs.set_block_mode(BlockMode::Independent);
            }
            _ => warn("blockMode", &mut warnings),
        }

        (prefs, warnings)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Path derivation
// ─────────────────────────────────────────────────────────────────────────────

/// Output path for compression: the input path with the suffix appended.
pub fn compressed_output_path(input: &str) -> String {
    format!("{}{}", input, LZ4_SUFFIX)
}

/// Output path for decompression: the input path with its final 4 bytes
/// dropped.
///
/// No suffix-match check is performed — any final 4 bytes are stripped, and
/// an input shorter than the suffix derives an empty path. Both are
/// long-standing behavior of this surface; the empty path then fails at
/// file-open time rather than here.
pub fn decompressed_output_path(input: &str) -> String {
    let keep = input.len().saturating_sub(LZ4_SUFFIX.len());
    String::from_utf8_lossy(&input.as_bytes()[..keep]).into_owned()
}

// ─────────────────────────────────────────────────────────────────────────────
// Operations
// ─────────────────────────────────────────────────────────────────────────────

/// Compress `input` into a container file, with explicit options.
///
/// `output` defaults to `input + ".lz4"`. Invalid option fields warn and
/// are skipped (see [`FileOptions::apply`]); the remaining configuration
/// still applies.
pub fn compress_file(
    input: &str,
    output: Option<&str>,
    level: i32,
    options: &FileOptions,
) -> Result<CompressStats, ContainerError> {
    let (prefs, warnings) = options.apply();
    for w in &warnings {
        display_level(2, &format!("Warning: {}\n", w));
    }
    let derived;
    let output = match output {
        Some(o) => o,
        None => {
            derived = compressed_output_path(input);
            &derived
        }
    };
    compress_filename(&prefs, input, output, level)
}

/// Compress `input` with default options, deriving the output path.
pub fn compress_file_default(input: &str, level: i32) -> Result<CompressStats, ContainerError> {
    let prefs = Prefs::default();
    let output = compressed_output_path(input);
    compress_filename(&prefs, input, &output, level)
}

/// Decompress a container file, deriving the output path by suffix
/// stripping (see [`decompressed_output_path`] for the sharp edge).
pub fn decompress_file(input: &str) -> Result<u64, ContainerError> {
    let prefs = Prefs::default();
    let output = decompressed_output_path(input);
    decompress_filename(&prefs, input, &output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_paths_append_and_strip_the_suffix() {
        assert_eq!(compressed_output_path("data.bin"), "data.bin.lz4");
        assert_eq!(decompressed_output_path("data.bin.lz4"), "data.bin");
    }

    #[test]
    fn stripping_ignores_the_actual_suffix_content() {
        // Inherited behavior: the last 4 bytes go, whatever they are.
        assert_eq!(decompressed_output_path("archive.zip"), "archive");
    }

    #[test]
    fn stripping_a_short_path_yields_an_empty_path() {
        assert_eq!(decompressed_output_path("abc"), "");
        assert_eq!(decompressed_output_path(""), "");
    }

    #[test]
    fn valid_options_apply_cleanly() {
        let options = FileOptions {
            overwrite: 0,
            block_size_id: 5,
            block_mode: 0,
            block_checksum: 1,
            stream_checksum: 0,
            verbosity: 0,
        };
        let (prefs, warnings) = options.apply();
        assert!(warnings.is_empty());
        assert!(!prefs.overwrite);
        assert_eq!(prefs.block_size_id, 5);
        assert!(!prefs.block_independence);
        assert!(prefs.block_checksum);
        assert!(!prefs.stream_checksum);
    }

    #[test]
    fn each_invalid_field_warns_and_keeps_its_default() {
        let options = FileOptions {
            overwrite: 2,
            block_size_id: 9,
            block_mode: -1,
            block_checksum: 7,
            stream_checksum: -3,
            verbosity: 99,
        };
        let (prefs, warnings) = options.apply();
        assert_eq!(warnings.len(), 6);
        // All defaults survive.
        assert!(prefs.overwrite);
        assert_eq!(prefs.block_size_id, 7);
        assert!(prefs.block_independence);
        assert!(!prefs.block_checksum);
        assert!(prefs.stream_checksum);
    }

    #[test]
    fn one_bad_field_does_not_block_the_others() {
        let options = FileOptions {
            block_size_id: 42,
            block_checksum: 1,
            ..FileOptions::default()
        };
        let (prefs, warnings) = options.apply();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("blockSizeID"));
        assert_eq!(prefs.block_size_id, 7);
        assert!(prefs.block_checksum);
    }
}
