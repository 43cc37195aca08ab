//! File-container adapter and codec: end-to-end file round-trips across the
//! configuration space, the best-effort option policy, the overwrite policy,
//! and the suffix-derivation edge.

use std::fs;
use std::path::Path;

use lz4pack::file::{
    compress_file, compress_file_default, decompress_file, decompressed_output_path, FileOptions,
};
use lz4pack::io::ContainerError;

fn write_sample(path: &Path, len: usize) -> Vec<u8> {
    // Mixed content: a compressible prefix and a noisy tail.
    let mut data: Vec<u8> = b"sample file content, repeated for ratio. "
        .iter()
        .copied()
        .cycle()
        .take(len / 2)
        .collect();
    data.extend((0..len - data.len()).map(|i| (i as u32).wrapping_mul(2_654_435_761) as u8));
    fs::write(path, &data).unwrap();
    data
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

// ─────────────────────────────────────────────────────────────────────────────
// Round-trips
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn default_roundtrip_restores_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let original = dir.path().join("data.bin");
    let contents = write_sample(&original, 300_000);

    compress_file_default(path_str(&original), 0).unwrap();
    let container = dir.path().join("data.bin.lz4");
    assert!(container.exists());

    fs::remove_file(&original).unwrap();
    decompress_file(path_str(&container)).unwrap();
    assert_eq!(fs::read(&original).unwrap(), contents);
}

#[test]
fn roundtrip_across_modes_and_checksums() {
    let dir = tempfile::tempdir().unwrap();
    for (mode, block_checksum, stream_checksum) in [
        (0, 0, 0),
        (0, 1, 1),
        (1, 0, 1),
        (1, 1, 0),
    ] {
        let name = format!("case_{}_{}_{}", mode, block_checksum, stream_checksum);
        let original = dir.path().join(&name);
        let contents = write_sample(&original, 200_000);

        let options = FileOptions {
            block_mode: mode,
            block_checksum,
            stream_checksum,
            // 64 KiB blocks force multiple blocks per file.
            block_size_id: 4,
            ..FileOptions::default()
        };
        compress_file(path_str(&original), None, 0, &options).unwrap();

        fs::remove_file(&original).unwrap();
        let container = dir.path().join(format!("{}.lz4", name));
        decompress_file(path_str(&container)).unwrap();
        assert_eq!(fs::read(&original).unwrap(), contents, "case {}", name);
    }
}

#[test]
fn chained_mode_beats_independent_on_cross_block_redundancy() {
    let dir = tempfile::tempdir().unwrap();
    // One 70 KiB pattern repeated: with 64 KiB blocks, every block after the
    // first is mostly a back-reference into the previous one.
    let block: Vec<u8> = (0..70_000u32).map(|i| (i % 251) as u8).collect();
    let mut contents = Vec::new();
    for _ in 0..4 {
        contents.extend_from_slice(&block);
    }
    let original = dir.path().join("pattern.bin");
    fs::write(&original, &contents).unwrap();

    let linked_out = dir.path().join("linked.lz4");
    let indep_out = dir.path().join("indep.lz4");
    let mut options = FileOptions {
        block_size_id: 4,
        block_mode: 0,
        ..FileOptions::default()
    };
    compress_file(path_str(&original), Some(path_str(&linked_out)), 0, &options).unwrap();
    options.block_mode = 1;
    compress_file(path_str(&original), Some(path_str(&indep_out)), 0, &options).unwrap();

    let linked_size = fs::metadata(&linked_out).unwrap().len();
    let indep_size = fs::metadata(&indep_out).unwrap().len();
    assert!(
        linked_size < indep_size,
        "linked {} vs independent {}",
        linked_size,
        indep_size
    );

    // Both still round-trip.
    for container in [&linked_out, &indep_out] {
        let restored = dir.path().join("restored");
        lz4pack::io::decompress_filename(
            &lz4pack::io::Prefs::default(),
            path_str(container),
            path_str(&restored),
        )
        .unwrap();
        assert_eq!(fs::read(&restored).unwrap(), contents);
    }
}

#[test]
fn empty_file_roundtrips() {
    let dir = tempfile::tempdir().unwrap();
    let original = dir.path().join("empty");
    fs::write(&original, b"").unwrap();

    compress_file_default(path_str(&original), 0).unwrap();
    fs::remove_file(&original).unwrap();
    decompress_file(path_str(&dir.path().join("empty.lz4"))).unwrap();
    assert_eq!(fs::read(&original).unwrap(), b"");
}

#[test]
fn negative_levels_still_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let original = dir.path().join("fast.bin");
    let contents = write_sample(&original, 150_000);

    compress_file_default(path_str(&original), -8).unwrap();
    fs::remove_file(&original).unwrap();
    decompress_file(path_str(&dir.path().join("fast.bin.lz4"))).unwrap();
    assert_eq!(fs::read(&original).unwrap(), contents);
}

// ─────────────────────────────────────────────────────────────────────────────
// Best-effort configuration
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn invalid_option_fields_do_not_abort_the_call() {
    let dir = tempfile::tempdir().unwrap();
    let original = dir.path().join("partial.bin");
    let contents = write_sample(&original, 50_000);

    // Every field out of range except the checksums; the call must still
    // produce a valid container using defaults for the bad fields.
    let options = FileOptions {
        overwrite: 5,
        block_size_id: 99,
        block_mode: 3,
        block_checksum: 1,
        stream_checksum: 1,
        verbosity: -7,
    };
    compress_file(path_str(&original), None, 0, &options).unwrap();

    fs::remove_file(&original).unwrap();
    decompress_file(path_str(&dir.path().join("partial.bin.lz4"))).unwrap();
    assert_eq!(fs::read(&original).unwrap(), contents);
}

// ─────────────────────────────────────────────────────────────────────────────
// Overwrite policy
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn no_overwrite_refuses_an_existing_container() {
    let dir = tempfile::tempdir().unwrap();
    let original = dir.path().join("keep.bin");
    write_sample(&original, 10_000);
    let container = dir.path().join("keep.bin.lz4");
    fs::write(&container, b"precious").unwrap();

    let options = FileOptions {
        overwrite: 0,
        ..FileOptions::default()
    };
    let err = compress_file(path_str(&original), None, 0, &options).unwrap_err();
    assert!(matches!(err, ContainerError::DestinationExists(_)));
    assert_eq!(fs::read(&container).unwrap(), b"precious");
}

// ─────────────────────────────────────────────────────────────────────────────
// Suffix derivation
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn decompress_strips_four_bytes_regardless_of_content() {
    assert_eq!(decompressed_output_path("dir/file.lz4"), "dir/file");
    assert_eq!(decompressed_output_path("file.tar"), "file");
    assert_eq!(decompressed_output_path("x"), "");
}

#[test]
fn decompressing_a_too_short_path_fails_at_open_time() {
    // The derived output path is empty; the failure is the codec's, not a
    // panic in path derivation.
    assert!(decompress_file("abc").is_err());
}

// ─────────────────────────────────────────────────────────────────────────────
// Corruption surfaces as typed errors
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn flipped_container_bytes_fail_checksums() {
    let dir = tempfile::tempdir().unwrap();
    let original = dir.path().join("checked.bin");
    write_sample(&original, 100_000);

    let options = FileOptions {
        block_checksum: 1,
        block_size_id: 4,
        ..FileOptions::default()
    };
    compress_file(path_str(&original), None, 0, &options).unwrap();
    let container = dir.path().join("checked.bin.lz4");

    let mut bytes = fs::read(&container).unwrap();
    // Flip one byte inside the first block's payload (past magic+header).
    let target = 32.min(bytes.len() - 1);
    bytes[target] ^= 0xA5;
    fs::write(&container, &bytes).unwrap();

    fs::remove_file(&original).unwrap();
    assert!(decompress_file(path_str(&container)).is_err());
}

#[test]
fn garbage_input_is_a_bad_magic() {
    let dir = tempfile::tempdir().unwrap();
    let bogus = dir.path().join("bogus.lz4");
    fs::write(&bogus, b"this is not a container at all").unwrap();
    let err = decompress_file(path_str(&bogus)).unwrap_err();
    assert!(matches!(err, ContainerError::BadMagic(_)));
}
