//! Source/destination file resolution for the container codec.
//!
//! [`open_src_file`] rejects directories; [`open_dst_file`] enforces the
//! overwrite preference from [`Prefs`]. Diagnostics are verbosity-gated
//! through the global notification level.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use super::prefs::{display_level, Prefs};
use super::ContainerError;
use crate::util::is_directory;

/// Opens a source file for buffered sequential reading.
pub fn open_src_file(path: &str) -> Result<BufReader<File>, ContainerError> {
    if is_directory(Path::new(path)) {
        display_level(1, &format!("{}: is a directory -- ignored\n", path));
        return Err(ContainerError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("{}: is a directory", path),
        )));
    }
    let f = File::open(path).map_err(|e| {
        display_level(1, &format!("{}: {}\n", path, e));
        ContainerError::Io(e)
    })?;
    Ok(BufReader::new(f))
}

/// Opens a destination file for buffered writing.
///
/// An existing file is replaced only when `prefs.overwrite` allows it;
/// otherwise the open is refused without touching the file.
pub fn open_dst_file(prefs: &Prefs, path: &str) -> Result<BufWriter<File>, ContainerError> {
    if !prefs.overwrite && Path::new(path).exists() {
        display_level(1, &format!("{}: already exists; not overwritten\n", path));
        return Err(ContainerError::DestinationExists(path.to_owned()));
    }
    let f = File::create(path).map_err(|e| {
        display_level(1, &format!("{}: {}\n", path, e));
        ContainerError::Io(e)
    })?;
    display_level(4, &format!("Writing to {}\n", path));
    Ok(BufWriter::new(f))
}
