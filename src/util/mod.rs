//! Filesystem helpers shared by the container codec and the adapter.

use std::path::Path;

use filetime::FileTime;

/// Returns `true` when `path` exists and is a directory.
pub fn is_directory(path: &Path) -> bool {
    path.metadata().map(|m| m.is_dir()).unwrap_or(false)
}

/// Copy access and modification times from `src` onto `dst`.
///
/// Best-effort: containers carry no timestamps of their own, and a failure
/// here never aborts a finished operation. Errors surface at verbosity 4.
pub fn transfer_file_times(src: &str, dst: &str) {
    let times = match std::fs::metadata(src) {
        Ok(meta) => (
            FileTime::from_last_access_time(&meta),
            FileTime::from_last_modification_time(&meta),
        ),
        Err(e) => {
            crate::io::prefs::display_level(4, &format!("{}: cannot stat: {}\n", src, e));
            return;
        }
    };
    if let Err(e) = filetime::set_file_times(dst, times.0, times.1) {
        crate::io::prefs::display_level(4, &format!("{}: cannot set times: {}\n", dst, e));
    }
}
