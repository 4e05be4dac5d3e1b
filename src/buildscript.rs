//! Small helpers for build scripts that drive windows.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::error::BuildScriptError;

/// Check that `file`'s first line (including its newline) equals
/// `expected_header`. Build scripts use this to confirm they run from their own
/// directory.
pub fn confirm_header(
    file: impl AsRef<Path>,
    expected_header: &str,
) -> Result<(), BuildScriptError> {
    let path = file.as_ref();
    let handle = File::open(path).map_err(|err| BuildScriptError::io("opening", path, err))?;

    let mut found = String::new();
    BufReader::new(handle)
        .read_line(&mut found)
        .map_err(|err| BuildScriptError::io("reading the first line", path, err))?;

    if found != expected_header {
        return Err(BuildScriptError::HeaderMismatch {
            path: path.to_path_buf(),
            expected: expected_header.to_string(),
            found,
        });
    }
    Ok(())
}

/// Copy `src` to `dst` byte for byte, truncating `dst`. Returns bytes copied.
pub fn copy_file(src: impl AsRef<Path>, dst: impl AsRef<Path>) -> Result<u64, BuildScriptError> {
    let (src, dst) = (src.as_ref(), dst.as_ref());
    let mut reader = File::open(src).map_err(|err| BuildScriptError::io("opening", src, err))?;
    let mut writer = File::create(dst).map_err(|err| BuildScriptError::io("creating", dst, err))?;
    let copied =
        io::copy(&mut reader, &mut writer).map_err(|err| BuildScriptError::io("copying", dst, err))?;
    writer
        .sync_all()
        .map_err(|err| BuildScriptError::io("flushing", dst, err))?;
    Ok(copied)
}
