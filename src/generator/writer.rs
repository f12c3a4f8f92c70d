use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{GenError, Result};

/// How a generated file replaces whatever is at its destination
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriteMode {
    /// Delete the existing file, then create a new one.
    ///
    /// Not atomic: a crash between the two steps leaves no file behind.
    #[default]
    Replace,
    /// Write a sibling temporary file and rename it over the destination.
    Atomic,
}

/// Write `contents` to `path`, creating parent directories as needed.
///
/// Directory creation is idempotent. The directory tree is created with the
/// process's default permissions.
pub fn write_file(path: &Path, contents: &[u8], mode: WriteMode) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| GenError::io(parent, e))?;
    }
    match mode {
        WriteMode::Replace => replace(path, contents),
        WriteMode::Atomic => atomic(path, contents),
    }
}

fn replace(path: &Path, contents: &[u8]) -> Result<()> {
    if fs::symlink_metadata(path).is_ok() {
        fs::remove_file(path).map_err(|e| GenError::io(path, e))?;
    }
    let mut file = fs::File::create(path).map_err(|e| GenError::io(path, e))?;
    file.write_all(contents).map_err(|e| GenError::io(path, e))?;
    Ok(())
}

fn atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let tmp = temp_path(path);
    let result = (|| {
        let mut file = fs::File::create(&tmp).map_err(|e| GenError::io(&tmp, e))?;
        file.write_all(contents).map_err(|e| GenError::io(&tmp, e))?;
        file.sync_all().map_err(|e| GenError::io(&tmp, e))?;
        fs::rename(&tmp, path).map_err(|e| GenError::io(path, e))
    })();
    if result.is_err() {
        // best effort; the original error is what matters
        let _ = fs::remove_file(&tmp);
    }
    result
}

/// Hidden sibling used while writing atomically.
pub fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.kubegen-tmp"))
}
