//! File access with quest error mapping. Failures are logged under `quest.io`.

use crate::error::IoError;
use std::fs;
use std::path::Path;
use tracing::{debug, error};

pub(crate) fn read_file(path: &Path) -> Result<String, IoError> {
    if !path.is_file() {
        error!(target: "quest.io", path = %path.display(), "file_missing");
        return Err(IoError::FileNotExists(path.to_path_buf()));
    }
    fs::read_to_string(path).map_err(|source| {
        error!(target: "quest.io", path = %path.display(), error = %source, "read_failed");
        IoError::FileNotRead {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Writes `contents`, creating missing parent directories first.
pub(crate) fn write_file(path: &Path, contents: &str) -> Result<(), IoError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.is_dir()
    {
        fs::create_dir_all(parent).map_err(|source| {
            error!(target: "quest.io", path = %parent.display(), error = %source, "mkdir_failed");
            IoError::DirNotWrite {
                path: parent.to_path_buf(),
                source,
            }
        })?;
        debug!(target: "quest.io", path = %parent.display(), "mkdir");
    }
    fs::write(path, contents).map_err(|source| {
        error!(target: "quest.io", path = %path.display(), error = %source, "write_failed");
        IoError::FileNotWrite {
            path: path.to_path_buf(),
            source,
        }
    })?;
    debug!(target: "quest.io", path = %path.display(), bytes = contents.len(), "write");
    Ok(())
}
