//! File helpers: atomic writes and pretty JSON for the checkpoint, stage
//! archive and config.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::FizzbotError;

/// Read and parse a JSON file. `what` names the file in error messages.
pub fn read_json<T: DeserializeOwned>(what: &'static str, path: &Path) -> Result<T, FizzbotError> {
    let contents = fs::read_to_string(path)
        .map_err(|source| FizzbotError::persistence(what, path, source))?;
    serde_json::from_str(&contents)
        .map_err(|err| FizzbotError::decode(format!("{what} {}", path.display()), err))
}

/// Atomically write `value` as pretty JSON with a trailing newline.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), FizzbotError> {
    let mut buf = serde_json::to_string_pretty(value)
        .map_err(|err| FizzbotError::decode(format!("serialize {}", path.display()), err))?;
    buf.push('\n');
    write_atomic(path, &buf)
}

/// Write `contents` next to `path` under a `.tmp` suffix, then rename over
/// `path`. Missing parent directories are created.
pub fn write_atomic(path: &Path, contents: &str) -> Result<(), FizzbotError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|source| FizzbotError::persistence("create directory", parent, source))?;
    }
    let tmp_path = tmp_path_for(path);
    fs::write(&tmp_path, contents)
        .map_err(|source| FizzbotError::persistence("write temp file", &tmp_path, source))?;
    fs::rename(&tmp_path, path)
        .map_err(|source| FizzbotError::persistence("replace", path, source))?;
    Ok(())
}

fn tmp_path_for(path: &Path) -> PathBuf {
    match path.extension() {
        Some(ext) => path.with_extension(format!("{}.tmp", ext.to_string_lossy())),
        None => path.with_extension("tmp"),
    }
}
