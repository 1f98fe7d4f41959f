//! Persisted artifacts: the fitted preprocessing plan and the trained model.
//!
//! Artifacts are written to a temporary file in the destination directory and
//! renamed over the target, so a reader sees either the previous artifact or
//! the complete new one.

use crate::error::{Error, Result};
use crate::serialization::SerializableParams;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Write `data` to `path` atomically, creating the parent directory if needed.
pub fn write_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;

    debug!(path = %path.display(), bytes = data.len(), "artifact written");
    Ok(())
}

/// Serialize `params` and persist them at `path`.
pub fn save_params<T: SerializableParams>(path: &Path, params: &T) -> Result<()> {
    let bytes = params.to_bytes().map_err(|e| Error::ArtifactUnavailable {
        path: path.to_path_buf(),
        reason: format!("cannot serialize: {e}"),
    })?;
    write_atomic(path, &bytes).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Read and deserialize parameters persisted at `path`.
///
/// A missing, unreadable, or undecodable file is reported as
/// [`Error::ArtifactUnavailable`].
pub fn load_params<T: SerializableParams>(path: &Path) -> Result<T> {
    let bytes = std::fs::read(path).map_err(|e| Error::ArtifactUnavailable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    T::from_bytes(&bytes).map_err(|e| Error::ArtifactUnavailable {
        path: path.to_path_buf(),
        reason: format!("corrupt artifact: {e}"),
    })
}
