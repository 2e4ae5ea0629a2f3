use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::domain::Wheel;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse wheel document {path}: {source}")]
    JsonDecode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Reads a wheel document. A missing or blank file is an empty wheel.
pub fn load_wheel(path: &Path) -> Result<Wheel, StorageError> {
    let raw = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "wheel file not found, starting empty");
            return Ok(Wheel::default());
        }
        Err(source) => {
            return Err(StorageError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    if raw.trim().is_empty() {
        return Ok(Wheel::default());
    }

    let wheel: Wheel = serde_json::from_str(&raw).map_err(|source| StorageError::JsonDecode {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(
        path = %path.display(),
        pages = wheel.pages.len(),
        rings = wheel.structure.rings.len(),
        "loaded wheel"
    );
    Ok(wheel)
}
