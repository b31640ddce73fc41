//! Per-game save slots under `<data_dir>/saves/<system>/<rom>.sav`

use crate::{LibraryError, Result};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Largest accepted save payload (10 MiB)
pub const MAX_SAVE_BYTES: usize = 10 << 20;

const SAVE_EXTENSION: &str = "sav";

/// Reject anything that could escape the saves directory
pub fn validate_identifier(value: &str) -> Result<()> {
    let invalid = value.is_empty()
        || value == "."
        || value.contains("..")
        || value.contains('/')
        || value.contains('\\')
        || value.contains('\0');

    if invalid {
        return Err(LibraryError::InvalidIdentifier(value.to_string()));
    }
    Ok(())
}

/// Save slot for one (system, rom) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveSlot {
    path: PathBuf,
}

impl SaveSlot {
    /// Resolve the slot path. Pure: validates identifiers, touches no files.
    pub fn resolve(data_dir: &Path, system_id: &str, rom_name: &str) -> Result<Self> {
        validate_identifier(system_id)?;
        validate_identifier(rom_name)?;

        let path = data_dir
            .join("saves")
            .join(system_id)
            .join(format!("{}.{}", rom_name, SAVE_EXTENSION));
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the slot contents
    pub fn read(&self) -> Result<Vec<u8>> {
        fs::read(&self.path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => {
                LibraryError::NotFound(format!("no save at {}", self.path.display()))
            }
            _ => LibraryError::Io(e),
        })
    }

    /// Replace the slot contents atomically.
    ///
    /// Oversized payloads are rejected before anything is created on disk.
    /// Concurrent writers to the same slot race; the last rename wins.
    pub fn write(&self, bytes: &[u8]) -> Result<()> {
        if bytes.len() > MAX_SAVE_BYTES {
            return Err(LibraryError::PayloadTooLarge {
                size: bytes.len(),
                limit: MAX_SAVE_BYTES,
            });
        }

        let dir = self
            .path
            .parent()
            .ok_or_else(|| LibraryError::InvalidIdentifier(self.path.display().to_string()))?;
        fs::create_dir_all(dir)?;

        let mut staged = NamedTempFile::new_in(dir)?;
        staged.write_all(bytes)?;
        staged.as_file().sync_all()?;
        staged.persist(&self.path).map_err(|e| e.error)?;

        tracing::info!("Wrote {} bytes to {}", bytes.len(), self.path.display());
        Ok(())
    }
}
