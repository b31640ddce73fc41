//! User tag overlay loaded from `tags.json`

use crate::{LibraryError, Result};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

/// Overlay file name inside the data directory
pub const TAGS_FILE: &str = "tags.json";

/// Exact filename to free-text tag.
///
/// Example: `{"Pokemon Fire Red.gba": "RPG", "Super Mario World.smc": "Platformer"}`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagOverlay {
    tags: HashMap<String, String>,
}

impl TagOverlay {
    /// Load `<data_dir>/tags.json`.
    ///
    /// A missing file yields an empty overlay silently. A malformed file yields
    /// an empty overlay and a warning; it never fails cataloging.
    pub fn load(data_dir: &Path) -> Self {
        match Self::try_load(data_dir) {
            Ok(overlay) => overlay,
            Err(LibraryError::Io(e)) if e.kind() == io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                tracing::warn!("Ignoring {}: {}", TAGS_FILE, e);
                Self::default()
            }
        }
    }

    fn try_load(data_dir: &Path) -> Result<Self> {
        let contents = fs::read_to_string(data_dir.join(TAGS_FILE))?;
        Self::parse(&contents)
    }

    /// Parse a JSON object of string values
    pub fn parse(json: &str) -> Result<Self> {
        let tags: HashMap<String, String> =
            serde_json::from_str(json).map_err(|e| LibraryError::MalformedConfig(e.to_string()))?;
        Ok(Self { tags })
    }

    /// Tag for an exact, case-sensitive filename
    pub fn tag_for(&self, file_name: &str) -> Option<&str> {
        self.tags.get(file_name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}
