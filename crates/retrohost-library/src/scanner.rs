//! ROM scanning functionality

use crate::{Result, SystemDescriptor, SystemRegistry, TagOverlay};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Extensions of non-ROM artifacts (saves, backups, patches)
pub const IGNORED_EXTENSIONS: [&str; 5] = [".srm", ".sav", ".bak", ".ips", ".ups"];

/// One playable ROM
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    /// Filename without its extension
    #[serde(rename = "name")]
    pub display_name: String,

    /// Original filename, case preserved
    pub file_name: String,

    #[serde(rename = "system")]
    pub system_id: String,

    /// Overlay tag, empty when none
    pub tag: String,
}

/// ROMs grouped by system id, in walk order within each system
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    systems: HashMap<String, Vec<CatalogEntry>>,
}

impl Catalog {
    fn push(&mut self, entry: CatalogEntry) {
        self.systems
            .entry(entry.system_id.clone())
            .or_default()
            .push(entry);
    }

    /// ROMs for a system, empty for unknown ids
    pub fn roms(&self, system_id: &str) -> &[CatalogEntry] {
        self.systems
            .get(system_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Number of ROMs across all systems
    pub fn len(&self) -> usize {
        self.systems.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Systems in registry order paired with their non-empty ROM lists
    pub fn by_system<'a>(
        &'a self,
        registry: &'a SystemRegistry,
    ) -> impl Iterator<Item = (&'a SystemDescriptor, &'a [CatalogEntry])> + 'a {
        registry.all().iter().filter_map(move |system| {
            let roms = self.roms(&system.id);
            (!roms.is_empty()).then_some((system, roms))
        })
    }

    /// Every entry, registry order then walk order
    pub fn entries<'a>(
        &'a self,
        registry: &'a SystemRegistry,
    ) -> impl Iterator<Item = &'a CatalogEntry> + 'a {
        self.by_system(registry).flat_map(|(_, roms)| roms.iter())
    }
}

/// Walks a ROM root and classifies files against a registry
pub struct CatalogScanner<'a> {
    registry: &'a SystemRegistry,
}

impl<'a> CatalogScanner<'a> {
    pub fn new(registry: &'a SystemRegistry) -> Self {
        Self { registry }
    }

    /// Scan a ROM root.
    ///
    /// Fails only when the root itself cannot be read. Unreadable entries
    /// below it are logged and skipped.
    pub fn scan(&self, rom_root: &Path, overlay: &TagOverlay) -> Result<Catalog> {
        fs::read_dir(rom_root)?;

        let mut catalog = Catalog::default();

        for entry in WalkDir::new(rom_root).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::debug!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            if !is_rom_candidate(&entry) {
                continue;
            }

            let relative = match entry.path().strip_prefix(rom_root) {
                Ok(relative) => relative,
                Err(_) => continue,
            };

            if let Some(rom) = self.catalog_entry(relative, overlay) {
                catalog.push(rom);
            }
        }

        Ok(catalog)
    }

    /// Build the entry for one file, or `None` if it is not a ROM
    fn catalog_entry(&self, relative: &Path, overlay: &TagOverlay) -> Option<CatalogEntry> {
        let file_name = relative.file_name()?.to_string_lossy().to_string();
        let (display_name, extension) = split_extension(&file_name);
        let extension = extension.to_lowercase();

        if IGNORED_EXTENSIONS.contains(&extension.as_str()) {
            tracing::debug!("Ignoring non-ROM file {}", relative.display());
            return None;
        }

        let system = self.registry.classify(relative, &extension)?;

        Some(CatalogEntry {
            display_name: display_name.to_string(),
            tag: overlay.tag_for(&file_name).unwrap_or_default().to_string(),
            file_name,
            system_id: system.id.clone(),
        })
    }
}

/// Split at the last dot: `"save.old.bak"` becomes `("save.old", ".bak")`
fn split_extension(file_name: &str) -> (&str, &str) {
    match file_name.rfind('.') {
        Some(index) => file_name.split_at(index),
        None => (file_name, ""),
    }
}

/// Regular files, plus symlinks that resolve to one
fn is_rom_candidate(entry: &DirEntry) -> bool {
    entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file())
}

/// Find a file by exact name anywhere under the ROM root
pub fn locate_rom_file(rom_root: &Path, file_name: &str) -> Option<PathBuf> {
    let wanted = Path::new(file_name).file_name()?;

    WalkDir::new(rom_root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .find(|entry| entry.file_name() == wanted && is_rom_candidate(entry))
        .map(|entry| entry.into_path())
}
