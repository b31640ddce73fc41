//! Catalog operations exposed to the HTTP server and CLI

use crate::{
    Catalog, CatalogEntry, CatalogScanner, CoverAuditor, CoverReport, LibraryError, Result,
    SaveSlot, SystemRegistry, TagOverlay, locate_rom_file, search_catalog,
};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// A system that has at least one ROM
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemSummary {
    pub id: String,
    pub name: String,
    pub core: String,
    pub rom_count: usize,
}

/// Stateless view over a ROM root and a data directory.
///
/// Each call reloads `tags.json` and rescans the ROM root.
#[derive(Debug, Clone)]
pub struct GameLibrary {
    registry: SystemRegistry,
    rom_dir: PathBuf,
    data_dir: PathBuf,
}

impl GameLibrary {
    pub fn new(
        registry: SystemRegistry,
        rom_dir: impl Into<PathBuf>,
        data_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            registry,
            rom_dir: rom_dir.into(),
            data_dir: data_dir.into(),
        }
    }

    pub fn registry(&self) -> &SystemRegistry {
        &self.registry
    }

    pub fn rom_dir(&self) -> &Path {
        &self.rom_dir
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Root of the cover image tree served to the frontend
    pub fn covers_dir(&self) -> PathBuf {
        CoverAuditor::new(&self.data_dir, &self.registry).covers_root()
    }

    /// Fresh catalog with tags applied
    pub fn catalog(&self) -> Result<Catalog> {
        let overlay = TagOverlay::load(&self.data_dir);
        CatalogScanner::new(&self.registry).scan(&self.rom_dir, &overlay)
    }

    /// Systems with at least one ROM, in registry order
    pub fn list_systems(&self) -> Result<Vec<SystemSummary>> {
        let catalog = self.catalog()?;
        Ok(catalog
            .by_system(&self.registry)
            .map(|(system, roms)| SystemSummary {
                id: system.id.clone(),
                name: system.name.clone(),
                core: system.core.clone(),
                rom_count: roms.len(),
            })
            .collect())
    }

    /// ROMs for one system; unknown systems yield an empty list
    pub fn list_roms(&self, system_id: &str) -> Result<Vec<CatalogEntry>> {
        Ok(self.catalog()?.roms(system_id).to_vec())
    }

    /// Path of a ROM file by exact name anywhere under the ROM root.
    ///
    /// The system id is not used to narrow the search.
    pub fn locate_rom(&self, _system_id: &str, file_name: &str) -> Result<PathBuf> {
        locate_rom_file(&self.rom_dir, file_name)
            .ok_or_else(|| LibraryError::NotFound(format!("ROM {}", file_name)))
    }

    pub fn fetch_rom_bytes(&self, system_id: &str, file_name: &str) -> Result<Vec<u8>> {
        let path = self.locate_rom(system_id, file_name)?;
        Ok(fs::read(path)?)
    }

    pub fn save_slot(&self, system_id: &str, rom_name: &str) -> Result<SaveSlot> {
        SaveSlot::resolve(&self.data_dir, system_id, rom_name)
    }

    pub fn fetch_save(&self, system_id: &str, rom_name: &str) -> Result<Vec<u8>> {
        self.save_slot(system_id, rom_name)?.read()
    }

    pub fn store_save(&self, system_id: &str, rom_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        let slot = self.save_slot(system_id, rom_name)?;
        slot.write(bytes)?;
        Ok(slot.path().to_path_buf())
    }

    /// Cover status for every cataloged ROM
    pub fn audit_covers(&self) -> Result<CoverReport> {
        let catalog = self.catalog()?;
        Ok(CoverAuditor::new(&self.data_dir, &self.registry).report(&catalog))
    }

    /// ROMs whose name or filename contains `query`, ignoring case
    pub fn search(&self, query: &str) -> Result<Vec<CatalogEntry>> {
        let catalog = self.catalog()?;
        Ok(search_catalog(&catalog, &self.registry, query)
            .into_iter()
            .cloned()
            .collect())
    }
}
