//! Cover art presence checks

use crate::{Catalog, CatalogEntry, SystemRegistry};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Image extensions tried in order; first match wins
pub const COVER_EXTENSIONS: [&str; 3] = ["png", "jpg", "webp"];

/// Cover presence for one catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverStatus {
    pub rom: CatalogEntry,
    pub has_cover: bool,
    #[serde(skip)]
    pub cover_path: Option<PathBuf>,
}

/// Audit result with summary counts
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverReport {
    pub statuses: Vec<CoverStatus>,
    pub with_cover: usize,
    pub missing: usize,
}

impl CoverReport {
    pub fn total(&self) -> usize {
        self.statuses.len()
    }
}

/// Checks `<data_dir>/covers/<system>/<name>.<ext>` for each entry
pub struct CoverAuditor<'a> {
    data_dir: &'a Path,
    registry: &'a SystemRegistry,
}

impl<'a> CoverAuditor<'a> {
    pub fn new(data_dir: &'a Path, registry: &'a SystemRegistry) -> Self {
        Self { data_dir, registry }
    }

    /// Root of the cover tree, one subdirectory per system
    pub fn covers_root(&self) -> PathBuf {
        self.data_dir.join("covers")
    }

    /// Directory holding covers for one system
    pub fn covers_dir(&self, system_id: &str) -> PathBuf {
        self.covers_root().join(system_id)
    }

    /// First existing cover image for an entry
    pub fn find_cover(&self, rom: &CatalogEntry) -> Option<PathBuf> {
        let dir = self.covers_dir(&rom.system_id);
        COVER_EXTENSIONS
            .iter()
            .map(|ext| dir.join(format!("{}.{}", rom.display_name, ext)))
            .find(|path| path.is_file())
    }

    /// One status per entry, registry order then catalog order
    pub fn audit(&self, catalog: &Catalog) -> Vec<CoverStatus> {
        catalog
            .entries(self.registry)
            .map(|rom| {
                let cover_path = self.find_cover(rom);
                CoverStatus {
                    rom: rom.clone(),
                    has_cover: cover_path.is_some(),
                    cover_path,
                }
            })
            .collect()
    }

    /// Audit and count
    pub fn report(&self, catalog: &Catalog) -> CoverReport {
        let statuses = self.audit(catalog);
        let with_cover = statuses.iter().filter(|s| s.has_cover).count();
        let missing = statuses.len() - with_cover;
        CoverReport {
            statuses,
            with_cover,
            missing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CatalogScanner, TagOverlay};
    use std::fs;
    use tempfile::TempDir;

    struct Env {
        _temp: TempDir,
        roms: PathBuf,
        data: PathBuf,
    }

    impl Env {
        fn new() -> Self {
            let temp = TempDir::new().unwrap();
            let roms = temp.path().join("roms");
            let data = temp.path().join("data");
            fs::create_dir_all(&roms).unwrap();
            fs::create_dir_all(&data).unwrap();
            Self {
                _temp: temp,
                roms,
                data,
            }
        }

        fn rom(&self, relative: &str) {
            let path = self.roms.join(relative);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, b"ROM").unwrap();
        }

        fn cover(&self, system: &str, file: &str) {
            let dir = self.data.join("covers").join(system);
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join(file), b"IMG").unwrap();
        }
    }

    #[test]
    fn test_cover_lookup_order() {
        let env = Env::new();
        env.rom("gba/Metroid.gba");
        env.cover("gba", "Metroid.webp");
        env.cover("gba", "Metroid.jpg");

        let registry = SystemRegistry::default();
        let catalog = CatalogScanner::new(&registry)
            .scan(&env.roms, &TagOverlay::default())
            .unwrap();
        let statuses = CoverAuditor::new(&env.data, &registry).audit(&catalog);

        assert_eq!(statuses.len(), 1);
        assert!(statuses[0].has_cover);
        assert!(
            statuses[0]
                .cover_path
                .as_ref()
                .unwrap()
                .ends_with("Metroid.jpg")
        );
    }

    #[test]
    fn test_report_counts_missing() {
        let env = Env::new();
        env.rom("nes/Mario.nes");
        env.rom("Zelda.nes");
        env.rom("Tetris.gb");
        env.cover("nes", "Zelda.png");
        // Wrong system directory does not count
        env.cover("gb", "Mario.png");

        let registry = SystemRegistry::default();
        let catalog = CatalogScanner::new(&registry)
            .scan(&env.roms, &TagOverlay::default())
            .unwrap();
        let report = CoverAuditor::new(&env.data, &registry).report(&catalog);

        assert_eq!(report.total(), 3);
        assert_eq!(report.with_cover, 1);
        assert_eq!(report.missing, 2);

        let order: Vec<_> = report
            .statuses
            .iter()
            .map(|s| s.rom.display_name.as_str())
            .collect();
        assert_eq!(order, ["Tetris", "Zelda", "Mario"]);
    }

    #[test]
    fn test_covers_dir_layout() {
        let env = Env::new();
        let registry = SystemRegistry::default();
        let auditor = CoverAuditor::new(&env.data, &registry);
        assert_eq!(auditor.covers_root(), env.data.join("covers"));
        assert_eq!(auditor.covers_dir("snes"), env.data.join("covers/snes"));
    }

    #[test]
    fn test_missing_covers_dir_is_not_an_error() {
        let env = Env::new();
        env.rom("Tetris.gb");

        let registry = SystemRegistry::default();
        let catalog = CatalogScanner::new(&registry)
            .scan(&env.roms, &TagOverlay::default())
            .unwrap();
        let statuses = CoverAuditor::new(&env.data, &registry).audit(&catalog);
        assert!(!statuses[0].has_cover);
        assert!(statuses[0].cover_path.is_none());
    }
}
