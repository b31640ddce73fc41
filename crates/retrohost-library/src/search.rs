//! Name lookup and player links

use crate::{Catalog, CatalogEntry, SystemDescriptor, SystemRegistry};

/// Case-insensitive substring match on display name or filename
pub fn search_catalog<'a>(
    catalog: &'a Catalog,
    registry: &'a SystemRegistry,
    query: &str,
) -> Vec<&'a CatalogEntry> {
    let query = query.trim().to_lowercase();

    catalog
        .entries(registry)
        .filter(|rom| {
            rom.display_name.to_lowercase().contains(&query)
                || rom.file_name.to_lowercase().contains(&query)
        })
        .collect()
}

/// URL that opens a ROM in the bundled player
pub fn player_url(host: &str, rom: &CatalogEntry, system: &SystemDescriptor) -> String {
    format!(
        "http://{}/player.html?system={}&rom={}&core={}",
        host, rom.system_id, rom.file_name, system.core
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CatalogScanner, TagOverlay};
    use std::fs;
    use tempfile::TempDir;

    fn catalog_with(files: &[&str]) -> (TempDir, Catalog) {
        let dir = TempDir::new().unwrap();
        for file in files {
            let path = dir.path().join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, b"ROM").unwrap();
        }
        let registry = SystemRegistry::default();
        let catalog = CatalogScanner::new(&registry)
            .scan(dir.path(), &TagOverlay::default())
            .unwrap();
        (dir, catalog)
    }

    #[test]
    fn test_search_matches_name_and_filename() {
        let (_dir, catalog) = catalog_with(&[
            "nes/Super Mario Bros.nes",
            "snes/Super Mario World.smc",
            "Zelda.nes",
        ]);
        let registry = SystemRegistry::default();

        assert_eq!(search_catalog(&catalog, &registry, "mario").len(), 2);
        assert_eq!(search_catalog(&catalog, &registry, "SMC").len(), 1);
        assert_eq!(search_catalog(&catalog, &registry, "zelda")[0].system_id, "nes");
        assert!(search_catalog(&catalog, &registry, "metroid").is_empty());
    }

    #[test]
    fn test_player_url() {
        let registry = SystemRegistry::default();
        let rom = CatalogEntry {
            display_name: "Metroid".to_string(),
            file_name: "Metroid.gba".to_string(),
            system_id: "gba".to_string(),
            tag: String::new(),
        };
        let system = registry.by_id("gba").unwrap();
        assert_eq!(
            player_url("localhost:8080", &rom, system),
            "http://localhost:8080/player.html?system=gba&rom=Metroid.gba&core=vba_next"
        );
    }
}
