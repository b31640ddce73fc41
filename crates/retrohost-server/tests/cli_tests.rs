//! Text output of the list, covers and play subcommands

use retrohost_library::{GameLibrary, SystemRegistry};
use retrohost_server::cli;
use std::fs;
use tempfile::TempDir;

fn library_with(files: &[&str]) -> (TempDir, GameLibrary) {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let roms_dir = temp_dir.path().join("roms");
    let data_dir = temp_dir.path().join("data");
    fs::create_dir_all(&roms_dir).unwrap();
    fs::create_dir_all(&data_dir).unwrap();

    for file in files {
        let path = roms_dir.join(file);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"FAKE_ROM_DATA").unwrap();
    }

    let library = GameLibrary::new(SystemRegistry::default(), roms_dir, data_dir);
    (temp_dir, library)
}

#[test]
fn test_list_sorts_names_within_system() {
    let (_tmp, library) = library_with(&["nes/Zelda.nes", "Mario.nes", "gb/Tetris.gb"]);

    let output = cli::list(&library).unwrap();
    let lines: Vec<_> = output.lines().collect();

    assert_eq!(lines.len(), 5);
    assert!(lines[0].starts_with("SYSTEM"));
    assert!(lines[1].starts_with("------"));
    assert!(lines[2].starts_with("Game Boy"));
    assert!(lines[2].ends_with("Tetris.gb"));
    assert!(lines[3].contains("Mario"));
    assert!(lines[4].contains("Zelda"));
}

#[test]
fn test_list_empty_catalog() {
    let (_tmp, library) = library_with(&["notes.txt"]);
    let output = cli::list(&library).unwrap();
    assert!(output.starts_with("No ROMs found in"));
}

#[test]
fn test_list_missing_root_fails() {
    let (tmp, library) = library_with(&[]);
    fs::remove_dir_all(tmp.path().join("roms")).unwrap();
    assert!(cli::list(&library).is_err());
}

#[test]
fn test_covers_summary() {
    let (_tmp, library) = library_with(&["nes/Mario.nes", "Zelda.nes"]);
    let covers = library.data_dir().join("covers/nes");
    fs::create_dir_all(&covers).unwrap();
    fs::write(covers.join("Mario.jpg"), b"JPG").unwrap();

    let output = cli::covers(&library).unwrap();
    assert!(output.contains("✓"));
    assert!(output.contains("✗ missing"));
    assert!(output.contains("1/2 ROMs have covers (1 missing)"));
    assert!(output.contains("covers/<system>/<rom-name>.{png,jpg,webp}"));
}

#[test]
fn test_covers_all_present() {
    let (_tmp, library) = library_with(&["gb/Tetris.gb"]);
    let covers = library.data_dir().join("covers/gb");
    fs::create_dir_all(&covers).unwrap();
    fs::write(covers.join("Tetris.webp"), b"WEBP").unwrap();

    let output = cli::covers(&library).unwrap();
    assert!(output.contains("1/1 ROMs have covers\n"));
    assert!(!output.contains("missing)"));
}

#[test]
fn test_play_single_match() {
    let (_tmp, library) = library_with(&["gba/Metroid Fusion.gba", "Zelda.nes"]);

    let output = cli::play(&library, "localhost:8080", "metroid").unwrap();
    assert!(output.starts_with("Open this URL to play Metroid Fusion:"));
    assert!(output.contains(
        "http://localhost:8080/player.html?system=gba&rom=Metroid Fusion.gba&core=vba_next"
    ));
}

#[test]
fn test_play_multiple_matches() {
    let (_tmp, library) = library_with(&["nes/Super Mario Bros.nes", "snes/Super Mario World.sfc"]);

    let output = cli::play(&library, "games.lan", "Super Mario").unwrap();
    assert!(output.starts_with("Multiple ROMs match 'super mario':"));
    assert!(output.contains("[NES] Super Mario Bros"));
    assert!(output.contains("[SNES] Super Mario World"));
    assert!(output.contains("http://games.lan/player.html?system=snes"));
}

#[test]
fn test_play_no_match_is_an_error() {
    let (_tmp, library) = library_with(&["Zelda.nes"]);
    let err = cli::play(&library, "localhost:8080", "metroid").unwrap_err();
    assert!(err.to_string().contains("No ROM found matching 'metroid'"));
}
