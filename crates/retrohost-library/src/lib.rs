//! ROM catalog engine for RetroHost
//!
//! Walks a ROM directory, classifies each file by target system, overlays
//! user tags, audits cover art and resolves per-game save slots.
//! Every catalog call is a fresh, stateless pass over the filesystem.

mod covers;
mod library;
mod registry;
mod saves;
mod scanner;
mod search;
mod tags;

pub use covers::{COVER_EXTENSIONS, CoverAuditor, CoverReport, CoverStatus};
pub use library::{GameLibrary, SystemSummary};
pub use registry::{ClassificationRule, SystemDescriptor, SystemRegistry, builtin_systems};
pub use saves::{MAX_SAVE_BYTES, SaveSlot, validate_identifier};
pub use scanner::{Catalog, CatalogEntry, CatalogScanner, IGNORED_EXTENSIONS, locate_rom_file};
pub use search::{player_url, search_catalog};
pub use tags::{TAGS_FILE, TagOverlay};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    #[error("Payload too large: {size} bytes exceeds limit of {limit} bytes")]
    PayloadTooLarge { size: usize, limit: usize },

    #[error("Malformed configuration: {0}")]
    MalformedConfig(String),

    #[error("Registry conflict: {0}")]
    Registry(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LibraryError>;
