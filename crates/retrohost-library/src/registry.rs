//! Supported systems and the classification rules that map files onto them

use crate::{LibraryError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Component, Path};

/// A supported platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemDescriptor {
    /// Short stable id, also the name of a classification directory
    pub id: String,

    /// Display name
    pub name: String,

    /// Emulation core hint, passed through to the player
    pub core: String,

    /// Lowercase extensions including the leading dot
    #[serde(skip)]
    pub extensions: Vec<String>,
}

impl SystemDescriptor {
    pub fn new(id: &str, name: &str, core: &str, extensions: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            core: core.to_string(),
            extensions: extensions.iter().map(|e| normalize_extension(e)).collect(),
        }
    }
}

/// One step of the classification decision table.
///
/// Rules are tried in order and the first one that yields a system wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassificationRule {
    /// The file sits below a top-level directory named after a system id
    DirectoryHint,
    /// The file extension belongs to a system
    Extension,
}

impl ClassificationRule {
    /// Default order: placement beats extension
    pub const DEFAULT_ORDER: [ClassificationRule; 2] =
        [ClassificationRule::DirectoryHint, ClassificationRule::Extension];

    fn apply<'a>(
        &self,
        registry: &'a SystemRegistry,
        relative: &Path,
        extension: &str,
    ) -> Option<&'a SystemDescriptor> {
        match self {
            ClassificationRule::DirectoryHint => {
                let mut components = relative.components();
                let first = match components.next() {
                    Some(Component::Normal(segment)) => segment.to_string_lossy().to_lowercase(),
                    _ => return None,
                };
                // A file named after a system at the root is not nested
                components.next()?;
                registry.by_id(&first)
            }
            ClassificationRule::Extension => registry.by_extension(extension),
        }
    }
}

/// Immutable lookup table of supported systems
#[derive(Debug, Clone)]
pub struct SystemRegistry {
    systems: Vec<SystemDescriptor>,
    by_id: HashMap<String, usize>,
    by_extension: HashMap<String, usize>,
    rules: Vec<ClassificationRule>,
}

impl Default for SystemRegistry {
    fn default() -> Self {
        Self::build(builtin_systems())
    }
}

impl SystemRegistry {
    /// Create a registry, rejecting duplicate ids and shared extensions
    pub fn new(systems: Vec<SystemDescriptor>) -> Result<Self> {
        let mut ids = HashSet::new();
        let mut extensions: HashMap<&str, &str> = HashMap::new();

        for system in &systems {
            if system.id.is_empty() || system.id != system.id.to_lowercase() {
                return Err(LibraryError::Registry(format!(
                    "system id {:?} must be non-empty and lowercase",
                    system.id
                )));
            }
            if !ids.insert(system.id.as_str()) {
                return Err(LibraryError::Registry(format!(
                    "duplicate system id {:?}",
                    system.id
                )));
            }
            for ext in &system.extensions {
                if let Some(owner) = extensions.insert(ext.as_str(), system.id.as_str()) {
                    return Err(LibraryError::Registry(format!(
                        "extension {} claimed by both {} and {}",
                        ext, owner, system.id
                    )));
                }
            }
        }

        Ok(Self::build(systems))
    }

    fn build(systems: Vec<SystemDescriptor>) -> Self {
        let mut by_id = HashMap::new();
        let mut by_extension = HashMap::new();
        for (index, system) in systems.iter().enumerate() {
            by_id.insert(system.id.clone(), index);
            for ext in &system.extensions {
                by_extension.insert(ext.clone(), index);
            }
        }

        Self {
            systems,
            by_id,
            by_extension,
            rules: ClassificationRule::DEFAULT_ORDER.to_vec(),
        }
    }

    /// Replace the classification rule order
    pub fn with_rules(mut self, rules: Vec<ClassificationRule>) -> Self {
        self.rules = rules;
        self
    }

    /// All systems in declaration order
    pub fn all(&self) -> &[SystemDescriptor] {
        &self.systems
    }

    pub fn by_id(&self, id: &str) -> Option<&SystemDescriptor> {
        self.by_id.get(id).map(|&i| &self.systems[i])
    }

    /// Look up by extension; case and leading dot are optional
    pub fn by_extension(&self, extension: &str) -> Option<&SystemDescriptor> {
        if extension.is_empty() {
            return None;
        }
        self.by_extension
            .get(&normalize_extension(extension))
            .map(|&i| &self.systems[i])
    }

    /// Classify a file by its path relative to the ROM root
    pub fn classify(&self, relative: &Path, extension: &str) -> Option<&SystemDescriptor> {
        self.rules
            .iter()
            .find_map(|rule| rule.apply(self, relative, extension))
    }
}

fn normalize_extension(ext: &str) -> String {
    let ext = ext.to_lowercase();
    if ext.starts_with('.') {
        ext
    } else {
        format!(".{}", ext)
    }
}

/// Systems supported by the bundled player
pub fn builtin_systems() -> Vec<SystemDescriptor> {
    vec![
        SystemDescriptor::new("gb", "Game Boy", "gb", &[".gb"]),
        SystemDescriptor::new("gbc", "Game Boy Color", "gb", &[".gbc"]),
        SystemDescriptor::new("gba", "Game Boy Advance", "vba_next", &[".gba"]),
        SystemDescriptor::new("nes", "NES", "nes", &[".nes"]),
        SystemDescriptor::new("snes", "SNES", "snes", &[".smc", ".sfc"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_systems_are_consistent() {
        let registry = SystemRegistry::new(builtin_systems()).unwrap();
        assert_eq!(registry.all().len(), 5);
        assert_eq!(registry.all()[0].id, "gb");
    }

    #[test]
    fn test_lookup_by_extension() {
        let registry = SystemRegistry::default();
        assert_eq!(registry.by_extension(".sfc").unwrap().id, "snes");
        assert_eq!(registry.by_extension(".SMC").unwrap().id, "snes");
        assert_eq!(registry.by_extension("gba").unwrap().core, "vba_next");
        assert!(registry.by_extension(".zip").is_none());
        assert!(registry.by_extension("").is_none());
    }

    #[test]
    fn test_lookup_by_id() {
        let registry = SystemRegistry::default();
        assert_eq!(registry.by_id("gbc").unwrap().name, "Game Boy Color");
        assert!(registry.by_id("psx").is_none());
    }

    #[test]
    fn test_shared_extension_rejected() {
        let err = SystemRegistry::new(vec![
            SystemDescriptor::new("md", "Mega Drive", "genesis", &[".bin"]),
            SystemDescriptor::new("a26", "Atari 2600", "stella", &[".bin", ".a26"]),
        ])
        .unwrap_err();
        assert!(matches!(err, LibraryError::Registry(_)));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let err = SystemRegistry::new(vec![
            SystemDescriptor::new("nes", "NES", "nes", &[".nes"]),
            SystemDescriptor::new("nes", "Famicom", "nes", &[".fds"]),
        ])
        .unwrap_err();
        assert!(matches!(err, LibraryError::Registry(_)));
    }

    #[test]
    fn test_uppercase_id_rejected() {
        assert!(SystemRegistry::new(vec![SystemDescriptor::new("NES", "NES", "nes", &[])]).is_err());
    }

    #[test]
    fn test_directory_hint_wins_over_extension() {
        let registry = SystemRegistry::default();
        let system = registry.classify(Path::new("gbc/Tetris.gb"), ".gb").unwrap();
        assert_eq!(system.id, "gbc");
    }

    #[test]
    fn test_directory_hint_is_case_insensitive() {
        let registry = SystemRegistry::default();
        let system = registry.classify(Path::new("SNES/deep/Game"), "").unwrap();
        assert_eq!(system.id, "snes");
    }

    #[test]
    fn test_root_file_named_after_system_is_not_nested() {
        let registry = SystemRegistry::default();
        assert!(registry.classify(Path::new("nes"), "").is_none());
        assert!(registry.classify(Path::new("NES"), "").is_none());
    }

    #[test]
    fn test_extension_only_rules() {
        let registry = SystemRegistry::default().with_rules(vec![ClassificationRule::Extension]);
        let system = registry.classify(Path::new("gbc/Tetris.gb"), ".gb").unwrap();
        assert_eq!(system.id, "gb");
    }
}
