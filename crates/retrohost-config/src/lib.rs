//! Configuration management for RetroHost
//!
//! Settings are layered: built-in defaults, then an optional TOML file named by
//! `RETROHOST_CONFIG`, then the process environment (`ROM_DIR`, `DATA_DIR`,
//! `PORT`, `HOST_ADDR`, `FRONTEND_DIR`, `EMULATORJS_DIR`).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

/// Environment variable naming an optional TOML configuration file
pub const CONFIG_FILE_ENV: &str = "RETROHOST_CONFIG";

pub const DEFAULT_ROM_DIR: &str = "/roms";
pub const DEFAULT_DATA_DIR: &str = "/data";
pub const DEFAULT_PORT: u16 = 8080;

/// Container location searched for bundled assets
const CONTAINER_ASSET_ROOT: &str = "/app";

/// RetroHost process configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetroHostConfig {
    /// Directory tree containing ROM files
    pub rom_dir: PathBuf,

    /// Directory for tags.json, saves and covers
    pub data_dir: PathBuf,

    /// HTTP listen port
    pub port: u16,

    /// External address used when printing URLs
    #[serde(default)]
    pub host_addr: Option<String>,

    /// Player UI directory
    #[serde(default)]
    pub frontend_dir: Option<PathBuf>,

    /// EmulatorJS asset directory
    #[serde(default)]
    pub emulatorjs_dir: Option<PathBuf>,
}

impl Default for RetroHostConfig {
    fn default() -> Self {
        Self {
            rom_dir: PathBuf::from(DEFAULT_ROM_DIR),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            port: DEFAULT_PORT,
            host_addr: None,
            frontend_dir: None,
            emulatorjs_dir: None,
        }
    }
}

impl RetroHostConfig {
    /// Load configuration from the process environment
    pub fn load() -> Result<Self, ConfigError> {
        let file = std::env::var(CONFIG_FILE_ENV)
            .ok()
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);
        Self::load_from(file.as_deref(), None)
    }

    /// Load configuration from an optional file and an explicit environment map.
    ///
    /// Passing `None` for `env` reads the real process environment.
    pub fn load_from(
        file: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder()
            .set_default("rom_dir", DEFAULT_ROM_DIR)?
            .set_default("data_dir", DEFAULT_DATA_DIR)?
            .set_default("port", i64::from(DEFAULT_PORT))?;

        if let Some(path) = file {
            if !path.exists() {
                tracing::warn!("Config file {} not found, ignoring", path.display());
            }
            builder = builder.add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(false),
            );
        }

        builder = builder.add_source(
            config::Environment::default()
                .ignore_empty(true)
                .source(env),
        );

        let settings = builder.build()?;
        let port = settings.get_string("port")?;
        if port.parse::<u16>().is_err() {
            return Err(ConfigError::Invalid(format!(
                "port {:?} is not a number between 1 and 65535",
                port
            )));
        }

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rom_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("rom_dir must not be empty".into()));
        }
        if self.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("data_dir must not be empty".into()));
        }
        if self.port == 0 {
            return Err(ConfigError::Invalid(
                "port must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// Host (and port) used in printed player URLs
    pub fn public_host(&self) -> String {
        match self.host_addr.as_deref() {
            Some(host) if !host.is_empty() => host.to_string(),
            _ => format!("localhost:{}", self.port),
        }
    }

    /// Socket address string for the HTTP listener
    pub fn listen_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }

    /// Directory holding the player UI
    pub fn frontend_dir(&self) -> PathBuf {
        resolve_asset_dir(self.frontend_dir.as_deref(), "frontend")
    }

    /// Directory holding EmulatorJS
    pub fn emulatorjs_dir(&self) -> PathBuf {
        resolve_asset_dir(self.emulatorjs_dir.as_deref(), "emulatorjs")
    }
}

/// Pick an asset directory: explicit setting, then `./<name>`, then `/app/<name>`
pub fn resolve_asset_dir(explicit: Option<&Path>, name: &str) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }

    let local = Path::new(".").join(name);
    if local.is_dir() {
        return local;
    }

    let container = Path::new(CONTAINER_ASSET_ROOT).join(name);
    if container.is_dir() {
        return container;
    }

    tracing::warn!(
        "{} directory not found at {} or {}",
        name,
        local.display(),
        container.display()
    );
    local
}
