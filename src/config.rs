//! Reader configuration.
//!
//! Loaded from `<config dir>/dayone/config.toml` (e.g.
//! `~/.config/dayone/config.toml` on Linux). Every key is optional and a
//! missing file means defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::decode::UnknownFields;

/// Reader configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    /// The journal store to read when `--journal` is not given.
    pub journal: Option<PathBuf>,

    /// How entry documents with unmapped keys are treated.
    pub unknown_fields: UnknownFields,
}

impl Config {
    /// Load config from the default path, falling back to defaults when
    /// there is no config file.
    ///
    /// # Errors
    ///
    /// Returns a message naming the path if the file exists but cannot be
    /// read or parsed.
    pub fn load() -> Result<Self, String> {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load config from `path`, falling back to defaults if it is missing.
    ///
    /// # Errors
    ///
    /// Returns a message naming the path if the file exists but cannot be
    /// read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let contents = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(format!("failed to read {}: {e}", path.display())),
        };

        toml::from_str(&contents).map_err(|e| format!("invalid config at {}: {e}", path.display()))
    }

    /// The config file path.
    #[must_use]
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("dayone").join("config.toml"))
    }
}
