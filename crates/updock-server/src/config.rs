// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of Updock.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::warn;
use updock_catalog::CatalogSource;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub catalog: CatalogSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogSettings {
    /// JSON catalog file; the built-in table is used when unset
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Directory catalog paths are resolved against
    #[serde(default = "default_artifact_root")]
    pub artifact_root: PathBuf,
}

fn default_bind_address() -> String {
    "0.0.0.0".to_owned()
}

fn default_port() -> u16 {
    8080
}

fn default_artifact_root() -> PathBuf {
    PathBuf::from(".")
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            path: None,
            artifact_root: default_artifact_root(),
        }
    }
}

impl ServerConfig {
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(Path::new(path))
            .with_context(|| format!("Failed to read config file: {path}"))?;
        toml::from_str(&content).with_context(|| "Failed to parse config TOML")
    }

    /// Like [`ServerConfig::from_file`], but a missing file yields defaults
    pub fn load(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            Self::from_file(path)
        } else {
            warn!(path = %path, "Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Replace the catalog path, e.g. from `UPDOCK_CATALOG`
    #[must_use]
    pub fn with_catalog_override(mut self, catalog: Option<String>) -> Self {
        if let Some(path) = catalog.filter(|p| !p.is_empty()) {
            self.catalog.path = Some(PathBuf::from(path));
        }
        self
    }

    pub fn catalog_source(&self) -> CatalogSource {
        match &self.catalog.path {
            Some(path) => CatalogSource::File(path.clone()),
            None => CatalogSource::Builtin,
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.bind_address, self.server.port)
    }
}
