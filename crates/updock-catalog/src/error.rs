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

//! Error types for the catalog crate

use std::path::PathBuf;
use thiserror::Error;

/// Failure to load a catalog from its source file.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure to resolve a version to a downloadable artifact.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("unknown version: {0}")]
    UnknownVersion(String),

    #[error("artifact for {version} missing at {}", .path.display())]
    ArtifactMissing { version: String, path: PathBuf },

    #[error("failed to open artifact for {version} at {}: {source}", .path.display())]
    ArtifactOpen {
        version: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DownloadError {
    /// True when the client should see a "not found" response.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::UnknownVersion(_) | Self::ArtifactMissing { .. })
    }
}
