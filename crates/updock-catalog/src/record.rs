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

//! Version records as stored in the catalog and as advertised to clients

use serde::{Deserialize, Serialize};

/// A single catalog entry.
///
/// `path` locates the artifact relative to the artifact root. It is internal
/// and is never serialized, so a record can't leak it into a response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRecord {
    /// Version string, compared byte-wise (e.g. "v1.0.2")
    pub version: String,
    /// Artifact location relative to the artifact root
    #[serde(default, skip_serializing)]
    pub path: String,
    /// Advisory checksum, passed through unverified
    #[serde(default)]
    pub checksum: String,
}

/// Public projection of a [`VersionRecord`]: what clients get to see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    pub version: String,
    pub checksum: String,
}

impl VersionRecord {
    pub fn new(
        version: impl Into<String>,
        path: impl Into<String>,
        checksum: impl Into<String>,
    ) -> Self {
        Self {
            version: version.into(),
            path: path.into(),
            checksum: checksum.into(),
        }
    }

    /// Copy of this record with the artifact path cleared
    #[must_use]
    pub fn stripped(&self) -> Self {
        Self {
            version: self.version.clone(),
            path: String::new(),
            checksum: self.checksum.clone(),
        }
    }

    pub fn info(&self) -> VersionInfo {
        VersionInfo {
            version: self.version.clone(),
            checksum: self.checksum.clone(),
        }
    }
}

impl From<VersionRecord> for VersionInfo {
    fn from(record: VersionRecord) -> Self {
        Self {
            version: record.version,
            checksum: record.checksum,
        }
    }
}
