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

//! Version catalog loading
//!
//! The catalog is either the built-in table or a JSON array of records read
//! from disk. A catalog that fails to load degrades to an empty one: the
//! server keeps running and simply advertises no versions.

use crate::error::CatalogError;
use crate::log::EventLog;
use crate::record::VersionRecord;
use std::path::{Path, PathBuf};

/// Where the catalog comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    Builtin,
    File(PathBuf),
}

/// Immutable, ordered set of known versions.
///
/// Source order is preserved. Version uniqueness is assumed but not enforced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    records: Vec<VersionRecord>,
}

impl Catalog {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<VersionRecord>) -> Self {
        Self { records }
    }

    /// The table shipped with the server, used when no catalog file is configured
    pub fn builtin() -> Self {
        Self::from_records(vec![
            VersionRecord::new("v1.0.0", "update_v1.0.0.zip", ""),
            VersionRecord::new(
                "v1.0.2",
                "update_v1.0.2.zip",
                "c2a0e601af0da61e9015018a044749166a66123a",
            ),
        ])
    }

    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let records: Vec<VersionRecord> =
            serde_json::from_str(&content).map_err(|source| CatalogError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::from_records(records))
    }

    /// Load the catalog, falling back to an empty one on any failure.
    pub fn load(source: &CatalogSource, log: &dyn EventLog) -> Self {
        match source {
            CatalogSource::Builtin => {
                let catalog = Self::builtin();
                log.info(&format!(
                    "Loaded built-in catalog with {} versions",
                    catalog.len()
                ));
                catalog
            }
            CatalogSource::File(path) => match Self::from_file(path) {
                Ok(catalog) => {
                    log.info(&format!(
                        "Loaded catalog from {} with {} versions",
                        path.display(),
                        catalog.len()
                    ));
                    catalog
                }
                Err(e) => {
                    log.error(&format!("CatalogLoadError: {e}; serving an empty catalog"));
                    Self::empty()
                }
            },
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, VersionRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a VersionRecord;
    type IntoIter = std::slice::Iter<'a, VersionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::{Level, MemoryLog};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_catalog(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_builtin_catalog() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.len(), 2);

        let versions: Vec<&str> = catalog.iter().map(|r| r.version.as_str()).collect();
        assert_eq!(versions, vec!["v1.0.0", "v1.0.2"]);
        assert!(catalog.iter().all(|r| !r.path.is_empty()));
    }

    #[test]
    fn test_from_file_preserves_order() {
        let file = write_catalog(
            r#"[
                {"version": "v1.0.2", "path": "b.zip", "checksum": "c2"},
                {"version": "v1.0.0", "path": "a.zip", "checksum": ""},
                {"version": "v1.0.1", "path": "c.zip"}
            ]"#,
        );

        let catalog = Catalog::from_file(file.path()).unwrap();
        let versions: Vec<&str> = catalog.iter().map(|r| r.version.as_str()).collect();
        assert_eq!(versions, vec!["v1.0.2", "v1.0.0", "v1.0.1"]);
        assert_eq!(catalog.iter().next().unwrap().path, "b.zip");
    }

    #[test]
    fn test_from_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let result = Catalog::from_file(&dir.path().join("versions.json"));
        assert!(matches!(result, Err(CatalogError::Io { .. })));
    }

    #[test]
    fn test_from_file_malformed() {
        let file = write_catalog(r#"[{"version": "v1.0.0", "#);
        let result = Catalog::from_file(file.path());
        assert!(matches!(result, Err(CatalogError::Parse { .. })));
    }

    #[test]
    fn test_load_malformed_degrades_to_empty() {
        let file = write_catalog("{ not json");
        let log = MemoryLog::new();

        let catalog = Catalog::load(&CatalogSource::File(file.path().to_path_buf()), &log);

        assert!(catalog.is_empty());
        let errors = log.messages(Level::Error);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("CatalogLoadError"));
    }

    #[test]
    fn test_load_missing_file_degrades_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let log = MemoryLog::new();

        let catalog = Catalog::load(&CatalogSource::File(dir.path().join("nope.json")), &log);

        assert!(catalog.is_empty());
        assert_eq!(log.messages(Level::Error).len(), 1);
    }

    #[test]
    fn test_load_does_not_validate_entries() {
        let file = write_catalog(r#"[{"version": "", "path": "/does/not/exist", "checksum": "zz"}]"#);
        let log = MemoryLog::new();

        let catalog = Catalog::load(&CatalogSource::File(file.path().to_path_buf()), &log);

        assert_eq!(catalog.len(), 1);
        assert!(log.messages(Level::Error).is_empty());
    }

    #[test]
    fn test_load_builtin() {
        let log = MemoryLog::new();
        let catalog = Catalog::load(&CatalogSource::Builtin, &log);
        assert_eq!(catalog, Catalog::builtin());
        assert_eq!(log.messages(Level::Info).len(), 1);
    }
}
