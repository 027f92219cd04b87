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

//! Artifact resolution for downloads

use crate::error::DownloadError;
use crate::log::EventLog;
use crate::resolver::Resolver;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs::File;

/// An opened artifact, ready to be streamed.
///
/// Dropping it closes the file, so whoever owns the response body owns the
/// handle's lifetime.
#[derive(Debug)]
pub struct Artifact {
    pub file: File,
    pub len: u64,
    /// Final path segment only
    pub filename: String,
    pub version: String,
    pub checksum: String,
}

/// Artifacts on local disk, addressed by catalog paths relative to `root`
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
    log: Arc<dyn EventLog>,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>, log: Arc<dyn EventLog>) -> Self {
        Self {
            root: root.into(),
            log,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn resolve_download(
        &self,
        resolver: &Resolver,
        version: &str,
    ) -> Result<Artifact, DownloadError> {
        let Some(record) = resolver.find_exact(version) else {
            self.log.warn(&format!("Download rejected: unknown version {version}"));
            return Err(DownloadError::UnknownVersion(version.to_owned()));
        };

        let path = self.root.join(&record.path);

        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => return Err(self.missing(&record.version, path)),
            // A file where the catalog expects a directory is drift too
            Err(e)
                if matches!(
                    e.kind(),
                    std::io::ErrorKind::NotFound | std::io::ErrorKind::NotADirectory
                ) =>
            {
                return Err(self.missing(&record.version, path));
            }
            Err(source) => return Err(self.open_failed(&record.version, path, source)),
        }

        let file = match File::open(&path).await {
            Ok(file) => file,
            Err(source) => return Err(self.open_failed(&record.version, path, source)),
        };
        let len = match file.metadata().await {
            Ok(meta) => meta.len(),
            Err(source) => return Err(self.open_failed(&record.version, path, source)),
        };

        let filename = file_name(&record.path).unwrap_or_else(|| record.version.clone());
        self.log.info(&format!(
            "Serving {} as {filename} ({len} bytes)",
            record.version
        ));

        Ok(Artifact {
            file,
            len,
            filename,
            version: record.version,
            checksum: record.checksum,
        })
    }

    fn missing(&self, version: &str, path: PathBuf) -> DownloadError {
        self.log.error(&format!(
            "Download failed: artifact missing for {version} at {}",
            path.display()
        ));
        DownloadError::ArtifactMissing {
            version: version.to_owned(),
            path,
        }
    }

    fn open_failed(&self, version: &str, path: PathBuf, source: std::io::Error) -> DownloadError {
        self.log.error(&format!(
            "Download failed: cannot open artifact for {version} at {}: {source}",
            path.display()
        ));
        DownloadError::ArtifactOpen {
            version: version.to_owned(),
            path,
            source,
        }
    }
}

fn file_name(path: &str) -> Option<String> {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::log::{Level, MemoryLog};
    use crate::record::VersionRecord;
    use tokio::io::AsyncReadExt;

    struct Fixture {
        dir: tempfile::TempDir,
        log: Arc<MemoryLog>,
        resolver: Resolver,
        store: ArtifactStore,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("builds")).unwrap();
        std::fs::write(dir.path().join("builds/update_v1.0.0.zip"), b"firmware-1.0.0").unwrap();

        let catalog = Catalog::from_records(vec![
            VersionRecord::new("v1.0.0", "builds/update_v1.0.0.zip", ""),
            VersionRecord::new("v1.0.2", "builds/update_v1.0.2.zip", "c2a0"),
            VersionRecord::new("v1.0.3", "builds", ""),
            VersionRecord::new("v1.0.4", "builds/update_v1.0.0.zip/inner", ""),
            VersionRecord::new("v1.0.5", "x".repeat(300), ""),
        ]);
        let log = Arc::new(MemoryLog::new());
        let resolver = Resolver::new(Arc::new(catalog), log.clone());
        let store = ArtifactStore::new(dir.path(), log.clone());

        Fixture {
            dir,
            log,
            resolver,
            store,
        }
    }

    #[tokio::test]
    async fn test_resolve_existing_artifact() {
        let f = fixture();

        let mut artifact = f.store.resolve_download(&f.resolver, "V1.0.0").await.unwrap();

        assert_eq!(artifact.version, "v1.0.0");
        assert_eq!(artifact.filename, "update_v1.0.0.zip");
        assert_eq!(artifact.len, 14);

        let mut content = Vec::new();
        artifact.file.read_to_end(&mut content).await.unwrap();
        assert_eq!(content, b"firmware-1.0.0");
    }

    #[tokio::test]
    async fn test_unknown_version() {
        let f = fixture();

        let err = f.store.resolve_download(&f.resolver, "v9.9.9").await.unwrap_err();

        assert!(matches!(err, DownloadError::UnknownVersion(ref v) if v == "v9.9.9"));
        assert!(err.is_not_found());
        assert_eq!(f.log.messages(Level::Warn).len(), 1);
        assert!(f.log.messages(Level::Error).is_empty());
    }

    #[tokio::test]
    async fn test_artifact_missing_is_logged_distinctly() {
        let f = fixture();

        let err = f.store.resolve_download(&f.resolver, "v1.0.2").await.unwrap_err();

        assert!(matches!(err, DownloadError::ArtifactMissing { .. }));
        assert!(err.is_not_found());
        assert!(f.log.messages(Level::Warn).is_empty());
        let errors = f.log.messages(Level::Error);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("artifact missing"));
    }

    #[tokio::test]
    async fn test_artifact_deleted_after_load() {
        let f = fixture();
        assert!(f.store.resolve_download(&f.resolver, "v1.0.0").await.is_ok());

        std::fs::remove_file(f.dir.path().join("builds/update_v1.0.0.zip")).unwrap();

        let err = f.store.resolve_download(&f.resolver, "v1.0.0").await.unwrap_err();
        assert!(matches!(err, DownloadError::ArtifactMissing { .. }));
    }

    #[tokio::test]
    async fn test_directory_is_not_an_artifact() {
        let f = fixture();
        let err = f.store.resolve_download(&f.resolver, "v1.0.3").await.unwrap_err();
        assert!(matches!(err, DownloadError::ArtifactMissing { .. }));
    }

    #[tokio::test]
    async fn test_path_under_a_file_is_missing() {
        let f = fixture();

        let err = f.store.resolve_download(&f.resolver, "v1.0.4").await.unwrap_err();

        assert!(matches!(err, DownloadError::ArtifactMissing { .. }));
        let errors = f.log.messages(Level::Error);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("artifact missing"));
    }

    #[tokio::test]
    async fn test_unopenable_artifact() {
        let f = fixture();

        // Name longer than any filesystem allows: lookup fails with something other than NotFound
        let err = f.store.resolve_download(&f.resolver, "v1.0.5").await.unwrap_err();

        assert!(matches!(err, DownloadError::ArtifactOpen { ref version, .. } if version == "v1.0.5"));
        assert!(!err.is_not_found());
        let errors = f.log.messages(Level::Error);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("cannot open artifact"));
        assert!(f.log.messages(Level::Warn).is_empty());
    }

    #[test]
    fn test_file_name_is_last_segment() {
        assert_eq!(file_name("a/b/update.zip").as_deref(), Some("update.zip"));
        assert_eq!(file_name("update.zip").as_deref(), Some("update.zip"));
        assert_eq!(file_name(""), None);
    }

    #[test]
    fn test_open_error_is_not_not_found() {
        let err = DownloadError::ArtifactOpen {
            version: "v1.0.0".to_owned(),
            path: PathBuf::from("x"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert!(!err.is_not_found());
    }
}
