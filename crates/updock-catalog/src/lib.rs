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

//! Updock catalog - version records, lookup and artifact resolution
//!
//! The catalog is loaded once at startup and never mutated. A [`Resolver`]
//! answers "is there something newer" and "give me exactly this version"
//! queries against it, and an [`ArtifactStore`] turns a version into an
//! opened file ready to be streamed to a client.

pub mod catalog;
pub mod download;
pub mod error;
pub mod log;
pub mod record;
pub mod resolver;

pub use catalog::{Catalog, CatalogSource};
pub use download::{Artifact, ArtifactStore};
pub use error::{CatalogError, DownloadError};
pub use log::{EventLog, Level, TracingLog};

#[cfg(any(test, feature = "test-support"))]
pub use log::MemoryLog;
pub use record::{VersionInfo, VersionRecord};
pub use resolver::Resolver;
