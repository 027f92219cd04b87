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

//! Version resolution against a catalog
//!
//! Versions are ordered byte-wise, not by semantic version: "v1.0.10" sorts
//! before "v1.0.2". Catalogs are expected to use a fixed digit width per
//! segment for "newer than" answers to be meaningful. Existing catalogs rely
//! on this ordering, so it is kept as is.

use crate::catalog::Catalog;
use crate::log::EventLog;
use crate::record::{VersionInfo, VersionRecord};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct Resolver {
    catalog: Arc<Catalog>,
    log: Arc<dyn EventLog>,
}

impl Resolver {
    pub fn new(catalog: Arc<Catalog>, log: Arc<dyn EventLog>) -> Self {
        Self { catalog, log }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Greatest version strictly above `current`, with its path stripped.
    ///
    /// Ties between equal versions keep the first one in catalog order.
    pub fn list_newer_than(&self, current: &str) -> Option<VersionRecord> {
        let mut best: Option<&VersionRecord> = None;

        for record in &*self.catalog {
            if record.version.as_str() <= current {
                continue;
            }
            if best.is_none_or(|b| record.version > b.version) {
                best = Some(record);
            }
        }

        match best {
            Some(record) => {
                self.log.info(&format!(
                    "Newer version {} available for {current}",
                    record.version
                ));
                Some(record.stripped())
            }
            None => {
                self.log.info(&format!("No version newer than {current}"));
                None
            }
        }
    }

    /// Every record with its path stripped, in catalog order
    pub fn list_all(&self) -> Vec<VersionRecord> {
        self.catalog.iter().map(VersionRecord::stripped).collect()
    }

    /// Case-insensitive exact lookup. The returned record keeps its path.
    ///
    /// With duplicate versions in the catalog the first one wins.
    pub fn find_exact(&self, version: &str) -> Option<VersionRecord> {
        self.catalog
            .iter()
            .find(|r| eq_fold(&r.version, version))
            .cloned()
    }

    /// Like [`Resolver::find_exact`], but only the client-visible fields
    pub fn find_public(&self, version: &str) -> Option<VersionInfo> {
        self.find_exact(version).map(VersionInfo::from)
    }
}

fn eq_fold(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b) || a.to_lowercase() == b.to_lowercase()
}
