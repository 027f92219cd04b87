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

//! HTTP routes: version listing, version lookup and artifact download

use std::io;

use axum::Json;
use axum::Router;
use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::Response;
use axum::routing::get;
use futures_util::Stream;
use serde::Serialize;
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use updock_catalog::{Artifact, ArtifactStore, Resolver, VersionInfo, VersionRecord};

use crate::error::ApiError;

const CHUNK_SIZE: usize = 64 * 1024;

#[derive(Debug, Clone)]
pub struct AppState {
    pub resolver: Resolver,
    pub artifacts: ArtifactStore,
}

/// Query of the listing route. Repeated keys keep their first value.
#[derive(Debug, Default)]
pub struct ListQuery {
    /// Installed version of the calling device
    pub version: Option<String>,
    /// Hardware revision, logged only
    pub hwversion: Option<String>,
}

impl ListQuery {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "version" if query.version.is_none() => query.version = Some(value),
                "hwversion" if query.hwversion.is_none() => query.hwversion = Some(value),
                _ => {}
            }
        }
        query
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub versions: usize,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_versions_handler))
        .route("/version/{version}", get(get_version_handler))
        .route("/download/{version}", get(download_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET / - Full catalog, or the newest version above `?version=`
#[expect(clippy::unused_async, reason = "axum handler must be async")]
pub async fn list_versions_handler(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Json<Vec<VersionInfo>> {
    let query = ListQuery::from_pairs(pairs);
    let current = query.version.as_deref().filter(|v| !v.is_empty());

    let Some(current) = current else {
        return Json(state.resolver.list_all().iter().map(VersionRecord::info).collect());
    };

    info!(
        current = %current,
        hwversion = %query.hwversion.as_deref().unwrap_or(""),
        "Checking for newer version"
    );
    let newer = state.resolver.list_newer_than(current);
    Json(newer.into_iter().map(VersionInfo::from).collect())
}

/// GET /version/{version}
#[expect(clippy::unused_async, reason = "axum handler must be async")]
pub async fn get_version_handler(
    State(state): State<AppState>,
    Path(version): Path<String>,
) -> Result<Json<VersionInfo>, ApiError> {
    state
        .resolver
        .find_public(&version)
        .map(Json)
        .ok_or_else(|| {
            debug!(version = %version, "Version lookup missed");
            ApiError::not_found(format!("version {version} not found"))
        })
}

/// GET /download/{version} - Stream the artifact
pub async fn download_handler(
    State(state): State<AppState>,
    Path(version): Path<String>,
) -> Result<Response, ApiError> {
    let Artifact {
        file,
        len,
        filename,
        checksum,
        ..
    } = state
        .artifacts
        .resolve_download(&state.resolver, &version)
        .await?;

    let mut response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .header(header::CONTENT_LENGTH, len)
        .header(header::CONTENT_DISPOSITION, content_disposition(&filename));
    if !checksum.is_empty() {
        response = response.header("x-checksum", checksum);
    }

    response
        .body(Body::from_stream(file_stream(file)))
        .map_err(|e| ApiError::internal(format!("failed to build response: {e}")))
}

#[expect(clippy::unused_async, reason = "axum handler must be async")]
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        versions: state.resolver.catalog().len(),
    })
}

/// `attachment` disposition with a filename safe to put in a quoted header value
fn content_disposition(filename: &str) -> String {
    let safe: String = filename
        .chars()
        .map(|c| {
            if c == '"' || c == '\\' || !(c.is_ascii_graphic() || c == ' ') {
                '_'
            } else {
                c
            }
        })
        .collect();
    format!("attachment; filename=\"{safe}\"")
}

/// Reads the file in fixed-size chunks. The file is closed when the stream
/// is dropped, whether it ran to the end or the client went away.
fn file_stream(file: File) -> impl Stream<Item = io::Result<Vec<u8>>> + Send + 'static {
    futures_util::stream::try_unfold(file, |mut file| async move {
        let mut buf = vec![0_u8; CHUNK_SIZE];
        let n = file.read(&mut buf).await?;
        if n == 0 {
            return Ok::<_, io::Error>(None);
        }
        buf.truncate(n);
        Ok(Some((buf, file)))
    })
}
