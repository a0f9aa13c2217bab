//! Bundled single-page frontend: static assets first, then the root
//! document, then a plain liveness line when no bundle is deployed.

use crate::assets::{self, AssetResolution};
use crate::routing::ServedBy;
use axum::{
    Extension,
    body::Body,
    extract::Request,
    http::{Method, StatusCode, header},
    response::{IntoResponse, Response},
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower::ServiceExt;
use tower_http::services::ServeFile;

/// Request headers dropped before the root document is served as a fallback.
const UNCONDITIONAL: [header::HeaderName; 6] = [
    header::IF_MATCH,
    header::IF_NONE_MATCH,
    header::IF_MODIFIED_SINCE,
    header::IF_UNMODIFIED_SINCE,
    header::IF_RANGE,
    header::RANGE,
];

#[derive(Clone, Debug)]
pub struct Frontend {
    asset_root: Arc<Path>,
    running_message: Arc<str>,
}

impl Frontend {
    pub fn new(asset_root: impl Into<PathBuf>, running_message: impl Into<String>) -> Self {
        Self {
            asset_root: Arc::from(asset_root.into()),
            running_message: Arc::from(running_message.into()),
        }
    }

    /// Answers any request no route group claimed.
    pub async fn serve(&self, req: Request) -> Response {
        if !matches!(*req.method(), Method::GET | Method::HEAD) {
            return (
                StatusCode::METHOD_NOT_ALLOWED,
                [(header::ALLOW, "GET, HEAD")],
            )
                .into_response();
        }

        match assets::resolve(req.uri().path(), &self.asset_root).await {
            AssetResolution::Found(path) => serve_file(path, req, ServedBy::Asset).await,
            AssetResolution::NotFoundFallback | AssetResolution::NotFoundNoIndex => {
                self.fallback(req).await
            }
        }
    }

    /// Serves the root document so a client-side router can take over, or
    /// the liveness line when there is no bundle. Always a success status.
    pub async fn fallback(&self, mut req: Request) -> Response {
        match assets::locate_index(&self.asset_root).await {
            AssetResolution::Found(index) => {
                // The document stands in for whatever was asked for, so
                // validators and ranges from the client do not apply to it
                let headers = req.headers_mut();
                for name in UNCONDITIONAL {
                    headers.remove(name);
                }
                serve_file(index, req, ServedBy::Index).await
            }
            AssetResolution::NotFoundFallback | AssetResolution::NotFoundNoIndex => (
                StatusCode::OK,
                Extension(ServedBy::Liveness),
                self.running_message.to_string(),
            )
                .into_response(),
        }
    }
}

async fn serve_file(path: PathBuf, req: Request, served_by: ServedBy) -> Response {
    let mut response = match ServeFile::new(&path).oneshot(req).await {
        Ok(response) => response.map(Body::new),
        Err(never) => match never {},
    };
    response.extensions_mut().insert(served_by);
    response
}
