//! API route groups and prefix dispatch.
//!
//! # Responsibilities
//! - Validate group prefixes at registration time
//! - Dispatch a request to the group owning the longest matching prefix
//! - Hand back unmatched requests so the frontend can serve them
//!
//! # Design Decisions
//! - Immutable after startup (shared without locks)
//! - O(n) scan over groups sorted longest-prefix first
//! - Overlapping prefixes are a configuration error, never resolved at dispatch

mod catalog;
mod prefix;

pub use catalog::domain_routes;
pub use prefix::{RoutePrefix, decode_path};

use crate::error::AppError;
use crate::store::Store;
use axum::{
    Router,
    extract::Request,
    http::{Uri, uri::PathAndQuery},
    response::{IntoResponse, Response},
};
use secrecy::Secret;
use std::sync::Arc;
use thiserror::Error;
use tower::ServiceExt;

/// Paths the host answers itself; no group may be mounted over them.
pub const RESERVED_PATHS: &[&str] = &["/health", "/metrics"];

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("invalid route prefix '{prefix}': {reason}")]
    InvalidPrefix { prefix: String, reason: &'static str },

    #[error(
        "route prefix '{prefix}' of group '{group}' overlaps '{existing}' of group '{existing_group}'"
    )]
    Conflict {
        prefix: String,
        group: String,
        existing: String,
        existing_group: String,
    },

    #[error("route prefix '{prefix}' overlaps a reserved host route")]
    Reserved { prefix: String },
}

/// Handles a route group may use when building its endpoints.
#[derive(Clone)]
pub struct GroupContext {
    pub service_name: Arc<str>,
    pub store: Store,
    pub secret_key: Secret<String>,
}

/// A named set of domain endpoints mounted under one prefix.
///
/// Groups build their own axum [`Router`]; paths inside it are relative to
/// the prefix, so a group serving `/score` under `/api/ai/fraud` answers
/// `/api/ai/fraud/score`.
pub trait RouteGroup: Send + Sync {
    fn name(&self) -> &str;

    fn routes(&self, ctx: &GroupContext) -> Router;

    fn mount(
        &self,
        api: &mut ApiRouter,
        prefix: &str,
        ctx: &GroupContext,
    ) -> Result<(), RouteError> {
        api.register(prefix, self.name(), self.routes(ctx))
    }
}

/// Which part of the host produced a response. Stored in response
/// extensions for metrics and header policy; never sent to clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServedBy {
    Health,
    Metrics,
    Group(Arc<str>),
    Asset,
    Index,
    Liveness,
}

impl ServedBy {
    pub fn label(&self) -> String {
        match self {
            ServedBy::Health => "health".to_string(),
            ServedBy::Metrics => "metrics".to_string(),
            ServedBy::Group(name) => format!("group:{}", name),
            ServedBy::Asset => "asset".to_string(),
            ServedBy::Index => "index".to_string(),
            ServedBy::Liveness => "liveness".to_string(),
        }
    }

    pub fn is_frontend(&self) -> bool {
        matches!(self, ServedBy::Asset | ServedBy::Index | ServedBy::Liveness)
    }
}

/// Outcome of [`ApiRouter::route`].
pub enum Dispatch {
    Matched(Response),
    Unmatched(Request),
}

struct MountedGroup {
    prefix: RoutePrefix,
    name: Arc<str>,
    router: Router,
}

#[derive(Default)]
pub struct ApiRouter {
    groups: Vec<MountedGroup>,
}

impl ApiRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, prefix: &str, name: &str, router: Router) -> Result<(), RouteError> {
        let prefix = RoutePrefix::parse(prefix)?;

        if RESERVED_PATHS
            .iter()
            .filter_map(|p| RoutePrefix::parse(p).ok())
            .any(|reserved| reserved.overlaps(&prefix))
        {
            return Err(RouteError::Reserved {
                prefix: prefix.to_string(),
            });
        }

        if let Some(existing) = self.groups.iter().find(|g| g.prefix.overlaps(&prefix)) {
            return Err(RouteError::Conflict {
                prefix: prefix.to_string(),
                group: name.to_string(),
                existing: existing.prefix.to_string(),
                existing_group: existing.name.to_string(),
            });
        }

        tracing::info!(group = %name, prefix = %prefix, "Route group registered");

        self.groups.push(MountedGroup {
            prefix,
            name: Arc::from(name),
            router,
        });
        self.groups
            .sort_by(|a, b| b.prefix.as_str().len().cmp(&a.prefix.as_str().len()));

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Registered `(prefix, group)` pairs, longest prefix first.
    pub fn prefixes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.groups
            .iter()
            .map(|g| (g.prefix.as_str(), g.name.as_ref()))
    }

    /// The group owning `path`, if any.
    pub fn lookup(&self, path: &str) -> Option<&str> {
        let path = decode_path(path);
        self.groups
            .iter()
            .find(|g| g.prefix.matches(&path))
            .map(|g| g.name.as_ref())
    }

    /// Forwards the request to the owning group with its prefix stripped, or
    /// returns it untouched when no prefix matches. Matching runs on the
    /// decoded path and the group receives the decoded remainder.
    pub async fn route(&self, req: Request) -> Dispatch {
        let path = decode_path(req.uri().path());
        let matched = self.groups.iter().find_map(|group| {
            group
                .prefix
                .strip(&path)
                .map(|rest| (group, if rest.is_empty() { "/" } else { rest }.to_string()))
        });

        let Some((group, rest)) = matched else {
            return Dispatch::Unmatched(req);
        };

        let (mut parts, body) = req.into_parts();
        parts.uri = match forwarded_uri(&parts.uri, &rest) {
            Ok(uri) => uri,
            Err(err) => return Dispatch::Matched(err.into_response()),
        };

        tracing::debug!(group = %group.name, path = %parts.uri.path(), "Dispatching to route group");

        let mut response = group
            .router
            .clone()
            .oneshot(Request::from_parts(parts, body))
            .await
            .unwrap_or_else(|never| match never {});
        response
            .extensions_mut()
            .insert(ServedBy::Group(group.name.clone()));

        Dispatch::Matched(response)
    }
}

fn forwarded_uri(original: &Uri, path: &str) -> Result<Uri, AppError> {
    let path_and_query = match original.query() {
        Some(query) => format!("{}?{}", path, query),
        None => path.to_string(),
    };

    let mut parts = original.clone().into_parts();
    parts.path_and_query = Some(
        PathAndQuery::try_from(path_and_query)
            .map_err(|e| AppError::BadRequest(anyhow::anyhow!("Invalid request path: {}", e)))?,
    );

    Uri::from_parts(parts)
        .map_err(|e| AppError::BadRequest(anyhow::anyhow!("Invalid request URI: {}", e)))
}
