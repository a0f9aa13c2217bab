#![allow(dead_code)]

use axum::{Router, body::Body, http::Request, response::Response, routing::get};
use secrecy::ExposeSecret;
use service_core::config::{
    CorsSettings, DatabaseSettings, Environment, ServiceConfig, Settings,
};
use service_core::routing::{GroupContext, RouteGroup, domain_routes};
use service_core::startup::{Application, build_router};
use sqlx::migrate::Migrator;
use std::path::Path;
use tempfile::TempDir;
use tower::ServiceExt;

pub static MIGRATOR: Migrator = sqlx::migrate!("./tests/migrations");

pub const SERVICE_NAME: &str = "Test Service";
pub const INDEX_HTML: &str = "<!doctype html><html><body>spa</body></html>";
pub const APP_JS: &str = "console.log('bundle');";

/// Fixture group: the baseline catalog endpoints plus a `/score` route that
/// echoes what the group was handed.
pub struct FixtureGroup {
    pub name: &'static str,
}

impl RouteGroup for FixtureGroup {
    fn name(&self) -> &str {
        self.name
    }

    fn routes(&self, ctx: &GroupContext) -> Router {
        let name = self.name;
        let secret_len = ctx.secret_key.expose_secret().len();
        domain_routes(name, "fixture group", ctx).route(
            "/score",
            get(move |uri: axum::http::Uri| async move {
                format!("{}:{}:{}", name, uri, secret_len)
            }),
        )
    }
}

pub fn settings(dir: &Path) -> Settings {
    Settings {
        environment: Environment::Dev,
        host: "127.0.0.1".to_string(),
        port: 0,
        log_level: "info".to_string(),
        otlp_endpoint: None,
        asset_root: dir.join("static"),
        database: DatabaseSettings {
            path: dir.join("database").join("app.db"),
            max_connections: 2,
        },
        cors: CorsSettings {
            allowed_origins: vec!["*".to_string()],
        },
        secret_key: None,
    }
}

/// Writes a small frontend bundle under `<dir>/static`.
pub fn write_bundle(dir: &Path, with_index: bool) {
    let root = dir.join("static");
    std::fs::create_dir_all(root.join("assets")).unwrap();
    std::fs::write(root.join("app.js"), APP_JS).unwrap();
    std::fs::write(root.join("assets").join("logo.svg"), "<svg/>").unwrap();
    if with_index {
        std::fs::write(root.join("index.html"), INDEX_HTML).unwrap();
    }
}

pub fn config(settings: Settings) -> ServiceConfig {
    ServiceConfig::builder(SERVICE_NAME, settings, &MIGRATOR)
        .group("/api/test/fraud", FixtureGroup { name: "fraud" })
        .group("/api/test/risk", FixtureGroup { name: "risk" })
        .group(
            "/api/test/recommendations",
            FixtureGroup {
                name: "recommendations",
            },
        )
        .build()
        .expect("Failed to build test configuration")
}

/// Router-level harness driven with `oneshot`, no socket involved.
pub struct TestRouter {
    pub router: Router,
    pub dir: TempDir,
}

impl TestRouter {
    pub async fn new(bundle: Option<bool>) -> Self {
        let dir = TempDir::new().unwrap();
        if let Some(with_index) = bundle {
            write_bundle(dir.path(), with_index);
        }

        let router = build_router(config(settings(dir.path())))
            .await
            .expect("Failed to build router");

        Self { router, dir }
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }
}

pub async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// A host bound to a random port and serving in the background.
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub dir: TempDir,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let dir = TempDir::new().unwrap();
        write_bundle(dir.path(), true);

        let app = Application::build(config(settings(dir.path())))
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to be ready by polling the health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp { address, port, dir }
    }
}
