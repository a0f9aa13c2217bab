#![allow(dead_code)]

use compliance_service::service_config;
use service_core::config::{CorsSettings, DatabaseSettings, Environment, Settings};
use service_core::startup::Application;
use tempfile::TempDir;

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub dir: TempDir,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(|_| {}).await
    }

    /// Spawns with a temporary store and asset root; `prepare` may populate
    /// the directory before the host starts.
    pub async fn spawn_with(prepare: impl FnOnce(&TempDir)) -> Self {
        let dir = TempDir::new().unwrap();
        prepare(&dir);

        let settings = Settings {
            environment: Environment::Dev,
            host: "127.0.0.1".to_string(),
            port: 0,
            log_level: "info".to_string(),
            otlp_endpoint: None,
            asset_root: dir.path().join("static"),
            database: DatabaseSettings {
                path: dir.path().join("database").join("app.db"),
                max_connections: 2,
            },
            cors: CorsSettings {
                allowed_origins: vec!["*".to_string()],
            },
            secret_key: None,
        };

        let config = service_config(settings)
            .build()
            .expect("Failed to build test configuration");
        let app = Application::build(config)
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

    pub async fn get(&self, path: &str) -> reqwest::Response {
        reqwest::Client::new()
            .get(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub fn database_path(&self) -> std::path::PathBuf {
        self.dir.path().join("database").join("app.db")
    }
}
