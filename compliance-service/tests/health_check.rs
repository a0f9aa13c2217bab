mod common;

use common::TestApp;

#[tokio::test]
async fn health_check_works() {
    let app = TestApp::spawn().await;

    let response = app.get("/health").await;

    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "FinovaBank Compliance Service");
}

#[tokio::test]
async fn frontend_paths_report_liveness_without_a_bundle() {
    let app = TestApp::spawn().await;

    for path in ["/", "/dashboard", "/nonexistent.js"] {
        let response = app.get(path).await;
        assert_eq!(response.status().as_u16(), 200, "{path}");
        assert_eq!(response.text().await.unwrap(), "Compliance Service is running");
    }
}

#[tokio::test]
async fn bundled_frontend_is_served() {
    let app = TestApp::spawn_with(|dir| {
        let root = dir.path().join("static");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(root.join("index.html"), "<html>finova</html>").unwrap();
        std::fs::write(root.join("app.js"), "boot();").unwrap();
    })
    .await;

    assert_eq!(app.get("/app.js").await.text().await.unwrap(), "boot();");
    assert_eq!(
        app.get("/reports/quarterly").await.text().await.unwrap(),
        "<html>finova</html>"
    );
}
