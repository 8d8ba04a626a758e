use crate::helpers::spawn_app;

#[tokio::test]
async fn health_check_reports_the_storage_backend() {
    let app = spawn_app().await;

    let response = app.get_health().await;

    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "sqlite");
}
