use crate::helpers::spawn_app;

#[tokio::test]
async fn info_returns_static_service_metadata() {
    let app = spawn_app().await;

    let response = app
        .api_client
        .get(&format!("{}/info", &app.address))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["name"], "opunnence");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn the_root_falls_back_to_json_without_a_frontend_bundle() {
    let app = spawn_app().await;

    let response = app
        .api_client
        .get(&format!("{}/", &app.address))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["message"].as_str().unwrap().contains("Opunnence"));
}
