use crate::helpers::spawn_app;
use serde_json::json;

#[tokio::test]
async fn create_user_returns_the_persisted_user() {
    let app = spawn_app().await;

    let response = app
        .post_users(&json!({"name": "Ada", "email": "ada@example.com"}))
        .await;

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["id"].is_i64());
    assert_eq!(body["name"], "Ada");
    assert_eq!(body["email"], "ada@example.com");
}

#[tokio::test]
async fn created_users_show_up_in_the_listing_in_creation_order() {
    let app = spawn_app().await;
    let ada: serde_json::Value = app
        .post_users(&json!({"name": "Ada", "email": "ada@example.com"}))
        .await
        .json()
        .await
        .unwrap();
    let bo: serde_json::Value = app
        .post_users(&json!({"name": "Bo", "email": "bo@example.com"}))
        .await
        .json()
        .await
        .unwrap();

    let response = app.get_users().await;

    assert_eq!(200, response.status().as_u16());
    let listed: Vec<serde_json::Value> = response.json().await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0]["id"], ada["id"]);
    assert_eq!(listed[0]["name"], "Ada");
    assert_eq!(listed[0]["email"], "ada@example.com");
    assert_eq!(listed[1]["id"], bo["id"]);
    assert_eq!(listed[1]["name"], "Bo");
    assert_eq!(listed[1]["email"], "bo@example.com");
}

#[tokio::test]
async fn a_duplicate_email_is_rejected_and_no_second_row_is_created() {
    let app = spawn_app().await;
    let body = json!({"name": "Ada", "email": "ada@example.com"});
    app.post_users(&body).await;

    let response = app.post_users(&body).await;

    assert_eq!(400, response.status().as_u16());
    let error: serde_json::Value = response.json().await.unwrap();
    assert_eq!(error["error"], "Email already registered");
    assert_eq!(app.db.count_users().await.unwrap(), 1);
}

#[tokio::test]
async fn a_body_missing_required_fields_is_rejected() {
    let app = spawn_app().await;

    let test_cases = vec![
        (json!({"name": "Ada"}), "missing the email"),
        (json!({"email": "ada@example.com"}), "missing the name"),
        (json!({}), "missing both"),
    ];

    for (body, description) in test_cases {
        let response = app.post_users(&body).await;
        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not return a 400 when the payload was {}.",
            description
        );
    }
    assert_eq!(app.db.count_users().await.unwrap(), 0);
}

#[tokio::test]
async fn an_invalid_name_is_rejected() {
    let app = spawn_app().await;

    let response = app
        .post_users(&json!({"name": "   ", "email": "ada@example.com"}))
        .await;

    assert_eq!(400, response.status().as_u16());
    assert_eq!(app.db.count_users().await.unwrap(), 0);
}

#[tokio::test]
async fn the_user_response_exposes_only_the_declared_fields() {
    let app = spawn_app().await;

    let body: serde_json::Value = app
        .post_users(&json!({"name": "Ada", "email": "ada@example.com"}))
        .await
        .json()
        .await
        .unwrap();

    let mut keys: Vec<&str> = body.as_object().unwrap().keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["email", "id", "name"]);
}
