use actix_web::HttpResponse;

/// Fallback root response when no frontend bundle has been deployed.
pub async fn home() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Hello from Opunnence API",
    }))
}
