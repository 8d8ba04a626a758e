use crate::storage::Database;
use actix_web::{web, HttpResponse};

/// Reports service liveness and which storage backend the pool targets.
pub async fn health_check(database: web::Data<Database>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "database": database.backend(),
    }))
}
