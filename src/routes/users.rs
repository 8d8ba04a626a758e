use crate::domain::{NewUser, PersonName};
use crate::routes::error_chain_fmt;
use crate::storage::{Database, StorageError, UserRecord};
use crate::utils::e500;
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use anyhow::Context;
use std::fmt::Formatter;

#[derive(serde::Deserialize)]
pub struct UserBody {
    pub name: String,
    pub email: String,
}

impl TryFrom<UserBody> for NewUser {
    type Error = String;
    fn try_from(body: UserBody) -> Result<Self, Self::Error> {
        let name = PersonName::parse(body.name)?;
        Ok(NewUser {
            name,
            email: body.email,
        })
    }
}

#[derive(serde::Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl From<UserRecord> for UserResponse {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            email: record.email,
        }
    }
}

#[derive(thiserror::Error)]
pub enum CreateUserError {
    #[error("{0}")]
    Validation(String),
    #[error("Email already registered")]
    DuplicateEmail,
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl std::fmt::Debug for CreateUserError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for CreateUserError {
    fn status_code(&self) -> StatusCode {
        match self {
            CreateUserError::Validation(_) | CreateUserError::DuplicateEmail => {
                StatusCode::BAD_REQUEST
            }
            CreateUserError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .json(serde_json::json!({ "error": self.to_string() }))
    }
}

#[tracing::instrument(
    name = "Registering a new user",
    skip(body, database),
    fields(user_email = %body.email)
)]
pub async fn create_user(
    body: web::Json<UserBody>,
    database: web::Data<Database>,
) -> Result<HttpResponse, CreateUserError> {
    let new_user: NewUser = body
        .into_inner()
        .try_into()
        .map_err(CreateUserError::Validation)?;

    if database
        .find_user_by_email(&new_user.email)
        .await
        .context("Failed to check for an existing user")?
        .is_some()
    {
        return Err(CreateUserError::DuplicateEmail);
    }

    // The unique constraint is the authoritative guard; the pre-check above
    // only buys a friendlier message when no race is in flight.
    let record = match database.insert_user(&new_user).await {
        Ok(record) => record,
        Err(StorageError::UniqueViolation(_)) => return Err(CreateUserError::DuplicateEmail),
        Err(e) => {
            return Err(CreateUserError::Unexpected(
                anyhow::Error::from(e).context("Failed to insert the new user"),
            ))
        }
    };

    Ok(HttpResponse::Ok().json(UserResponse::from(record)))
}

#[tracing::instrument(name = "Listing users", skip(database))]
pub async fn list_users(database: web::Data<Database>) -> actix_web::Result<HttpResponse> {
    let users = database.list_users().await.map_err(e500)?;
    let body: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}
