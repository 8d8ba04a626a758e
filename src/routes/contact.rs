use crate::domain::{EmailAddress, NewContact, PersonName};
use crate::email_client::{EmailClient, EmailError};
use crate::routes::error_chain_fmt;
use crate::storage::{ContactRecord, Database};
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use chrono::{DateTime, Utc};
use std::fmt::Formatter;

#[derive(serde::Deserialize)]
pub struct ContactBody {
    pub name: String,
    pub email: String,
    pub role: Option<String>,
    pub message: Option<String>,
}

impl TryFrom<ContactBody> for NewContact {
    type Error = String;
    fn try_from(body: ContactBody) -> Result<Self, Self::Error> {
        let name = PersonName::parse(body.name)?;
        let email = EmailAddress::parse(body.email)?;
        Ok(NewContact {
            name,
            email,
            role: body.role,
            message: body.message,
        })
    }
}

#[derive(serde::Serialize)]
pub struct ContactResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Option<String>,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<ContactRecord> for ContactResponse {
    fn from(record: ContactRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            email: record.email,
            role: record.role,
            message: record.message,
            created_at: record.created_at,
        }
    }
}

#[derive(thiserror::Error)]
pub enum ContactError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Notification(#[from] EmailError),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl std::fmt::Debug for ContactError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for ContactError {
    fn status_code(&self) -> StatusCode {
        match self {
            ContactError::Validation(_) => StatusCode::BAD_REQUEST,
            ContactError::Notification(EmailError::Configuration(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ContactError::Notification(EmailError::Delivery(_)) => StatusCode::BAD_GATEWAY,
            ContactError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .json(serde_json::json!({ "error": self.to_string() }))
    }
}

#[tracing::instrument(
    name = "Handling a contact submission",
    skip(body, database, email_client),
    fields(contact_email = %body.email)
)]
pub async fn submit_contact(
    body: web::Json<ContactBody>,
    database: web::Data<Database>,
    email_client: web::Data<EmailClient>,
) -> Result<HttpResponse, ContactError> {
    let new_contact: NewContact = body
        .into_inner()
        .try_into()
        .map_err(ContactError::Validation)?;

    // The row is durable before the notification attempt; a failed email
    // leaves the submission in place and there is no retry.
    let record = database.insert_contact(&new_contact).await.map_err(|e| {
        ContactError::Unexpected(
            anyhow::Error::from(e).context("Failed to store the contact submission"),
        )
    })?;

    email_client
        .send_contact_notification(
            new_contact.name.as_ref(),
            &new_contact.email,
            new_contact.message.as_deref(),
        )
        .await?;

    Ok(HttpResponse::Created().json(ContactResponse::from(record)))
}
