use crate::configuration::{ConnectTarget, DatabaseSettings};
use crate::domain::{NewContact, NewUser};
use chrono::{DateTime, Utc};
use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{PgPool, SqlitePool};

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("a unique constraint was violated")]
    UniqueViolation(#[source] sqlx::Error),
    #[error(transparent)]
    Other(#[from] sqlx::Error),
}

// Unique violation codes: 23505 (Postgres), 2067/1555 (SQLite).
fn classify(e: sqlx::Error) -> StorageError {
    let is_unique = matches!(
        &e,
        sqlx::Error::Database(db)
            if matches!(db.code().as_deref(), Some("23505") | Some("2067") | Some("1555"))
    );
    if is_unique {
        StorageError::UniqueViolation(e)
    } else {
        StorageError::Other(e)
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct UserRecord {
    pub id: i64,
    pub name: String,
    pub email: String,
}

#[derive(Debug, sqlx::FromRow)]
pub struct ContactRecord {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Option<String>,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Handle to the relational store backing the service.
///
/// Each request checks a connection out of the pool for the duration of a
/// single query; nothing is shared across requests beyond the pool itself.
#[derive(Clone)]
pub enum Database {
    Postgres(PgPool),
    Sqlite(SqlitePool),
}

impl Database {
    /// Builds a lazy pool for the target resolved from the settings. The
    /// first query establishes the actual connection (and creates the
    /// SQLite file if needed).
    pub fn connect(settings: &DatabaseSettings) -> Result<Self, sqlx::Error> {
        match settings.connect_target() {
            ConnectTarget::Postgres(url) => {
                let pool = PgPoolOptions::new()
                    .acquire_timeout(settings.pool_timeout())
                    .connect_lazy(url.expose_secret())?;
                Ok(Database::Postgres(pool))
            }
            ConnectTarget::SqliteFile(path) => {
                let options = SqliteConnectOptions::new()
                    .filename(&path)
                    .create_if_missing(true);
                let pool = SqlitePoolOptions::new()
                    .acquire_timeout(settings.pool_timeout())
                    .connect_lazy_with(options);
                Ok(Database::Sqlite(pool))
            }
        }
    }

    /// Name of the connected storage backend, for the health endpoint.
    pub fn backend(&self) -> &'static str {
        match self {
            Database::Postgres(_) => "postgres",
            Database::Sqlite(_) => "sqlite",
        }
    }

    /// Creates the two tables if they do not exist yet. Schema migration
    /// tooling is out of scope; this is the entire bootstrap.
    pub async fn ensure_schema(&self) -> Result<(), sqlx::Error> {
        match self {
            Database::Postgres(pool) => {
                sqlx::query(
                    r#"
                    CREATE TABLE IF NOT EXISTS users (
                        id BIGSERIAL PRIMARY KEY,
                        name TEXT NOT NULL,
                        email TEXT NOT NULL UNIQUE
                    )"#,
                )
                .execute(pool)
                .await?;
                sqlx::query(
                    r#"
                    CREATE TABLE IF NOT EXISTS contact_submissions (
                        id BIGSERIAL PRIMARY KEY,
                        name TEXT NOT NULL,
                        email TEXT NOT NULL,
                        role TEXT,
                        message TEXT,
                        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
                    )"#,
                )
                .execute(pool)
                .await?;
            }
            Database::Sqlite(pool) => {
                sqlx::query(
                    r#"
                    CREATE TABLE IF NOT EXISTS users (
                        id INTEGER PRIMARY KEY AUTOINCREMENT,
                        name TEXT NOT NULL,
                        email TEXT NOT NULL UNIQUE
                    )"#,
                )
                .execute(pool)
                .await?;
                sqlx::query(
                    r#"
                    CREATE TABLE IF NOT EXISTS contact_submissions (
                        id INTEGER PRIMARY KEY AUTOINCREMENT,
                        name TEXT NOT NULL,
                        email TEXT NOT NULL,
                        role TEXT,
                        message TEXT,
                        created_at TEXT NOT NULL
                            DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
                    )"#,
                )
                .execute(pool)
                .await?;
            }
        }
        Ok(())
    }

    #[tracing::instrument(name = "Saving a new user in the database", skip(self, user))]
    pub async fn insert_user(&self, user: &NewUser) -> Result<UserRecord, StorageError> {
        let record = match self {
            Database::Postgres(pool) => {
                sqlx::query_as::<_, UserRecord>(
                    "INSERT INTO users (name, email) VALUES ($1, $2) \
                     RETURNING id, name, email",
                )
                .bind(user.name.as_ref())
                .bind(user.email.as_str())
                .fetch_one(pool)
                .await
            }
            Database::Sqlite(pool) => {
                sqlx::query_as::<_, UserRecord>(
                    "INSERT INTO users (name, email) VALUES (?1, ?2) \
                     RETURNING id, name, email",
                )
                .bind(user.name.as_ref())
                .bind(user.email.as_str())
                .fetch_one(pool)
                .await
            }
        };
        record.map_err(classify)
    }

    #[tracing::instrument(name = "Looking up a user by email", skip(self))]
    pub async fn find_user_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserRecord>, StorageError> {
        let record = match self {
            Database::Postgres(pool) => {
                sqlx::query_as::<_, UserRecord>(
                    "SELECT id, name, email FROM users WHERE email = $1",
                )
                .bind(email)
                .fetch_optional(pool)
                .await
            }
            Database::Sqlite(pool) => {
                sqlx::query_as::<_, UserRecord>(
                    "SELECT id, name, email FROM users WHERE email = ?1",
                )
                .bind(email)
                .fetch_optional(pool)
                .await
            }
        };
        record.map_err(StorageError::from)
    }

    #[tracing::instrument(name = "Fetching all users", skip(self))]
    pub async fn list_users(&self) -> Result<Vec<UserRecord>, StorageError> {
        let records = match self {
            Database::Postgres(pool) => {
                sqlx::query_as::<_, UserRecord>("SELECT id, name, email FROM users")
                    .fetch_all(pool)
                    .await
            }
            Database::Sqlite(pool) => {
                sqlx::query_as::<_, UserRecord>("SELECT id, name, email FROM users")
                    .fetch_all(pool)
                    .await
            }
        };
        records.map_err(StorageError::from)
    }

    #[tracing::instrument(name = "Saving a contact submission", skip(self, contact))]
    pub async fn insert_contact(
        &self,
        contact: &NewContact,
    ) -> Result<ContactRecord, StorageError> {
        let record = match self {
            Database::Postgres(pool) => {
                sqlx::query_as::<_, ContactRecord>(
                    "INSERT INTO contact_submissions (name, email, role, message) \
                     VALUES ($1, $2, $3, $4) \
                     RETURNING id, name, email, role, message, created_at",
                )
                .bind(contact.name.as_ref())
                .bind(contact.email.as_ref())
                .bind(contact.role.as_deref())
                .bind(contact.message.as_deref())
                .fetch_one(pool)
                .await
            }
            Database::Sqlite(pool) => {
                sqlx::query_as::<_, ContactRecord>(
                    "INSERT INTO contact_submissions (name, email, role, message) \
                     VALUES (?1, ?2, ?3, ?4) \
                     RETURNING id, name, email, role, message, created_at",
                )
                .bind(contact.name.as_ref())
                .bind(contact.email.as_ref())
                .bind(contact.role.as_deref())
                .bind(contact.message.as_deref())
                .fetch_one(pool)
                .await
            }
        };
        record.map_err(classify)
    }

    pub async fn count_users(&self) -> Result<i64, StorageError> {
        let count = match self {
            Database::Postgres(pool) => {
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
                    .fetch_one(pool)
                    .await
            }
            Database::Sqlite(pool) => {
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
                    .fetch_one(pool)
                    .await
            }
        };
        count.map_err(StorageError::from)
    }

    pub async fn count_contacts(&self) -> Result<i64, StorageError> {
        let count = match self {
            Database::Postgres(pool) => {
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM contact_submissions")
                    .fetch_one(pool)
                    .await
            }
            Database::Sqlite(pool) => {
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM contact_submissions")
                    .fetch_one(pool)
                    .await
            }
        };
        count.map_err(StorageError::from)
    }
}
