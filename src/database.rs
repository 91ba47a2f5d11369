use crate::models::{
    Author, AuthorName, CreateAuthorError, CreateAuthorRequest, CreatePublisherError,
    CreatePublisherRequest, DeleteAuthorError, DeleteAuthorRequest, FindAllAuthorsError,
    FindAuthorError, FindAuthorRequest, Publisher, PublisherName, UpdateAuthorError,
    UpdateAuthorRequest,
};
use crate::repositories::{AuthorRepository, PublisherRepository};
use anyhow::{Context, anyhow};
use async_trait::async_trait;
use sqlx::error::ErrorKind;
use sqlx::migrate::Migrator;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgRow};
use sqlx::{FromRow, PgPool, Row};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);


pub async fn establish_pool(url: &str) -> anyhow::Result<PgPool> {
    let opts = PgConnectOptions::from_str(url).context("Invalid database url")?;
    let pool = tokio::time::timeout(
        CONNECT_TIMEOUT,
        PgPoolOptions::new()
            .acquire_timeout(CONNECT_TIMEOUT)
            .connect_with(opts),
    )
    .await
    .context("Timed out connecting to the database")?
    .context("Failed to connect to the database")?;

    sqlx::query("SELECT 1")
        .execute(&pool)
        .await
        .context("Failed to ping the database")?;

    tracing::info!("connected to the database");
    Ok(pool)
}

pub async fn run_migrations(pool: &PgPool, path: &str) -> anyhow::Result<()> {
    let migrator = Migrator::new(PathBuf::from(path))
        .await
        .with_context(|| format!("Failed to load migrations from {path}"))?;
    migrator
        .run(pool)
        .await
        .context("Failed to apply migrations")?;

    tracing::info!(path, "database migrations applied");
    Ok(())
}

/// The PostgreSQL constraint failures the repositories translate into domain errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintViolation {
    Unique,
    ForeignKey,
}

impl ConstraintViolation {
    pub fn from_kind(kind: ErrorKind) -> Option<Self> {
        match kind {
            ErrorKind::UniqueViolation => Some(Self::Unique),
            ErrorKind::ForeignKeyViolation => Some(Self::ForeignKey),
            _ => None,
        }
    }

    pub fn of(err: &sqlx::Error) -> Option<Self> {
        let sqlx::Error::Database(db_err) = err else {
            return None;
        };
        Self::from_kind(db_err.kind())
    }
}

#[derive(Debug, Clone)]
pub struct PostgresAuthorRepository {
    pool: PgPool,
}

impl PostgresAuthorRepository {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl<'r> FromRow<'r, PgRow> for Author {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let id = row.try_get("id")?;
        let name: &str = row.try_get("name")?;

        Ok(Self::new(id, AuthorName::new_unchecked(name)))
    }
}

impl<'r> FromRow<'r, PgRow> for Publisher {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let id = row.try_get("id")?;
        let name: &str = row.try_get("name")?;

        Ok(Self::new(id, PublisherName::new_unchecked(name)))
    }
}

#[async_trait]
impl AuthorRepository for PostgresAuthorRepository {
    async fn create_author(&self, req: &CreateAuthorRequest) -> Result<Author, CreateAuthorError> {
        let author = sqlx::query_as("INSERT INTO authors (name) VALUES ($1) RETURNING id, name")
            .bind(req.name().to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(|err| {
                if ConstraintViolation::of(&err) == Some(ConstraintViolation::Unique) {
                    CreateAuthorError::Duplicate {
                        name: req.name().to_string(),
                    }
                } else {
                    let err = anyhow!(err).context(format!(
                        r#"Failed to create author with name "{}""#,
                        req.name()
                    ));
                    CreateAuthorError::Other(err)
                }
            })?;

        Ok(author)
    }

    async fn find_author(&self, req: &FindAuthorRequest) -> Result<Author, FindAuthorError> {
        let author = sqlx::query_as("SELECT id, name FROM authors WHERE id = $1")
            .bind(req.id())
            .fetch_one(&self.pool)
            .await
            .map_err(|err| {
                if matches!(err, sqlx::Error::RowNotFound) {
                    FindAuthorError::NotFound { id: req.id() }
                } else {
                    let err = anyhow!(err).context(format!(
                        r#"Failed to retrieve author with id "{}""#,
                        req.id()
                    ));
                    FindAuthorError::Other(err)
                }
            })?;

        Ok(author)
    }

    async fn find_all_authors(&self) -> Result<Vec<Author>, FindAllAuthorsError> {
        let authors = sqlx::query_as("SELECT id, name FROM authors ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|err| {
                let err = anyhow!(err).context("Failed to retrieve all authors");
                FindAllAuthorsError(err)
            })?;

        Ok(authors)
    }

    async fn update_author(&self, req: &UpdateAuthorRequest) -> Result<(), UpdateAuthorError> {
        let result = sqlx::query("UPDATE authors SET name = $1 WHERE id = $2")
            .bind(req.name().to_string())
            .bind(req.id())
            .execute(&self.pool)
            .await
            .map_err(|err| {
                if ConstraintViolation::of(&err) == Some(ConstraintViolation::Unique) {
                    UpdateAuthorError::Duplicate {
                        name: req.name().to_string(),
                    }
                } else {
                    let err = anyhow!(err)
                        .context(format!(r#"Failed to update author with id "{}""#, req.id()));
                    UpdateAuthorError::Other(err)
                }
            })?;

        if result.rows_affected() == 0 {
            return Err(UpdateAuthorError::NotFound { id: req.id() });
        }

        Ok(())
    }

    async fn delete_author(&self, req: &DeleteAuthorRequest) -> Result<(), DeleteAuthorError> {
        let result = sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(req.id())
            .execute(&self.pool)
            .await
            .map_err(|err| {
                if ConstraintViolation::of(&err) == Some(ConstraintViolation::ForeignKey) {
                    DeleteAuthorError::HasBooks { id: req.id() }
                } else {
                    let err = anyhow!(err)
                        .context(format!(r#"Failed to delete author with id "{}""#, req.id()));
                    DeleteAuthorError::Other(err)
                }
            })?;

        if result.rows_affected() == 0 {
            return Err(DeleteAuthorError::NotFound { id: req.id() });
        }

        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct PostgresPublisherRepository {
    pool: PgPool,
}

impl PostgresPublisherRepository {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PublisherRepository for PostgresPublisherRepository {
    async fn create_publisher(
        &self,
        req: &CreatePublisherRequest,
    ) -> Result<Publisher, CreatePublisherError> {
        let publisher =
            sqlx::query_as("INSERT INTO publishers (name) VALUES ($1) RETURNING id, name")
                .bind(req.name().to_string())
                .fetch_one(&self.pool)
                .await
                .map_err(|err| {
                    if ConstraintViolation::of(&err) == Some(ConstraintViolation::Unique) {
                        CreatePublisherError::Duplicate {
                            name: req.name().to_string(),
                        }
                    } else {
                        let err = anyhow!(err).context(format!(
                            r#"Failed to create publisher with name "{}""#,
                            req.name()
                        ));
                        CreatePublisherError::Other(err)
                    }
                })?;

        Ok(publisher)
    }
}
