use crate::models::{AuthorNameEmptyError, PublisherNameEmptyError};
use crate::render::RenderError;
use axum::extract::rejection::FormRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

pub const NAME_REQUIRED: &str = r#"O campo "name" é obrigatório"#;
pub const INVALID_FORM: &str = "Erro ao processar o formulário";
pub const INVALID_ID: &str = "ID inválido";
pub const RENDER_FAILED: &str = "Erro interno ao renderizar página";

/// A plain-text confirmation with its status code.
#[derive(Debug)]
pub struct ApiSuccess(StatusCode, String);

impl ApiSuccess {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self(status, message.into())
    }
}

impl IntoResponse for ApiSuccess {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

/// Failures reported to the client as plain text. Internal details never reach the body.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    UnprocessableEntity(String),
    InternalServerError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::Conflict(msg) => (StatusCode::CONFLICT, msg),
            Self::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            Self::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, msg).into_response()
    }
}

impl From<FormRejection> for ApiError {
    fn from(rejection: FormRejection) -> Self {
        tracing::debug!(%rejection, "rejected form body");
        Self::BadRequest(INVALID_FORM.to_owned())
    }
}

impl From<AuthorNameEmptyError> for ApiError {
    fn from(_: AuthorNameEmptyError) -> Self {
        Self::BadRequest(NAME_REQUIRED.to_owned())
    }
}

impl From<PublisherNameEmptyError> for ApiError {
    fn from(_: PublisherNameEmptyError) -> Self {
        Self::BadRequest(NAME_REQUIRED.to_owned())
    }
}

impl From<RenderError> for ApiError {
    fn from(err: RenderError) -> Self {
        tracing::error!(error = ?err, "failed to render view");
        Self::InternalServerError(RENDER_FAILED.to_owned())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct NameForm {
    #[serde(default)]
    pub name: String,
}

impl NameForm {
    /// The submitted name, or a 400 when it is blank.
    pub fn required_name(&self) -> Result<&str, ApiError> {
        if self.name.trim().is_empty() {
            Err(ApiError::BadRequest(NAME_REQUIRED.to_owned()))
        } else {
            Ok(&self.name)
        }
    }
}

pub fn parse_id(raw: &str) -> Result<i32, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(INVALID_ID.to_owned()))
}

/// Answers writes aimed at `/authors/new`, which shadows the `{id}` route.
pub async fn invalid_id() -> ApiError {
    ApiError::BadRequest(INVALID_ID.to_owned())
}

pub async fn health() -> &'static str {
    "OK"
}
