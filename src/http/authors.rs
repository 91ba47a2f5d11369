use crate::http::AppState;
use crate::http::handler::{ApiError, ApiSuccess, NAME_REQUIRED, NameForm, parse_id};
use crate::models::{
    Author, AuthorName, CreateAuthorError, CreateAuthorRequest, DeleteAuthorError,
    DeleteAuthorRequest, FindAllAuthorsError, FindAuthorError, FindAuthorRequest,
    UpdateAuthorError, UpdateAuthorRequest,
};
use crate::repositories::{AuthorRepository, PublisherRepository};
use axum::Form;
use axum::extract::rejection::FormRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Html;
use serde::Serialize;

const AUTHOR_NOT_FOUND: &str = "Autor não encontrado";
const AUTHOR_HAS_BOOKS: &str = "autor possui livros associados";

impl From<CreateAuthorError> for ApiError {
    fn from(err: CreateAuthorError) -> Self {
        match err {
            CreateAuthorError::Duplicate { name } => Self::Conflict(duplicate_message(&name)),
            CreateAuthorError::Other(cause) => {
                tracing::error!(error = ?cause, "unexpected error creating author");
                Self::InternalServerError("Erro interno ao criar autor".to_owned())
            }
        }
    }
}

impl From<UpdateAuthorError> for ApiError {
    fn from(err: UpdateAuthorError) -> Self {
        match err {
            UpdateAuthorError::NameEmpty => Self::BadRequest(NAME_REQUIRED.to_owned()),
            UpdateAuthorError::NotFound { .. } => Self::NotFound(AUTHOR_NOT_FOUND.to_owned()),
            UpdateAuthorError::Duplicate { name } => Self::Conflict(duplicate_message(&name)),
            UpdateAuthorError::Other(cause) => {
                tracing::error!(error = ?cause, "unexpected error updating author");
                Self::InternalServerError("Erro ao atualizar autor".to_owned())
            }
        }
    }
}

impl From<FindAuthorError> for ApiError {
    fn from(err: FindAuthorError) -> Self {
        match err {
            FindAuthorError::NotFound { .. } => Self::NotFound(AUTHOR_NOT_FOUND.to_owned()),
            FindAuthorError::Other(cause) => {
                tracing::error!(error = ?cause, "unexpected error fetching author");
                Self::InternalServerError("Erro ao buscar autor".to_owned())
            }
        }
    }
}

impl From<FindAllAuthorsError> for ApiError {
    fn from(err: FindAllAuthorsError) -> Self {
        tracing::error!(error = ?err.0, "unexpected error listing authors");
        Self::InternalServerError("Erro interno ao listar autores".to_owned())
    }
}

impl From<DeleteAuthorError> for ApiError {
    fn from(err: DeleteAuthorError) -> Self {
        match err {
            DeleteAuthorError::NotFound { .. } => Self::NotFound(AUTHOR_NOT_FOUND.to_owned()),
            DeleteAuthorError::HasBooks { .. } => {
                Self::UnprocessableEntity(AUTHOR_HAS_BOOKS.to_owned())
            }
            DeleteAuthorError::Other(cause) => {
                tracing::error!(error = ?cause, "unexpected error removing author");
                Self::InternalServerError("Erro interno ao remover autor".to_owned())
            }
        }
    }
}

fn duplicate_message(name: &str) -> String {
    format!("Erro: O autor '{name}' já está cadastrado.")
}

#[derive(Debug, Serialize)]
struct AuthorsPage<'a> {
    authors: &'a [Author],
}

#[derive(Debug, Serialize)]
struct AuthorPage<'a> {
    author: &'a Author,
}

pub async fn list_authors<AR: AuthorRepository, PR: PublisherRepository>(
    State(state): State<AppState<AR, PR>>,
) -> Result<Html<String>, ApiError> {
    let authors = state.author_repo.find_all_authors().await?;
    let page = state.renderer.render(
        "authors/index.html",
        &AuthorsPage { authors: &authors },
    )?;
    Ok(Html(page))
}

pub async fn new_author<AR: AuthorRepository, PR: PublisherRepository>(
    State(state): State<AppState<AR, PR>>,
) -> Result<Html<String>, ApiError> {
    let page = state
        .renderer
        .render("authors/new.html", &serde_json::Value::Null)?;
    Ok(Html(page))
}

pub async fn edit_author<AR: AuthorRepository, PR: PublisherRepository>(
    State(state): State<AppState<AR, PR>>,
    Path(id): Path<String>,
) -> Result<Html<String>, ApiError> {
    let id = parse_id(&id)?;
    let author = state
        .author_repo
        .find_author(&FindAuthorRequest::new(id))
        .await?;
    let page = state
        .renderer
        .render("authors/edit.html", &AuthorPage { author: &author })?;
    Ok(Html(page))
}

/// Inserts without checking for an existing author first: the unique
/// constraint is the only reliable duplicate signal under concurrent requests.
pub async fn create_author<AR: AuthorRepository, PR: PublisherRepository>(
    State(state): State<AppState<AR, PR>>,
    form: Result<Form<NameForm>, FormRejection>,
) -> Result<ApiSuccess, ApiError> {
    let Form(form) = form?;
    let req = CreateAuthorRequest::new(AuthorName::new(&form.name)?);

    let author = state.author_repo.create_author(&req).await?;
    tracing::info!(id = author.id(), "author created");

    Ok(ApiSuccess::new(
        StatusCode::CREATED,
        format!("Autor criado com sucesso: {}", author.name()),
    ))
}

pub async fn update_author<AR: AuthorRepository, PR: PublisherRepository>(
    State(state): State<AppState<AR, PR>>,
    Path(id): Path<String>,
    form: Result<Form<NameForm>, FormRejection>,
) -> Result<ApiSuccess, ApiError> {
    let Form(form) = form?;
    let name = form.required_name()?;
    let id = parse_id(&id)?;
    let req = UpdateAuthorRequest::parse(id, name)?;

    state.author_repo.update_author(&req).await?;

    Ok(ApiSuccess::new(StatusCode::OK, "Autor atualizado com sucesso"))
}

pub async fn remove_author<AR: AuthorRepository, PR: PublisherRepository>(
    State(state): State<AppState<AR, PR>>,
    Path(id): Path<String>,
) -> Result<ApiSuccess, ApiError> {
    let id = parse_id(&id)?;

    state
        .author_repo
        .delete_author(&DeleteAuthorRequest::new(id))
        .await?;

    Ok(ApiSuccess::new(StatusCode::OK, "Autor removido com sucesso \n"))
}
