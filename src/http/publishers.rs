use crate::http::AppState;
use crate::http::handler::{ApiError, ApiSuccess, NameForm};
use crate::models::{CreatePublisherError, CreatePublisherRequest, PublisherName};
use crate::repositories::{AuthorRepository, PublisherRepository};
use axum::Form;
use axum::extract::State;
use axum::extract::rejection::FormRejection;
use axum::http::StatusCode;

impl From<CreatePublisherError> for ApiError {
    fn from(err: CreatePublisherError) -> Self {
        match err {
            CreatePublisherError::Duplicate { name } => {
                Self::Conflict(format!("Erro: A editora \"{name}\" já está cadastrada."))
            }
            CreatePublisherError::Other(cause) => {
                tracing::error!(error = ?cause, "unexpected error creating publisher");
                Self::InternalServerError("Erro interno ao criar editora".to_owned())
            }
        }
    }
}

pub async fn create_publisher<AR: AuthorRepository, PR: PublisherRepository>(
    State(state): State<AppState<AR, PR>>,
    form: Result<Form<NameForm>, FormRejection>,
) -> Result<ApiSuccess, ApiError> {
    let Form(form) = form?;
    let req = CreatePublisherRequest::new(PublisherName::new(&form.name)?);

    let publisher = state.publisher_repo.create_publisher(&req).await?;
    tracing::info!(id = publisher.id(), "publisher created");

    Ok(ApiSuccess::new(
        StatusCode::CREATED,
        format!("Editora criada com sucesso: {}", publisher.name()),
    ))
}

#[cfg(test)]
mod tests {
    use crate::http::testing::{app, form, send};
    use crate::models::{CreatePublisherError, Publisher};
    use crate::repositories::{MockAuthorRepository, MockPublisherRepository};
    use axum::http::StatusCode;

    fn publishers_app(repo: MockPublisherRepository) -> axum::Router {
        app(MockAuthorRepository::new(), repo)
    }

    #[tokio::test]
    async fn create_publisher_succeeds() {
        let mut repo = MockPublisherRepository::new();
        repo.expect_create_publisher()
            .withf(|req| req.name().to_string() == "Nova Editora")
            .times(1)
            .returning(|req| Ok(Publisher::new(1, req.name().clone())));

        let (status, body) =
            send(publishers_app(repo), form("POST", "/publishers", "Nova Editora")).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body, "Editora criada com sucesso: Nova Editora");
    }

    #[tokio::test]
    async fn create_duplicate_publisher_is_409() {
        let mut repo = MockPublisherRepository::new();
        repo.expect_create_publisher().returning(|req| {
            Err(CreatePublisherError::Duplicate {
                name: req.name().to_string(),
            })
        });

        let (status, body) =
            send(publishers_app(repo), form("POST", "/publishers", "Editora Existente")).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body, r#"Erro: A editora "Editora Existente" já está cadastrada."#);
    }

    #[tokio::test]
    async fn create_publisher_with_blank_name_is_400() {
        let mut repo = MockPublisherRepository::new();
        repo.expect_create_publisher().never();

        let (status, body) = send(publishers_app(repo), form("POST", "/publishers", "  ")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, r#"O campo "name" é obrigatório"#);
    }

    #[tokio::test]
    async fn create_publisher_failure_is_500() {
        let mut repo = MockPublisherRepository::new();
        repo.expect_create_publisher()
            .returning(|_| Err(CreatePublisherError::Other(anyhow::anyhow!("disk failure"))));

        let (status, body) =
            send(publishers_app(repo), form("POST", "/publishers", "Editora com Falha")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "Erro interno ao criar editora");
    }
}
