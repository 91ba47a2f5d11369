mod authors;
mod handler;
mod publishers;

use crate::render::HtmlRenderer;
use crate::repositories::{AuthorRepository, PublisherRepository};
use anyhow::Context;
use axum::Router;
use axum::routing::{get, post, put};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

#[derive(Debug)]
pub struct AppState<AR, PR> {
    author_repo: Arc<AR>,
    publisher_repo: Arc<PR>,
    renderer: Arc<HtmlRenderer>,
}

impl<AR, PR> AppState<AR, PR>
where
    AR: AuthorRepository,
    PR: PublisherRepository,
{
    pub fn new(author_repo: AR, publisher_repo: PR, renderer: HtmlRenderer) -> Self {
        Self {
            author_repo: Arc::new(author_repo),
            publisher_repo: Arc::new(publisher_repo),
            renderer: Arc::new(renderer),
        }
    }
}

impl<AR, PR> Clone for AppState<AR, PR> {
    fn clone(&self) -> Self {
        Self {
            author_repo: Arc::clone(&self.author_repo),
            publisher_repo: Arc::clone(&self.publisher_repo),
            renderer: Arc::clone(&self.renderer),
        }
    }
}

#[derive(Debug)]
pub struct HttpServerConfig {
    port: u16,
    assets_dir: PathBuf,
}

impl HttpServerConfig {
    pub fn new(port: u16, assets_dir: impl Into<PathBuf>) -> Self {
        Self {
            port,
            assets_dir: assets_dir.into(),
        }
    }
}

pub struct HttpServer {
    router: Router,
    listener: TcpListener,
}

impl HttpServer {
    pub async fn new<AR, PR>(
        state: AppState<AR, PR>,
        config: HttpServerConfig,
    ) -> anyhow::Result<Self>
    where
        AR: AuthorRepository,
        PR: PublisherRepository,
    {
        let router = router(state)
            .nest_service("/assets", ServeDir::new(&config.assets_dir))
            .layer(TraceLayer::new_for_http());

        let listener = TcpListener::bind(format!("0.0.0.0:{}", config.port))
            .await
            .with_context(|| format!("Failed to bind to port {}", config.port))?;

        Ok(Self { router, listener })
    }

    pub async fn run(self) -> anyhow::Result<()> {
        if let Ok(addr) = self.listener.local_addr() {
            tracing::info!(%addr, "listening");
        }
        axum::serve(self.listener, self.router)
            .await
            .context("Received error from running server")?;
        Ok(())
    }
}

/// Every application route, without static asset serving or middleware.
pub fn router<AR, PR>(state: AppState<AR, PR>) -> Router
where
    AR: AuthorRepository,
    PR: PublisherRepository,
{
    Router::new()
        .route("/health", get(handler::health))
        .merge(author_routes::<AR, PR>())
        .merge(publisher_routes::<AR, PR>())
        .with_state(state)
}

fn author_routes<AR, PR>() -> Router<AppState<AR, PR>>
where
    AR: AuthorRepository,
    PR: PublisherRepository,
{
    Router::new()
        .route(
            "/authors",
            get(authors::list_authors::<AR, PR>).post(authors::create_author::<AR, PR>),
        )
        .route(
            "/authors/new",
            get(authors::new_author::<AR, PR>).fallback(handler::invalid_id),
        )
        .route(
            "/authors/{id}",
            put(authors::update_author::<AR, PR>)
                .post(authors::update_author::<AR, PR>)
                .patch(authors::update_author::<AR, PR>)
                .delete(authors::remove_author::<AR, PR>),
        )
        .route("/authors/{id}/edit", get(authors::edit_author::<AR, PR>))
}

fn publisher_routes<AR, PR>() -> Router<AppState<AR, PR>>
where
    AR: AuthorRepository,
    PR: PublisherRepository,
{
    Router::new().route(
        "/publishers",
        post(publishers::create_publisher::<AR, PR>),
    )
}
