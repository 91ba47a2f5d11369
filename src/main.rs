use anyhow::Context;
use lucienne::assets::AssetsConfig;
use lucienne::config::Config;
use lucienne::database::{
    PostgresAuthorRepository, PostgresPublisherRepository, establish_pool, run_migrations,
};
use lucienne::http::{AppState, HttpServer, HttpServerConfig};
use lucienne::render::HtmlRenderer;
use tracing_subscriber::EnvFilter;

const ASSETS_URL_PATH: &str = "/assets";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_log_filter()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!(env = config.app_env(), "starting lucienne");

    let root = std::env::current_dir().context("Failed to resolve the working directory")?;
    let assets = AssetsConfig::load(
        &root,
        config.assets_path(),
        config.compiled_assets_path(),
        config.assets_build_file(),
    )?;

    let pool = establish_pool(config.database_url()).await?;
    run_migrations(&pool, config.migrations_path()).await?;

    let renderer = HtmlRenderer::new(
        root.join(config.views_path()),
        ASSETS_URL_PATH,
        assets.mapping().clone(),
    );
    let state = AppState::new(
        PostgresAuthorRepository::new(pool.clone()),
        PostgresPublisherRepository::new(pool),
        renderer,
    );

    let server_config = HttpServerConfig::new(config.app_port(), assets.compiled_full_path());
    let http_server = HttpServer::new(state, server_config).await?;
    http_server.run().await
}
