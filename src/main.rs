use std::{path::Path, sync::Arc};

use anyhow::Context;
use era_progress_sync::config::Config;
use era_progress_sync::progress_api::ProgressApi;
use era_progress_sync::storage::{DbProgressRepo, ProgressRepository};
use migration::MigratorTrait;
use poem::{
    EndpointExt, Route, Server,
    listener::TcpListener,
    middleware::{Cors, Tracing as PoemTracing},
};
use poem_openapi::OpenApiService;
use sea_orm::Database;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt::SubscriberBuilder, prelude::*};

type ProgressSyncResult<T> = anyhow::Result<T>;

#[tokio::main]
async fn main() -> ProgressSyncResult<()> {
    // Initialize tracing (logs). Respect RUST_LOG if set, default to info for our crate and warn for deps.
    let default_filter = format!(
        "{}=info,poem=info,reqwest=warn,h2=warn",
        env!("CARGO_PKG_NAME")
    );
    let env_filter = std::env::var("RUST_LOG").unwrap_or(default_filter);
    SubscriberBuilder::default()
        .with_env_filter(EnvFilter::new(env_filter))
        .with_target(false)
        .with_level(true)
        .pretty()
        .finish()
        .with(ErrorLayer::default())
        .init();
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "starting Era Progress Sync"
    );
    // Load environment variables from .env files
    if Path::new(".env.local").exists() {
        dotenvy::from_filename(".env.local")?;
    } else if Path::new(".env").exists() {
        dotenvy::from_filename(".env")?;
    };
    let config = Config::load();
    match config.validate() {
        Ok(_) => {}
        Err(e) => {
            return Err(anyhow::anyhow!(e));
        }
    }

    let db_conn = Database::connect(&config.db_connection_string)
        .await
        .with_context(|| "Failed to connect to database")?;

    migration::Migrator::up(&db_conn, None)
        .await
        .with_context(|| "Failed to run database migrations")?;

    let repo: Arc<dyn ProgressRepository> = Arc::new(DbProgressRepo::new(db_conn));
    tracing::info!(db = %config.db_connection_string, "configured progress repository");

    run_poem(repo, Arc::new(config)).await?;
    Ok(())
}

pub async fn run_poem(
    repo: Arc<dyn ProgressRepository>,
    config: Arc<Config>,
) -> ProgressSyncResult<()> {
    let version = env!("CARGO_PKG_VERSION");
    let api = ProgressApi {
        repo,
        config: config.clone(),
    };
    let api_service = OpenApiService::new(api, "Era Progress API", version)
        .server(config.public_base_url.clone());
    let ui = api_service.rapidoc();
    let spec = api_service.spec();
    let route = Route::new()
        .nest("/", api_service)
        .nest("/ui", ui)
        .nest("/spec", poem::endpoint::make_sync(move |_| spec.clone()))
        .with(Cors::new())
        .with(PoemTracing);

    tracing::info!(bind_addr = %config.bind_addr, "starting HTTP server");
    Server::new(TcpListener::bind(config.bind_addr.clone()))
        .run(route)
        .await?;
    Ok(())
}
