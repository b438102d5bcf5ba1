mod bundler;
mod compiler;
mod config;
mod document;
mod extract;
mod generator;
mod models;
mod routes;
mod storage;

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{fmt, EnvFilter};

use crate::bundler::EsbuildBundler;
use crate::compiler::CompilerService;
use crate::config::Config;
use crate::generator::CompletionGenerator;
use crate::routes::{app, AppState};
use crate::storage::BlobStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Init tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let config = Arc::new(Config::from_env());

    let generator = Arc::new(CompletionGenerator::new(&config)?);
    let bundler = Arc::new(EsbuildBundler::new(config.esbuild_bin.clone()));
    let state = AppState {
        compiler: CompilerService::new(generator, bundler),
        blob: Arc::new(BlobStore::new(&config)),
        config: config.clone(),
    };

    let app = app(state).layer(
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(%addr, "Starting server");
    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;
    Ok(())
}
