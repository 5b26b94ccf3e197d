mod cli;

use crate::cli::{StorageBackendArg, CLI};
use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tinylink_core::Shortener;
use tinylink_gateway::{App, AppState};
use tinylink_generator::HashGenerator;
use tinylink_shortener::{ServiceSettings, ShortenerService};
use tinylink_storage::{DynamoDbRepository, InMemoryRepository, MySqlRepository, Repository};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::parse();
    let _telemetry = tinylink_telemetry::init(&config.telemetry_settings())
        .context("failed to initialize telemetry")?;

    let settings = config
        .service_settings()
        .context("invalid short code configuration")?;
    let generator = HashGenerator::builder()
        .format(settings.code_format.clone())
        .namespace(config.generator_namespace.clone())
        .build();

    info!(
        listen_addr = %config.listen_addr,
        storage_backend = %config.storage,
        code_length = settings.code_format.length(),
        max_attempts = settings.max_attempts,
        "starting tinylink gateway"
    );

    match config.storage {
        StorageBackendArg::InMemory => {
            warn!("in-memory storage loses every link on restart");
            run_server(&config, InMemoryRepository::new(), generator, settings).await
        }
        StorageBackendArg::Mysql => {
            let mysql_dsn = config
                .mysql_dsn
                .as_deref()
                .context("mysql dsn is required when storage backend is mysql")?;
            let repository = MySqlRepository::connect(mysql_dsn)
                .await
                .context("failed to connect to mysql")?;
            run_server(&config, repository, generator, settings).await
        }
        StorageBackendArg::DynamoDb => {
            let dynamodb = config
                .dynamodb_config()
                .context("table name is required when storage backend is dynamodb")?;
            info!(table = %dynamodb.table_name, "using dynamodb table");
            let repository = DynamoDbRepository::connect(dynamodb).await;
            run_server(&config, repository, generator, settings).await
        }
    }
}

async fn run_server<R: Repository>(
    config: &CLI,
    repository: R,
    generator: HashGenerator,
    settings: ServiceSettings,
) -> anyhow::Result<()> {
    let shortener: Arc<dyn Shortener> =
        Arc::new(ShortenerService::new(repository, generator, settings));
    let state = AppState::new(shortener, config.public_base_url());

    let listener = TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    info!(listen_addr = %listener.local_addr()?, "gateway listening");

    axum::serve(listener, App::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("http server failed")?;

    info!("gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
