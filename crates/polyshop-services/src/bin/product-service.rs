//! Product catalog service backed by PostgreSQL.

use clap::Parser;
use polyshop_catalog::PgProductRepository;
use polyshop_reconnect::connectors::PgConnector;
use polyshop_reconnect::{Connector, ReconnectingStore};
use polyshop_services::config::ProductServiceConfig;
use polyshop_services::health::ServiceInfo;
use polyshop_services::{products, shutdown, telemetry};
use std::process::ExitCode;
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> ExitCode {
    let config = ProductServiceConfig::parse();
    telemetry::init(config.server.log_format);

    let reconnect = match config.connect.reconnect_config("catalog-db") {
        Ok(reconnect) => reconnect,
        Err(e) => {
            tracing::error!(error = %e, "invalid connection policy");
            return ExitCode::FAILURE;
        }
    };
    let connector = match PgConnector::new(&config.database_url) {
        Ok(connector) => connector,
        Err(e) => {
            tracing::error!(error = %e, "invalid database url");
            return ExitCode::FAILURE;
        }
    };

    let shutdown_token = shutdown::watch_signals();
    tracing::info!(endpoint = %connector.target(), "connecting to database");
    let handle = match ReconnectingStore::new(connector, reconnect)
        .connect(&shutdown_token)
        .await
    {
        Ok(handle) => handle,
        Err(e) => {
            tracing::error!(error = %e, "could not connect to database, exiting");
            return ExitCode::FAILURE;
        }
    };

    let repository = Arc::new(PgProductRepository::new(handle.clone()));
    let info = ServiceInfo::new(
        "product-service",
        config.server.pod_name.clone(),
        config.server.node_name.clone(),
    );
    let app = products::router(repository, info, config.store_call_timeout());

    let addr = config.server.addr();
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(%addr, error = %e, "failed to bind");
            handle.close().await;
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(%addr, "product-service listening");

    let served = shutdown::serve(
        listener,
        app,
        shutdown_token,
        config.server.shutdown_grace(),
    )
    .await;
    handle.close().await;

    match served {
        Ok(()) => {
            tracing::info!("product-service stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "server error");
            ExitCode::FAILURE
        }
    }
}
