//! Shopping cart service backed by Redis.

use clap::Parser;
use polyshop_cart::{CartAccumulator, CartConfig, RedisHashStore};
use polyshop_reconnect::ReconnectingStore;
use polyshop_reconnect::connectors::RedisConnector;
use polyshop_services::config::CartServiceConfig;
use polyshop_services::health::ServiceInfo;
use polyshop_services::{cart, shutdown, telemetry};
use std::process::ExitCode;
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> ExitCode {
    let config = CartServiceConfig::parse();
    telemetry::init(config.server.log_format);

    let reconnect = match config.connect.reconnect_config("cart-redis") {
        Ok(reconnect) => reconnect,
        Err(e) => {
            tracing::error!(error = %e, "invalid connection policy");
            return ExitCode::FAILURE;
        }
    };
    let connector = match RedisConnector::new(&config.redis_addr) {
        Ok(connector) => connector,
        Err(e) => {
            tracing::error!(error = %e, "invalid redis address");
            return ExitCode::FAILURE;
        }
    };

    let shutdown_token = shutdown::watch_signals();
    tracing::info!(addr = %config.redis_addr, "connecting to redis");
    let handle = match ReconnectingStore::new(connector, reconnect)
        .connect(&shutdown_token)
        .await
    {
        Ok(handle) => handle,
        Err(e) => {
            tracing::error!(error = %e, "could not connect to redis, exiting");
            return ExitCode::FAILURE;
        }
    };

    let cart = Arc::new(CartAccumulator::new(
        RedisHashStore::new(handle),
        CartConfig::builder()
            .name("cart")
            .call_timeout(config.store_call_timeout())
            .build(),
    ));
    let info = ServiceInfo::new(
        "cart-service",
        config.server.pod_name.clone(),
        config.server.node_name.clone(),
    );
    let app = cart::router(Arc::clone(&cart), info);

    let addr = config.server.addr();
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(%addr, error = %e, "failed to bind");
            cart.close().await;
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(%addr, "cart-service listening");

    let served = shutdown::serve(
        listener,
        app,
        shutdown_token,
        config.server.shutdown_grace(),
    )
    .await;
    cart.close().await;

    match served {
        Ok(()) => {
            tracing::info!("cart-service stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "server error");
            ExitCode::FAILURE
        }
    }
}
