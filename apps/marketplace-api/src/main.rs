//! Tutoria Marketplace API
//!
//! Serves the account provisioning endpoints: self-service registration,
//! login, and lead submission with best-effort synchronization.

mod config;
mod logging;

use axum::{routing::get, Json, Router};
use config::Config;
use std::sync::Arc;
use tokio::signal;
use tracing::info;
use tutoria_api::{api_router, ApiState, LoginService};
use tutoria_auth::{PasswordHasher, TokenIssuer};
use tutoria_provisioning::{LeadIngestService, LeadSyncService, RegistrationService};
use tutoria_store::{
    LeadRepository, ProvisioningGateway, StoreClient, StoreConfig, UserDirectory,
};

#[tokio::main]
async fn main() {
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    logging::init_logging(&config.rust_log);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        host = %config.host,
        port = config.port,
        "Starting Tutoria marketplace API"
    );

    let store_client = match StoreClient::new(StoreConfig::new(
        &config.store_url,
        &config.store_service_key,
    )) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: failed to build store client: {e}");
            std::process::exit(1);
        }
    };

    let hasher = PasswordHasher::new();
    let tokens = TokenIssuer::new(config.jwt_secret.as_bytes());

    let registration = Arc::new(RegistrationService::new(
        ProvisioningGateway::new(store_client.clone()),
        hasher.clone(),
        tokens.clone(),
    ));

    let lead_sync = LeadSyncService::new(
        LeadRepository::new(store_client.clone()),
        registration.as_ref().clone(),
    );

    let state = ApiState {
        registration,
        lead_ingest: Arc::new(LeadIngestService::new(
            LeadRepository::new(store_client.clone()),
            lead_sync,
        )),
        login: Arc::new(LoginService::new(
            UserDirectory::new(store_client),
            hasher,
            tokens,
        )),
    };

    let app = Router::new()
        .route("/health", get(health_handler))
        .merge(api_router(state));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Error: failed to bind {addr}: {e}");
            std::process::exit(1);
        }
    };

    info!(addr = %addr, "Listening");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        eprintln!("Error: server exited: {e}");
        std::process::exit(1);
    }
}

/// Liveness probe.
async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Resolve when the process receives a termination signal.
async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
}
