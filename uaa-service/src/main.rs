use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::signal;

use uaa_service::{
    build_router,
    config::{MemberStoreConfig, UaaConfig},
    error::AppError,
    models::Member,
    observability::init_tracing,
    services::{
        ClientRegistry, InMemoryMemberStore, JwtService, MemberStore, MongoMemberStore,
        OAuthService,
    },
    utils::{hash_password, Password},
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    // Load configuration - fail fast if invalid
    let config = UaaConfig::from_env()?;

    init_tracing(
        &config.service_name,
        &config.log_level,
        config.otlp_endpoint.as_deref(),
    );

    tracing::info!(
        service = %config.service_name,
        version = %config.service_version,
        environment = ?config.environment,
        "Starting UAA service"
    );

    let members: Arc<dyn MemberStore> = match &config.member_store {
        MemberStoreConfig::Mongo { uri, database } => {
            let store = MongoMemberStore::connect(uri, database)
                .await
                .map_err(AppError::InternalError)?;
            tracing::info!(database = %database, "Connected to member store");
            Arc::new(store)
        }
        MemberStoreConfig::Memory => {
            let store = InMemoryMemberStore::new();
            seed_demo_member(&store).await?;
            tracing::info!("Using in-memory member store with demo data");
            Arc::new(store)
        }
    };

    let jwt = JwtService::new(&config.jwt).map_err(AppError::ConfigError)?;
    tracing::info!(issuer = %config.jwt.issuer, "JWT service initialized");

    let registry =
        Arc::new(ClientRegistry::from_spec(&config.clients).map_err(AppError::ConfigError)?);
    tracing::info!(clients = registry.len(), "Client registry loaded");

    let store_timeout = Duration::from_millis(config.store_timeout_ms);
    let oauth = OAuthService::new(registry, members.clone(), jwt.clone(), store_timeout);

    let state = AppState {
        config: config.clone(),
        jwt,
        members,
        oauth,
        store_timeout,
    };

    let app = build_router(state)?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(address = %addr, "Listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Service shutdown complete");
    Ok(())
}

/// The in-memory backend starts with one demo member so the dev deployment
/// can complete a grant out of the box.
async fn seed_demo_member(store: &InMemoryMemberStore) -> Result<(), AppError> {
    let password_hash = hash_password(&Password::new("demo".to_string()))
        .map_err(AppError::InternalError)?
        .into_string();

    store
        .insert(Member::new(
            "Toshiaki".to_string(),
            "Maki".to_string(),
            "maki@example.com".to_string(),
            password_hash,
        ))
        .await
        .map_err(AppError::InternalError)?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
