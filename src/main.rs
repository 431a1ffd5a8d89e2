//! User Management Server
//!
//! Main entry point that wires the stores, event transport, authorization
//! and services together, then waits for a shutdown signal.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use usermgmt_auth::{
    AccessProfileAggregator, AuthorizationHandler, LocalPolicyEngine, PrincipalAttributeProvider,
};
use usermgmt_core::config::AppConfig;
use usermgmt_core::config::logging::LogFormat;
use usermgmt_core::error::AppError;
use usermgmt_core::traits::EventPublisher;
use usermgmt_database::repositories::{
    EmployerProfileRepository, IndividualProfileRepository, ProfileLinkRepository, UserRepository,
};
use usermgmt_database::{DatabasePool, migration};
use usermgmt_events::EventPublisherDispatch;
use usermgmt_service::link::{LinkFilterBuilder, ProfileLinkService};
use usermgmt_service::profile::ProfileService;
use usermgmt_service::{AuditEventService, AuditEventSink};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("USERMGMT_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format {
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        LogFormat::Pretty => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting user management v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection + migrations ─────────────────
    let db = DatabasePool::connect(&config.database).await?;
    if config.database.run_migrations {
        let applied = migration::run_migrations(db.pool()).await?;
        tracing::info!("Migrations up to date ({} embedded)", applied);
    }
    db.verify_schema().await?;

    // ── Step 2: Repositories ─────────────────────────────────────
    let link_repo = Arc::new(ProfileLinkRepository::new(db.pool().clone()));
    let user_repo = Arc::new(UserRepository::new(db.pool().clone()));
    let individual_repo = Arc::new(IndividualProfileRepository::new(db.pool().clone()));
    let employer_repo = Arc::new(EmployerProfileRepository::new(db.pool().clone()));

    // ── Step 3: Event transport ──────────────────────────────────
    tracing::info!(
        "Initializing event publisher (provider: {:?})...",
        config.events.provider
    );
    let publisher: Arc<dyn EventPublisher> =
        Arc::new(EventPublisherDispatch::from_config(&config.events).await?);
    let audit: Arc<dyn AuditEventSink> = Arc::new(AuditEventService::new(
        Arc::clone(&publisher),
        config.events.application_name.clone(),
    ));

    // ── Step 4: Authorization ────────────────────────────────────
    let aggregator = AccessProfileAggregator::new(link_repo.clone());
    let authz = AuthorizationHandler::new(
        PrincipalAttributeProvider::with_key(aggregator, config.access.profiles_attribute.clone()),
        Arc::new(LocalPolicyEngine::new().with_profiles_key(config.access.profiles_attribute.clone())),
    );

    // ── Step 5: Services ─────────────────────────────────────────
    let _link_service = ProfileLinkService::new(
        link_repo.clone(),
        LinkFilterBuilder::new(user_repo),
        authz.clone(),
        Arc::clone(&audit),
    );
    let _profile_service = ProfileService::new(
        individual_repo,
        employer_repo,
        link_repo,
        authz,
        Arc::clone(&audit),
    );
    tracing::info!("Services initialized");

    // ── Step 6: Wait for shutdown ────────────────────────────────
    shutdown_signal().await;
    tracing::info!("Shutdown signal received, closing resources...");

    db.close().await;
    tracing::info!("User management server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
