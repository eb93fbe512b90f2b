use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::http::{header, HeaderValue, Method};
use clap::{Parser, Subcommand};
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use supplier_api::{build_router, AppState};
use supplier_core::repositories::{SupplierRepository, UserRepository};
use supplier_infrastructure::{
    create_pool, run_migrations, InMemorySupplierRepository, InMemoryUserRepository,
    PgSupplierRepository, PgUserRepository,
};
use supplier_shared::config::{AppConfig, DatabaseBackend};
use supplier_shared::telemetry::init_telemetry;

#[derive(Parser)]
#[command(name = "supplier-server")]
#[command(about = "Supplier registry HTTP service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server - Default
    Serve,
    /// Apply database migrations and exit
    Migrate,
    /// Attach a claim to an existing user
    GrantClaim {
        #[arg(long)]
        email: String,
        #[arg(long)]
        claim_type: String,
        #[arg(long)]
        value: String,
    },
    /// Add a user to a role
    AssignRole {
        #[arg(long)]
        email: String,
        #[arg(long)]
        role: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load().context("failed to load configuration")?;
    let _log_guard = init_telemetry(&config.log)?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::Migrate => migrate(&config).await,
        Commands::GrantClaim { email, claim_type, value } => {
            let state = build_state(&config).await?;
            state.auth.grant_claim(&email, &claim_type, &value).await?;
            info!("Claim {}={} granted", claim_type, value);
            Ok(())
        }
        Commands::AssignRole { email, role } => {
            let state = build_state(&config).await?;
            state.auth.assign_role(&email, &role).await?;
            info!("Role {} assigned", role);
            Ok(())
        }
    }
}

async fn serve(config: AppConfig) -> anyhow::Result<()> {
    info!("{} starting ({})...", config.app.name, config.app.env);

    let state = build_state(&config).await?;
    let app = build_router(state).layer(cors_layer(&config.app.cors_allowed_origins)?);

    let host: std::net::IpAddr = config.app.host.parse()?;
    let addr = SocketAddr::from((host, config.app.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn migrate(config: &AppConfig) -> anyhow::Result<()> {
    if config.database.backend != DatabaseBackend::Postgres {
        warn!("Memory backend selected, nothing to migrate");
        return Ok(());
    }

    let pool = connect(config).await?;
    run_migrations(&pool).await?;
    Ok(())
}

async fn connect(config: &AppConfig) -> anyhow::Result<PgPool> {
    info!("Connecting to database...");
    let pool = create_pool(&config.database)
        .await
        .context("failed to connect to database")?;
    info!("Database connection established.");
    Ok(pool)
}

async fn build_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let (suppliers, users): (Arc<dyn SupplierRepository>, Arc<dyn UserRepository>) =
        match config.database.backend {
            DatabaseBackend::Postgres => {
                let pool = connect(config).await?;
                if config.database.run_migrations {
                    run_migrations(&pool).await?;
                }
                (
                    Arc::new(PgSupplierRepository::new(pool.clone())),
                    Arc::new(PgUserRepository::new(pool)),
                )
            }
            DatabaseBackend::Memory => {
                warn!("Using in-memory storage, data is lost on exit");
                (
                    Arc::new(InMemorySupplierRepository::new()),
                    Arc::new(InMemoryUserRepository::new()),
                )
            }
        };

    Ok(AppState::new(suppliers, users, &config.jwt, &config.identity))
}

fn cors_layer(origins: &[String]) -> anyhow::Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|origin| origin.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()
        .context("invalid app.cors_allowed_origins entry")?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
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
                warn!("Failed to listen for SIGTERM: {}", e);
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

    info!("Shutdown signal received");
}
