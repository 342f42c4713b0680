use coupon_manager::{
    api::{self, AppState},
    config::{self, database},
    errors::Result,
};
use dotenvy::dotenv;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("coupon_manager=info,tower_http=debug")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Load configuration and the nonce key
    let app_config = config::settings::load_default_config()
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;
    let nonce_secret = config::settings::load_nonce_secret()
        .inspect_err(|e| error!("Failed to load nonce secret: {}", e))?;
    info!(profile = ?app_config.profile, admins = app_config.admins.len(), "Configuration loaded");

    // 4. Connect to the database, creating tables for dev setups
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    if app_config.create_tables {
        database::create_tables(&db)
            .await
            .inspect(|_| info!("Database tables ready"))
            .inspect_err(|e| error!("Failed to create tables: {}", e))?;
    }

    // 5. Serve
    let bind_address = app_config.bind_address.clone();
    let app = api::router(AppState::new(app_config, db, nonce_secret));
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("Coupon manager listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
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
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown");
}
