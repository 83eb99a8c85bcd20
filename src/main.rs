use clap::Parser;
use movies_api::{
    routes,
    user::{InMemoryUserRepository, PostgresUserRepository, UserModel, UserRepository},
    AppState, Config,
};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "movies_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::parse();
    info!(port = config.port, "Starting movies API server");

    let user_repository: Arc<dyn UserRepository> = match &config.dsn {
        Some(dsn) => match sqlx::PgPool::connect(dsn).await {
            Ok(pool) => Arc::new(PostgresUserRepository::new(pool)),
            Err(e) => {
                error!(error = %e, "Failed to connect to database");
                std::process::exit(1);
            }
        },
        None => {
            warn!("No database configured, using in-memory user store");
            match UserModel::new(1, "admin@example.com", "Admin", "User", "secret") {
                Ok(admin) => Arc::new(InMemoryUserRepository::with_users(vec![admin])),
                Err(e) => {
                    error!(error = %e, "Failed to seed in-memory user store");
                    std::process::exit(1);
                }
            }
        }
    };

    let auth_config = match config.auth_config() {
        Ok(auth_config) => auth_config,
        Err(e) => {
            error!(error = %e, "Invalid token configuration");
            std::process::exit(1);
        }
    };

    let app = routes::app(AppState::new(user_repository, auth_config));

    let listener = match tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(error = %e, port = config.port, "Failed to bind listener");
            std::process::exit(1);
        }
    };
    info!("Server running on http://localhost:{}", config.port);

    if let Err(e) = axum::serve(listener, app).await {
        error!(error = %e, "Server error");
    }
}
