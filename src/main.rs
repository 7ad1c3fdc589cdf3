use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use employee_directory_api::{
    app,
    config::config,
    database::{seed_demo_employees, DatabaseManager, EmployeeRepository, PgEmployeeRepository},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "employee_directory_api=info,tower_http=info".into()),
        )
        .init();

    // Initialize configuration (this loads the config singleton)
    let config = config();
    config.validate().context("refusing to start with this configuration")?;
    tracing::info!("Starting Employee Directory API in {:?} mode", config.environment);

    let pool = DatabaseManager::connect(&config.database).await?;
    if config.database.run_migrations {
        DatabaseManager::run_migrations(&pool).await?;
    }

    let repository: Arc<dyn EmployeeRepository> = Arc::new(PgEmployeeRepository::new(pool));
    if config.database.seed_on_startup {
        let created = seed_demo_employees(repository.as_ref()).await?;
        if created > 0 {
            tracing::info!("Seeded {} demo employees", created);
        }
    }

    let app = app(AppState::new(config.clone(), repository));

    let bind_addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Employee Directory API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
