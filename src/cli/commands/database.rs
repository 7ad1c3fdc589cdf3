use serde_json::json;
use std::sync::Arc;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config::config;
use crate::database::{seed_demo_employees, DatabaseManager, EmployeeRepository, PgEmployeeRepository};

pub async fn migrate(output_format: OutputFormat) -> anyhow::Result<()> {
    let pool = DatabaseManager::connect(&config().database).await?;
    DatabaseManager::run_migrations(&pool).await?;
    output_success(&output_format, "Migrations applied", None)
}

pub async fn seed(output_format: OutputFormat) -> anyhow::Result<()> {
    let pool = DatabaseManager::connect(&config().database).await?;
    let repository: Arc<dyn EmployeeRepository> = Arc::new(PgEmployeeRepository::new(pool));

    let created = seed_demo_employees(repository.as_ref()).await?;
    let message = if created == 0 {
        "Employees already present, nothing seeded".to_string()
    } else {
        format!("Seeded {} employees", created)
    };
    output_success(&output_format, &message, Some(json!({ "created": created })))
}
