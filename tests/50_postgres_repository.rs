// Runs against a real Postgres when DATABASE_URL is set; skipped otherwise.

use anyhow::Result;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use employee_directory_api::auth::hash_password;
use employee_directory_api::config::{AppConfig, Environment};
use employee_directory_api::database::models::NewEmployee;
use employee_directory_api::database::{
    DatabaseManager, EmployeeRepository, PgEmployeeRepository, RepositoryError,
};
use employee_directory_api::middleware::AuthUser;
use employee_directory_api::rules::{DirectoryError, Role, ValidationFailure};
use employee_directory_api::services::EmployeeService;

async fn repository() -> Result<Option<PgEmployeeRepository>> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping");
        return Ok(None);
    };
    let mut config = AppConfig::for_environment(Environment::Development).database;
    config.url = Some(url);
    config.max_connections = 4;

    let pool: PgPool = DatabaseManager::connect(&config).await?;
    DatabaseManager::run_migrations(&pool).await?;
    Ok(Some(PgEmployeeRepository::new(pool)))
}

fn new_employee(manager_id: Option<Uuid>) -> Result<NewEmployee> {
    // Unique per run so tests can share a database
    let tag = Uuid::new_v4().simple().to_string();
    Ok(NewEmployee {
        first_name: "Pg".to_string(),
        last_name: format!("Test{}", &tag[..8]),
        email: format!("{}@pg.test", tag),
        doc_number: format!("PG-{}", tag),
        date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap_or_default(),
        role: Role::Employee,
        manager_id,
        credentials: hash_password("Secret#1"),
        phones: vec!["+1 555 0100".to_string(), "+1 555 0101".to_string()],
    })
}

#[tokio::test]
async fn create_reads_back_phones_and_manager_name() -> Result<()> {
    let Some(repo) = repository().await? else { return Ok(()) };

    let boss = repo.create(new_employee(None)?).await?;
    let report = repo.create(new_employee(Some(boss.id))?).await?;

    assert_eq!(report.version, 1);
    assert_eq!(report.phones, vec!["+1 555 0100", "+1 555 0101"]);
    assert_eq!(report.manager_name.as_deref(), Some(boss.display_name().as_str()));

    let hits = repo.list(Some(&report.doc_number.to_lowercase())).await?;
    assert_eq!(hits.len(), 1);

    repo.delete(report.id, report.version).await?;
    repo.delete(boss.id, boss.version).await?;
    Ok(())
}

#[tokio::test]
async fn duplicate_document_and_unknown_manager_are_classified() -> Result<()> {
    let Some(repo) = repository().await? else { return Ok(()) };

    let first = repo.create(new_employee(None)?).await?;
    let mut clash = new_employee(None)?;
    clash.doc_number = first.doc_number.clone();
    assert!(matches!(
        repo.create(clash).await,
        Err(RepositoryError::DuplicateDocument)
    ));

    assert!(matches!(
        repo.create(new_employee(Some(Uuid::new_v4()))?).await,
        Err(RepositoryError::UnknownManager)
    ));

    repo.delete(first.id, first.version).await?;
    Ok(())
}

#[tokio::test]
async fn stale_version_conflicts_and_changes_nothing() -> Result<()> {
    let Some(repo) = repository().await? else { return Ok(()) };

    let created = repo.create(new_employee(None)?).await?;
    let mut draft = employee_directory_api::types::EmployeeDraft {
        first_name: "Renamed".to_string(),
        last_name: created.last_name.clone(),
        email: created.email.clone(),
        doc_number: created.doc_number.clone(),
        date_of_birth: created.date_of_birth,
        role: Role::Leader,
        manager_id: None,
        phones: vec!["1".to_string(), "2".to_string(), "3".to_string()],
    };

    let updated = repo.update(created.id, created.version, &draft).await?;
    assert_eq!(updated.version, created.version + 1);
    assert_eq!(updated.phones.len(), 3);

    draft.first_name = "Lost".to_string();
    assert!(matches!(
        repo.update(created.id, created.version, &draft).await,
        Err(RepositoryError::Conflict(_))
    ));
    assert!(matches!(
        repo.delete(created.id, created.version).await,
        Err(RepositoryError::Conflict(_))
    ));

    let current = repo.find_by_id(created.id).await?.expect("row still present");
    assert_eq!(current.first_name, "Renamed");

    repo.delete(current.id, current.version).await?;
    Ok(())
}

#[tokio::test]
async fn manager_with_reports_cannot_be_deleted() -> Result<()> {
    let Some(repo) = repository().await? else { return Ok(()) };

    let boss = repo.create(new_employee(None)?).await?;
    let report = repo.create(new_employee(Some(boss.id))?).await?;

    assert!(matches!(
        repo.delete(boss.id, boss.version).await,
        Err(RepositoryError::ManagerInUse(id)) if id == boss.id
    ));

    repo.delete(report.id, report.version).await?;
    repo.delete(boss.id, boss.version).await?;
    Ok(())
}

#[tokio::test]
async fn failed_phone_replacement_keeps_the_old_set() -> Result<()> {
    let Some(repo) = repository().await? else { return Ok(()) };

    let created = repo.create(new_employee(None)?).await?;

    // Second number exceeds the column width, failing after the first insert
    let numbers = vec!["+1 555 0199".to_string(), "9".repeat(64)];
    assert!(repo.replace_phones(created.id, &numbers).await.is_err());

    let current = repo.find_by_id(created.id).await?.expect("row still present");
    assert_eq!(current.phones, created.phones);
    assert_eq!(current.version, created.version);

    repo.delete(current.id, current.version).await?;
    Ok(())
}

#[tokio::test]
async fn oversized_phone_is_rejected_before_reaching_the_column() -> Result<()> {
    let Some(repo) = repository().await? else { return Ok(()) };
    let service = EmployeeService::new(std::sync::Arc::new(repo));
    let director = AuthUser {
        user_id: Uuid::new_v4(),
        email: "director@pg.test".to_string(),
        name: "Director".to_string(),
        role: Some("director".to_string()),
    };

    let new = new_employee(None)?;
    let draft = employee_directory_api::types::EmployeeDraft {
        first_name: new.first_name,
        last_name: new.last_name,
        email: new.email,
        doc_number: new.doc_number.clone(),
        date_of_birth: new.date_of_birth,
        role: Role::Employee,
        manager_id: None,
        phones: vec!["1".repeat(31), "222".to_string()],
    };

    let err = service.create(&director, draft, "Secret#1").await.unwrap_err();
    assert!(matches!(
        err,
        DirectoryError::Validation(ValidationFailure::InvalidInput { field: "phones", .. })
    ));
    assert!(service.list(Some(&new.doc_number)).await?.is_empty());
    Ok(())
}
