use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::{Employee, NewEmployee};
use crate::rules::{DirectoryError, ValidationFailure};
use crate::types::EmployeeDraft;

/// Storage failures surfaced by an [`EmployeeRepository`].
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Employee not found: {0}")]
    NotFound(Uuid),

    /// Optimistic-concurrency violation: the row changed or vanished since it was read.
    #[error("Employee {0} was modified or deleted by another process")]
    Conflict(Uuid),

    /// Unique index on document number hit at commit time.
    #[error("Document number already in use")]
    DuplicateDocument,

    /// Manager reference points at no existing employee.
    #[error("Manager does not exist")]
    UnknownManager,

    /// Restrict-on-delete: other employees still reference this one as manager.
    #[error("Employee {0} is still the manager of other employees")]
    ManagerInUse(Uuid),

    #[error("Storage failure: {0}")]
    Storage(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Storage contract the directory core depends on.
///
/// `update` and `delete` take the version the caller read; a mismatch (or a
/// missing row) is reported as [`RepositoryError::Conflict`], never as a silent
/// overwrite or no-op. Phone-set replacement is all-or-nothing.
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// Substring search over first name, last name, email and document number.
    async fn list(&self, query: Option<&str>) -> Result<Vec<Employee>, RepositoryError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Employee>, RepositoryError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Employee>, RepositoryError>;

    async fn exists_by_document(&self, doc_number: &str, exclude_id: Option<Uuid>)
        -> Result<bool, RepositoryError>;

    async fn count(&self) -> Result<i64, RepositoryError>;

    async fn create(&self, employee: NewEmployee) -> Result<Employee, RepositoryError>;

    /// Write scalar fields, manager and the full phone set in one transaction.
    async fn update(&self, id: Uuid, expected_version: i32, draft: &EmployeeDraft)
        -> Result<Employee, RepositoryError>;

    /// Atomic delete-then-insert of the employee's phones.
    async fn replace_phones(&self, id: Uuid, numbers: &[String]) -> Result<(), RepositoryError>;

    /// Delete the employee and its phones.
    async fn delete(&self, id: Uuid, expected_version: i32) -> Result<(), RepositoryError>;

    async fn health_check(&self) -> Result<(), RepositoryError>;
}

impl From<RepositoryError> for DirectoryError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(_) | RepositoryError::Conflict(_) => DirectoryError::Conflict(
                "The employee was modified or deleted by another process. Reload and try again.".to_string(),
            ),
            RepositoryError::DuplicateDocument => ValidationFailure::DuplicateDocument.into(),
            RepositoryError::UnknownManager => ValidationFailure::UnknownManager.into(),
            RepositoryError::ManagerInUse(_) => DirectoryError::Conflict(
                "The employee is still assigned as manager of other employees.".to_string(),
            ),
            RepositoryError::Storage(msg) => {
                tracing::error!("Employee storage failure: {}", msg);
                DirectoryError::Internal("An error occurred while processing your request".to_string())
            }
            RepositoryError::Sqlx(sqlx_err) => {
                tracing::error!("SQLx error: {}", sqlx_err);
                DirectoryError::Internal("Database error occurred".to_string())
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::database::models::Credentials;
    use crate::rules::Role;
    use chrono::NaiveDate;

    pub(crate) fn draft(doc_number: &str) -> EmployeeDraft {
        EmployeeDraft {
            first_name: "Test".to_string(),
            last_name: "Person".to_string(),
            email: format!("{}@demo.com", doc_number.to_lowercase()),
            doc_number: doc_number.to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 5, 20).unwrap(),
            role: Role::Employee,
            manager_id: None,
            phones: vec!["+55 11 99999-0001".to_string(), "+55 11 98888-0001".to_string()],
        }
    }

    pub(crate) fn new_employee(doc_number: &str) -> NewEmployee {
        let d = draft(doc_number);
        NewEmployee {
            first_name: d.first_name,
            last_name: d.last_name,
            email: d.email,
            doc_number: d.doc_number,
            date_of_birth: d.date_of_birth,
            role: d.role,
            manager_id: d.manager_id,
            credentials: Credentials {
                hash: vec![1, 2, 3],
                salt: vec![4, 5, 6],
            },
            phones: d.phones,
        }
    }

    #[test]
    fn unique_index_race_is_a_validation_failure_not_a_conflict() {
        let err: DirectoryError = RepositoryError::DuplicateDocument.into();
        assert!(matches!(err, DirectoryError::Validation(ValidationFailure::DuplicateDocument)));
    }

    #[test]
    fn vanished_rows_and_version_mismatch_are_conflicts() {
        let id = Uuid::new_v4();
        assert!(matches!(DirectoryError::from(RepositoryError::Conflict(id)), DirectoryError::Conflict(_)));
        assert!(matches!(DirectoryError::from(RepositoryError::NotFound(id)), DirectoryError::Conflict(_)));
        assert!(matches!(DirectoryError::from(RepositoryError::ManagerInUse(id)), DirectoryError::Conflict(_)));
    }

    #[test]
    fn storage_failures_hide_details() {
        let err: DirectoryError = RepositoryError::Storage("disk on fire at /var/lib".into()).into();
        match err {
            DirectoryError::Internal(msg) => assert!(!msg.contains("/var/lib")),
            other => panic!("unexpected {:?}", other),
        }
    }
}
