use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::hash_password;
use crate::database::models::{Employee, NewEmployee};
use crate::database::repository::{EmployeeRepository, RepositoryError};
use crate::middleware::AuthUser;
use crate::rules::validation::check_password;
use crate::rules::{
    authorize_create, authorize_delete, authorize_update, caller_role, validate_draft, DirectoryError, Role,
    Subject,
};
use crate::types::{EmployeeDraft, Operation};

/// Orchestrates employee reads and mutations: authorization, then business
/// rules, then the repository write.
#[derive(Clone)]
pub struct EmployeeService {
    repository: Arc<dyn EmployeeRepository>,
}

impl EmployeeService {
    pub fn new(repository: Arc<dyn EmployeeRepository>) -> Self {
        Self { repository }
    }

    pub async fn list(&self, query: Option<&str>) -> Result<Vec<Employee>, DirectoryError> {
        Ok(self.repository.list(query).await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<Employee, DirectoryError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| DirectoryError::NotFound(format!("Employee {} not found", id)))
    }

    pub async fn create(
        &self,
        caller: &AuthUser,
        draft: EmployeeDraft,
        password: &str,
    ) -> Result<Employee, DirectoryError> {
        let draft = draft.trimmed();
        let role = self.caller(caller, Operation::Create)?;

        authorize_create(role, draft.role).inspect_err(|e| deny(caller, Operation::Create, e))?;
        validate_draft(self.repository.as_ref(), &draft, Subject::New, today())
            .await
            .inspect_err(|e| reject(caller, Operation::Create, e))?;
        check_password(password)
            .map_err(DirectoryError::from)
            .inspect_err(|e| reject(caller, Operation::Create, e))?;

        let credentials = hash_password(password);

        let phones = draft.normalized_phones();
        let created = self
            .repository
            .create(NewEmployee {
                first_name: draft.first_name,
                last_name: draft.last_name,
                email: draft.email,
                doc_number: draft.doc_number,
                date_of_birth: draft.date_of_birth,
                role: draft.role,
                manager_id: draft.manager_id,
                credentials,
                phones,
            })
            .await
            .map_err(DirectoryError::from)
            .inspect_err(|e| reject(caller, Operation::Create, e))?;

        info!("{} created employee {} ({})", caller.user_id, created.id, created.role);
        Ok(created)
    }

    /// Replace scalar fields, manager and phone set. `version` is the token the
    /// client read; without one the version loaded here is used, so a write
    /// racing another writer still reports a conflict.
    pub async fn update(
        &self,
        caller: &AuthUser,
        id: Uuid,
        draft: EmployeeDraft,
        version: Option<i32>,
    ) -> Result<Employee, DirectoryError> {
        let draft = draft.trimmed();
        let role = self.caller(caller, Operation::Update)?;
        let existing = self.get(id).await?;

        authorize_update(role, existing.role, draft.role).inspect_err(|e| deny(caller, Operation::Update, e))?;
        validate_draft(self.repository.as_ref(), &draft, Subject::Existing(id), today())
            .await
            .inspect_err(|e| reject(caller, Operation::Update, e))?;

        let expected = version.unwrap_or(existing.version);
        let updated = self
            .repository
            .update(id, expected, &draft)
            .await
            .map_err(DirectoryError::from)
            .inspect_err(|e| reject(caller, Operation::Update, e))?;

        info!("{} updated employee {} (version {})", caller.user_id, id, updated.version);
        Ok(updated)
    }

    pub async fn delete(&self, caller: &AuthUser, id: Uuid, version: Option<i32>) -> Result<(), DirectoryError> {
        let role = self.caller(caller, Operation::Delete)?;
        let existing = self.get(id).await?;

        authorize_delete(role, existing.role).inspect_err(|e| deny(caller, Operation::Delete, e))?;

        self.repository
            .delete(id, version.unwrap_or(existing.version))
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) | RepositoryError::NotFound(_) => {
                    DirectoryError::Conflict(
                        "The employee was already removed by another process.".to_string(),
                    )
                }
                other => other.into(),
            })
            .inspect_err(|e| reject(caller, Operation::Delete, e))?;

        info!("{} deleted employee {}", caller.user_id, id);
        Ok(())
    }

    fn caller(&self, caller: &AuthUser, operation: Operation) -> Result<Role, DirectoryError> {
        caller_role(caller.role.as_deref()).inspect_err(|e| deny(caller, operation, e))
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn deny(caller: &AuthUser, operation: Operation, err: &DirectoryError) {
    warn!("Denied {} by {}: {}", operation, caller.user_id, err);
}

fn reject(caller: &AuthUser, operation: Operation, err: &DirectoryError) {
    match err {
        DirectoryError::Validation(failure) => {
            info!("Rejected {} by {}: {} ({})", operation, caller.user_id, failure, failure.code())
        }
        DirectoryError::Conflict(msg) => info!("Conflict on {} by {}: {}", operation, caller.user_id, msg),
        _ => {}
    }
}
