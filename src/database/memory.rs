use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::models::{Employee, NewEmployee};
use crate::database::repository::{EmployeeRepository, RepositoryError};
use crate::types::EmployeeDraft;

/// Process-local repository with the same transactional guarantees as the
/// Postgres one: every write is staged on a copy and swapped in only when it
/// fully succeeds.
#[derive(Default)]
pub struct InMemoryEmployeeRepository {
    employees: RwLock<HashMap<Uuid, Employee>>,
    fail_next_phone_write: AtomicBool,
    unavailable: AtomicBool,
}

impl InMemoryEmployeeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next phone-set write fail after the old set was removed and
    /// the first new number was inserted.
    pub fn fail_next_phone_write(&self) {
        self.fail_next_phone_write.store(true, Ordering::SeqCst);
    }

    /// Make `health_check` report the store as unreachable.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn stage_phones(&self, phones: &mut Vec<String>, numbers: &[String]) -> Result<(), RepositoryError> {
        phones.clear();
        for (i, number) in numbers.iter().enumerate() {
            if i > 0 && self.fail_next_phone_write.swap(false, Ordering::SeqCst) {
                return Err(RepositoryError::Storage(
                    "injected failure while inserting phones".to_string(),
                ));
            }
            phones.push(number.clone());
        }
        Ok(())
    }

    fn resolve(employees: &HashMap<Uuid, Employee>, employee: &Employee) -> Employee {
        let mut resolved = employee.clone();
        resolved.manager_name = employee
            .manager_id
            .and_then(|id| employees.get(&id))
            .map(Employee::display_name);
        resolved
    }

    fn matches(employee: &Employee, needle: &str) -> bool {
        [
            &employee.first_name,
            &employee.last_name,
            &employee.email,
            &employee.doc_number,
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
    }
}

#[async_trait]
impl EmployeeRepository for InMemoryEmployeeRepository {
    async fn list(&self, query: Option<&str>) -> Result<Vec<Employee>, RepositoryError> {
        let employees = self.employees.read().await;
        let needle = query.map(|q| q.trim().to_lowercase()).filter(|q| !q.is_empty());

        let mut found: Vec<Employee> = employees
            .values()
            .filter(|e| needle.as_deref().map_or(true, |n| Self::matches(e, n)))
            .map(|e| Self::resolve(&employees, e))
            .collect();
        found.sort_by(|a, b| {
            (&a.first_name, &a.last_name, a.id).cmp(&(&b.first_name, &b.last_name, b.id))
        });
        Ok(found)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Employee>, RepositoryError> {
        let employees = self.employees.read().await;
        Ok(employees.get(&id).map(|e| Self::resolve(&employees, e)))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Employee>, RepositoryError> {
        let employees = self.employees.read().await;
        Ok(employees
            .values()
            .filter(|e| e.email == email)
            .min_by_key(|e| (e.created_at, e.id))
            .map(|e| Self::resolve(&employees, e)))
    }

    async fn exists_by_document(
        &self,
        doc_number: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, RepositoryError> {
        let employees = self.employees.read().await;
        Ok(employees
            .values()
            .any(|e| e.doc_number == doc_number && Some(e.id) != exclude_id))
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        Ok(self.employees.read().await.len() as i64)
    }

    async fn create(&self, new: NewEmployee) -> Result<Employee, RepositoryError> {
        let mut employees = self.employees.write().await;

        if employees.values().any(|e| e.doc_number == new.doc_number) {
            return Err(RepositoryError::DuplicateDocument);
        }
        if let Some(manager_id) = new.manager_id {
            if !employees.contains_key(&manager_id) {
                return Err(RepositoryError::UnknownManager);
            }
        }

        let now = Utc::now();
        let mut employee = Employee {
            id: Uuid::new_v4(),
            first_name: new.first_name,
            last_name: new.last_name,
            email: new.email,
            doc_number: new.doc_number,
            date_of_birth: new.date_of_birth,
            role: new.role,
            manager_id: new.manager_id,
            manager_name: None,
            credentials: new.credentials,
            phones: Vec::new(),
            version: 1,
            created_at: now,
            updated_at: now,
        };
        self.stage_phones(&mut employee.phones, &new.phones)?;

        let resolved = Self::resolve(&employees, &employee);
        employees.insert(employee.id, employee);
        Ok(resolved)
    }

    async fn update(
        &self,
        id: Uuid,
        expected_version: i32,
        draft: &EmployeeDraft,
    ) -> Result<Employee, RepositoryError> {
        let mut employees = self.employees.write().await;

        let current = employees.get(&id).ok_or(RepositoryError::Conflict(id))?;
        if current.version != expected_version {
            return Err(RepositoryError::Conflict(id));
        }
        if employees
            .values()
            .any(|e| e.id != id && e.doc_number == draft.doc_number)
        {
            return Err(RepositoryError::DuplicateDocument);
        }

        if let Some(manager_id) = draft.manager_id {
            if !employees.contains_key(&manager_id) {
                return Err(RepositoryError::UnknownManager);
            }
        }

        let mut staged = current.clone();
        staged.first_name = draft.first_name.clone();
        staged.last_name = draft.last_name.clone();
        staged.email = draft.email.clone();
        staged.doc_number = draft.doc_number.clone();
        staged.date_of_birth = draft.date_of_birth;
        staged.role = draft.role;
        staged.manager_id = draft.manager_id;
        self.stage_phones(&mut staged.phones, &draft.normalized_phones())?;
        staged.version += 1;
        staged.updated_at = Utc::now();

        employees.insert(id, staged);
        let stored = &employees[&id];
        Ok(Self::resolve(&employees, stored))
    }

    async fn replace_phones(&self, id: Uuid, numbers: &[String]) -> Result<(), RepositoryError> {
        let mut employees = self.employees.write().await;

        let current = employees.get(&id).ok_or(RepositoryError::NotFound(id))?;
        let mut staged = current.clone();
        self.stage_phones(&mut staged.phones, numbers)?;
        staged.version += 1;
        staged.updated_at = Utc::now();

        employees.insert(id, staged);
        Ok(())
    }

    async fn delete(&self, id: Uuid, expected_version: i32) -> Result<(), RepositoryError> {
        let mut employees = self.employees.write().await;

        let current = employees.get(&id).ok_or(RepositoryError::Conflict(id))?;
        if current.version != expected_version {
            return Err(RepositoryError::Conflict(id));
        }
        if employees.values().any(|e| e.manager_id == Some(id)) {
            return Err(RepositoryError::ManagerInUse(id));
        }

        employees.remove(&id);
        Ok(())
    }

    async fn health_check(&self) -> Result<(), RepositoryError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(RepositoryError::Storage("store marked unavailable".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::repository::tests::{draft, new_employee};

    #[tokio::test]
    async fn create_assigns_identity_and_version() {
        let repo = InMemoryEmployeeRepository::new();
        let created = repo.create(new_employee("DOC-1")).await.unwrap();
        assert_eq!(created.version, 1);
        assert_eq!(created.phones.len(), 2);
        assert_eq!(repo.find_by_id(created.id).await.unwrap(), Some(created));
    }

    #[tokio::test]
    async fn duplicate_document_hits_the_unique_index() {
        let repo = InMemoryEmployeeRepository::new();
        repo.create(new_employee("DOC-1")).await.unwrap();
        let err = repo.create(new_employee("DOC-1")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::DuplicateDocument));
    }

    #[tokio::test]
    async fn stale_version_is_a_conflict() {
        let repo = InMemoryEmployeeRepository::new();
        let created = repo.create(new_employee("DOC-1")).await.unwrap();

        let updated = repo.update(created.id, 1, &draft("DOC-1")).await.unwrap();
        assert_eq!(updated.version, 2);

        let err = repo.update(created.id, 1, &draft("DOC-1")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(id) if id == created.id));
        let err = repo.delete(created.id, 1).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn update_after_concurrent_delete_is_a_conflict() {
        let repo = InMemoryEmployeeRepository::new();
        let created = repo.create(new_employee("DOC-1")).await.unwrap();
        repo.delete(created.id, created.version).await.unwrap();

        let err = repo.update(created.id, created.version, &draft("DOC-1")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
        let err = repo.delete(created.id, created.version).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn failed_phone_write_leaves_original_set() {
        let repo = InMemoryEmployeeRepository::new();
        let created = repo.create(new_employee("DOC-1")).await.unwrap();

        repo.fail_next_phone_write();
        let mut changed = draft("DOC-1");
        changed.first_name = "Changed".into();
        changed.phones = vec!["111".into(), "222".into(), "333".into()];
        let err = repo.update(created.id, 1, &changed).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Storage(_)));

        let after = repo.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(after.phones, created.phones);
        assert_eq!(after.first_name, created.first_name);
        assert_eq!(after.version, 1);

        repo.fail_next_phone_write();
        assert!(repo.replace_phones(created.id, &changed.phones).await.is_err());
        assert_eq!(repo.find_by_id(created.id).await.unwrap().unwrap().phones, created.phones);

        repo.replace_phones(created.id, &changed.phones).await.unwrap();
        assert_eq!(repo.find_by_id(created.id).await.unwrap().unwrap().phones, changed.phones);
    }

    #[tokio::test]
    async fn manager_cannot_be_deleted_while_referenced() {
        let repo = InMemoryEmployeeRepository::new();
        let manager = repo.create(new_employee("MGR-1")).await.unwrap();
        let mut report = new_employee("EMP-1");
        report.manager_id = Some(manager.id);
        let report = repo.create(report).await.unwrap();
        assert_eq!(report.manager_name.as_deref(), Some("Test Person"));

        let err = repo.delete(manager.id, manager.version).await.unwrap_err();
        assert!(matches!(err, RepositoryError::ManagerInUse(_)));

        repo.delete(report.id, report.version).await.unwrap();
        repo.delete(manager.id, manager.version).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn list_searches_case_insensitively() {
        let repo = InMemoryEmployeeRepository::new();
        repo.create(new_employee("ABC-1")).await.unwrap();
        repo.create(new_employee("XYZ-2")).await.unwrap();

        assert_eq!(repo.list(None).await.unwrap().len(), 2);
        assert_eq!(repo.list(Some("   ")).await.unwrap().len(), 2);
        let hits = repo.list(Some("abc")).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].doc_number, "ABC-1");
        assert!(repo.list(Some("nobody")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_emails_resolve_to_the_oldest_record() {
        let repo = InMemoryEmployeeRepository::new();
        let first = repo.create(new_employee("DOC-1")).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;

        let mut twin = new_employee("DOC-2");
        twin.email = first.email.clone();
        repo.create(twin).await.unwrap();

        for _ in 0..10 {
            let found = repo.find_by_email(&first.email).await.unwrap().unwrap();
            assert_eq!(found.id, first.id);
        }
    }

    #[tokio::test]
    async fn health_follows_availability_flag() {
        let repo = InMemoryEmployeeRepository::new();
        assert!(repo.health_check().await.is_ok());
        repo.set_unavailable(true);
        assert!(matches!(repo.health_check().await, Err(RepositoryError::Storage(_))));
        repo.set_unavailable(false);
        assert!(repo.health_check().await.is_ok());
    }
}
