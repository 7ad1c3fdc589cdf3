use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::rules::Role;

/// Salted password material. Opaque to the rule engine.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub hash: Vec<u8>,
    pub salt: Vec<u8>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credentials(..)")
    }
}

/// A persisted employee with its phone set and manager display name resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Employee {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub doc_number: String,
    pub date_of_birth: NaiveDate,
    pub role: Role,
    pub manager_id: Option<Uuid>,
    pub manager_name: Option<String>,
    pub credentials: Credentials,
    pub phones: Vec<String>,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Employee {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Everything needed to insert a new employee. Identity is assigned by the repository.
#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub doc_number: String,
    pub date_of_birth: NaiveDate,
    pub role: Role,
    pub manager_id: Option<Uuid>,
    pub credentials: Credentials,
    pub phones: Vec<String>,
}

/// Row shape of `employees` joined with the manager's name.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EmployeeRow {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub doc_number: String,
    pub date_of_birth: NaiveDate,
    pub role: i16,
    pub manager_id: Option<Uuid>,
    pub manager_first_name: Option<String>,
    pub manager_last_name: Option<String>,
    pub password_hash: Vec<u8>,
    pub password_salt: Vec<u8>,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PhoneRow {
    pub employee_id: Uuid,
    pub number: String,
}

impl EmployeeRow {
    /// Attach phones. Fails when the stored role rank is outside the hierarchy.
    pub fn into_employee(self, phones: Vec<String>) -> Result<Employee, String> {
        let role = Role::from_rank(self.role)
            .ok_or_else(|| format!("employee {} has invalid role rank {}", self.id, self.role))?;
        let manager_name = match (self.manager_first_name, self.manager_last_name) {
            (Some(first), Some(last)) => Some(format!("{} {}", first, last)),
            _ => None,
        };

        Ok(Employee {
            id: self.id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            doc_number: self.doc_number,
            date_of_birth: self.date_of_birth,
            role,
            manager_id: self.manager_id,
            manager_name,
            credentials: Credentials {
                hash: self.password_hash,
                salt: self.password_salt,
            },
            phones,
            version: self.version,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
