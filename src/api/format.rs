use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::models::Employee;
use crate::rules::Role;
use crate::types::EmployeeDraft;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneDto {
    pub number: String,
}

/// Public wire format of an employee. Credential material never leaves the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDto {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub doc_number: String,
    pub date_of_birth: NaiveDate,
    pub role: Role,
    pub manager_id: Option<Uuid>,
    pub manager_name: Option<String>,
    pub phones: Vec<PhoneDto>,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Employee> for EmployeeDto {
    fn from(e: Employee) -> Self {
        Self {
            id: e.id,
            first_name: e.first_name,
            last_name: e.last_name,
            email: e.email,
            doc_number: e.doc_number,
            date_of_birth: e.date_of_birth,
            role: e.role,
            manager_id: e.manager_id,
            manager_name: e.manager_name,
            phones: e.phones.into_iter().map(|number| PhoneDto { number }).collect(),
            version: e.version,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

/// Body of `POST /employees`. Text fields default to empty so the business
/// rules, not the JSON decoder, report what is missing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeeRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub doc_number: String,
    pub date_of_birth: NaiveDate,
    pub role: Role,
    #[serde(default)]
    pub manager_id: Option<Uuid>,
    #[serde(default)]
    pub phones: Vec<String>,
    #[serde(default)]
    pub password: String,
}

impl CreateEmployeeRequest {
    /// Split into the rule-checked draft and the password.
    pub fn into_parts(self) -> (EmployeeDraft, String) {
        let draft = EmployeeDraft {
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            doc_number: self.doc_number,
            date_of_birth: self.date_of_birth,
            role: self.role,
            manager_id: normalize_manager(self.manager_id),
            phones: self.phones,
        };
        (draft, self.password)
    }
}

/// Body of `PUT /employees/:id`. `version` is the concurrency token the client read.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployeeRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub doc_number: String,
    pub date_of_birth: NaiveDate,
    pub role: Role,
    #[serde(default)]
    pub manager_id: Option<Uuid>,
    #[serde(default)]
    pub phones: Vec<String>,
    #[serde(default)]
    pub version: Option<i32>,
}

impl UpdateEmployeeRequest {
    pub fn into_parts(self) -> (EmployeeDraft, Option<i32>) {
        let draft = EmployeeDraft {
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            doc_number: self.doc_number,
            date_of_birth: self.date_of_birth,
            role: self.role,
            manager_id: normalize_manager(self.manager_id),
            phones: self.phones,
        };
        (draft, self.version)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListQuery {
    pub q: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteQuery {
    pub version: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub expires_in: u64,
    pub employee: EmployeeDto,
}

/// The all-zero id some clients send for "no manager" means exactly that.
pub fn normalize_manager(manager_id: Option<Uuid>) -> Option<Uuid> {
    manager_id.filter(|id| !id.is_nil())
}
