/// Shared types used across the codebase

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::rules::Role;

/// Mutating operations governed by the authorization policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        };
        f.write_str(verb)
    }
}

/// Employee fields supplied by a caller on create/update.
///
/// `manager_id` is already normalized: `None` means "no manager". The transport
/// layer is responsible for mapping any empty-identity sentinel to `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub doc_number: String,
    pub date_of_birth: NaiveDate,
    pub role: Role,
    pub manager_id: Option<Uuid>,
    pub phones: Vec<String>,
}

impl EmployeeDraft {
    /// Copy with surrounding whitespace removed from the text fields.
    pub fn trimmed(mut self) -> Self {
        self.first_name = self.first_name.trim().to_string();
        self.last_name = self.last_name.trim().to_string();
        self.email = self.email.trim().to_string();
        self.doc_number = self.doc_number.trim().to_string();
        self
    }

    /// Trimmed, non-blank phone numbers in input order. Duplicates are kept.
    pub fn normalized_phones(&self) -> Vec<String> {
        self.phones
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect()
    }
}
