//! Business-rule checks applied before any employee mutation.
//!
//! Checks run in a fixed order and stop at the first failure:
//! required fields and their widths, age, phone count and widths, document
//! uniqueness, self-manager (updates only), manager existence.

use chrono::{Datelike, Months, NaiveDate};
use uuid::Uuid;

use super::error::{DirectoryError, ValidationFailure};
use crate::database::repository::EmployeeRepository;
use crate::types::EmployeeDraft;

pub const MINIMUM_AGE: i32 = 18;
pub const MINIMUM_PHONES: usize = 2;

// Column widths of the employees and phones tables.
pub const MAX_NAME_LEN: usize = 100;
pub const MAX_EMAIL_LEN: usize = 200;
pub const MAX_DOC_NUMBER_LEN: usize = 50;
pub const MAX_PHONE_LEN: usize = 30;

/// Which record a draft is validated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject {
    New,
    Existing(Uuid),
}

impl Subject {
    fn id(self) -> Option<Uuid> {
        match self {
            Subject::New => None,
            Subject::Existing(id) => Some(id),
        }
    }
}

/// Whole years between `date_of_birth` and `today`, by calendar-year
/// subtraction corrected when this year's birthday is still ahead.
/// A 29 February birthday falls on 28 February in common years.
pub fn age_on(date_of_birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - date_of_birth.year();
    if age <= 0 {
        return age;
    }
    let birthday = date_of_birth.checked_add_months(Months::new(age as u32 * 12));
    if birthday.map_or(true, |b| b > today) {
        age -= 1;
    }
    age
}

pub fn check_age(date_of_birth: NaiveDate, today: NaiveDate) -> Result<(), ValidationFailure> {
    if age_on(date_of_birth, today) < MINIMUM_AGE {
        return Err(ValidationFailure::Underage);
    }
    Ok(())
}

/// Counts non-blank entries as supplied; duplicates count individually.
pub fn check_phone_count(phones: &[String]) -> Result<(), ValidationFailure> {
    let present = phones.iter().filter(|p| !p.trim().is_empty()).count();
    if present < MINIMUM_PHONES {
        return Err(ValidationFailure::TooFewPhones);
    }
    Ok(())
}

pub fn check_phone_lengths(phones: &[String]) -> Result<(), ValidationFailure> {
    if phones.iter().any(|p| p.trim().chars().count() > MAX_PHONE_LEN) {
        return Err(ValidationFailure::InvalidInput {
            field: "phones",
            message: format!("Phone numbers must be at most {} characters.", MAX_PHONE_LEN),
        });
    }
    Ok(())
}

pub fn check_not_self_manager(subject: Subject, manager_id: Option<Uuid>) -> Result<(), ValidationFailure> {
    match (subject.id(), manager_id) {
        (Some(id), Some(manager)) if id == manager => Err(ValidationFailure::SelfManager),
        _ => Ok(()),
    }
}

pub fn check_required_fields(draft: &EmployeeDraft) -> Result<(), ValidationFailure> {
    let required = [
        ("firstName", &draft.first_name, MAX_NAME_LEN),
        ("lastName", &draft.last_name, MAX_NAME_LEN),
        ("email", &draft.email, MAX_EMAIL_LEN),
        ("docNumber", &draft.doc_number, MAX_DOC_NUMBER_LEN),
    ];
    for (field, value, max) in required {
        let value = value.trim();
        if value.is_empty() {
            return Err(ValidationFailure::InvalidInput {
                field,
                message: format!("{} is required.", field),
            });
        }
        if value.chars().count() > max {
            return Err(ValidationFailure::InvalidInput {
                field,
                message: format!("{} must be at most {} characters.", field, max),
            });
        }
    }
    validate_email_format(&draft.email).map_err(|message| ValidationFailure::InvalidInput {
        field: "email",
        message,
    })
}

pub fn check_password(password: &str) -> Result<(), ValidationFailure> {
    if password.trim().is_empty() {
        return Err(ValidationFailure::InvalidInput {
            field: "password",
            message: "password is required.".to_string(),
        });
    }
    Ok(())
}

fn validate_email_format(email: &str) -> Result<(), String> {
    let parts: Vec<&str> = email.trim().split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() || !parts[1].contains('.') {
        return Err("email is not a valid address.".to_string());
    }
    Ok(())
}

/// Run every rule against `draft`, reporting the first failure.
pub async fn validate_draft(
    repository: &dyn EmployeeRepository,
    draft: &EmployeeDraft,
    subject: Subject,
    today: NaiveDate,
) -> Result<(), DirectoryError> {
    check_required_fields(draft)?;
    check_age(draft.date_of_birth, today)?;
    check_phone_count(&draft.phones)?;
    check_phone_lengths(&draft.phones)?;

    if repository
        .exists_by_document(draft.doc_number.trim(), subject.id())
        .await?
    {
        return Err(ValidationFailure::DuplicateDocument.into());
    }

    check_not_self_manager(subject, draft.manager_id)?;

    if let Some(manager_id) = draft.manager_id {
        if repository.find_by_id(manager_id).await?.is_none() {
            return Err(ValidationFailure::UnknownManager.into());
        }
    }

    Ok(())
}
