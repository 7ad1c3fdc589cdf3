use thiserror::Error;

/// Business-rule rejections. Each carries a stable message and the request field it refers to.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationFailure {
    #[error("Employee must be at least 18 years old.")]
    Underage,

    #[error("Employee must have at least 2 phone numbers.")]
    TooFewPhones,

    #[error("DocNumber already exists.")]
    DuplicateDocument,

    #[error("An employee cannot be their own manager.")]
    SelfManager,

    #[error("Manager not found.")]
    UnknownManager,

    #[error("{message}")]
    InvalidInput { field: &'static str, message: String },
}

impl ValidationFailure {
    pub fn field(&self) -> &'static str {
        match self {
            ValidationFailure::Underage => "dateOfBirth",
            ValidationFailure::TooFewPhones => "phones",
            ValidationFailure::DuplicateDocument => "docNumber",
            ValidationFailure::SelfManager | ValidationFailure::UnknownManager => "managerId",
            ValidationFailure::InvalidInput { field, .. } => field,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ValidationFailure::Underage => "UNDERAGE",
            ValidationFailure::TooFewPhones => "TOO_FEW_PHONES",
            ValidationFailure::DuplicateDocument => "DUPLICATE_DOCUMENT",
            ValidationFailure::SelfManager => "SELF_MANAGER",
            ValidationFailure::UnknownManager => "UNKNOWN_MANAGER",
            ValidationFailure::InvalidInput { .. } => "INVALID_INPUT",
        }
    }
}

/// Outcome taxonomy of the directory core. Every variant maps to a distinct transport status.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationFailure),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal failure: {0}")]
    Internal(String),
}
