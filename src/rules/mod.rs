pub mod authorization;
pub mod error;
pub mod role;
pub mod validation;

pub use authorization::{authorize_create, authorize_delete, authorize_update, caller_role};
pub use error::{DirectoryError, ValidationFailure};
pub use role::Role;
pub use validation::{validate_draft, Subject};
