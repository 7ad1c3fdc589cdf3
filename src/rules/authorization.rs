//! Role-rank authorization for employee mutations.
//!
//! Pure decisions over the caller's role and the target record's current and
//! proposed roles. Credential verification happens before this point; the
//! policy only sees the role claim that the verified token carried.

use super::error::DirectoryError;
use super::role::Role;
use crate::types::Operation;

/// Resolve the caller's role from its token claim.
/// An absent or unrecognized claim never authorizes a mutation.
pub fn caller_role(claim: Option<&str>) -> Result<Role, DirectoryError> {
    let claim = claim
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| DirectoryError::Unauthenticated("Credential carries no role claim".to_string()))?;

    Role::from_claim(claim).ok_or_else(|| {
        DirectoryError::Unauthenticated(format!("Unrecognized role claim '{}'", claim))
    })
}

pub fn authorize_create(caller: Role, target: Role) -> Result<(), DirectoryError> {
    require_rank(Operation::Create, caller, target)
}

/// The caller must outrank (or equal) both the record's current role and the requested one.
pub fn authorize_update(caller: Role, existing: Role, requested: Role) -> Result<(), DirectoryError> {
    require_rank(Operation::Update, caller, existing)?;
    require_rank(Operation::Update, caller, requested)
}

pub fn authorize_delete(caller: Role, existing: Role) -> Result<(), DirectoryError> {
    require_rank(Operation::Delete, caller, existing)
}

fn require_rank(operation: Operation, caller: Role, target: Role) -> Result<(), DirectoryError> {
    if caller.can_act_on(target) {
        Ok(())
    } else {
        Err(DirectoryError::Forbidden(format!(
            "A {} cannot {} an employee with role {}",
            caller, operation, target
        )))
    }
}
