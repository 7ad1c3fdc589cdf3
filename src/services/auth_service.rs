use std::sync::Arc;

use tracing::{info, warn};

use crate::auth::{generate_jwt, verify_password};
use crate::config::SecurityConfig;
use crate::database::models::Employee;
use crate::database::repository::EmployeeRepository;
use crate::rules::DirectoryError;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Credential check and token issuance.
#[derive(Clone)]
pub struct AuthService {
    repository: Arc<dyn EmployeeRepository>,
    security: SecurityConfig,
}

impl AuthService {
    pub fn new(repository: Arc<dyn EmployeeRepository>, security: SecurityConfig) -> Self {
        Self { repository, security }
    }

    /// Unknown email and wrong password are indistinguishable to the caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<(String, Employee), DirectoryError> {
        let email = email.trim();
        let Some(employee) = self.repository.find_by_email(email).await? else {
            warn!("Login failed for unknown email {}", email);
            return Err(DirectoryError::Unauthenticated(INVALID_CREDENTIALS.to_string()));
        };

        if !verify_password(password, &employee.credentials) {
            warn!("Login failed for {}: wrong password", employee.id);
            return Err(DirectoryError::Unauthenticated(INVALID_CREDENTIALS.to_string()));
        }

        let token = generate_jwt(&self.security, &employee).map_err(|e| {
            tracing::error!("Token issuance failed: {}", e);
            DirectoryError::Internal("An error occurred while processing your request".to_string())
        })?;

        info!("{} logged in as {}", employee.id, employee.role);
        Ok((token, employee))
    }
}
