use chrono::Utc;
use serde_json::json;

use crate::api::format::{LoginRequest, LoginResponse};
use crate::cli::client::ApiClient;
use crate::cli::config::{clear_session, save_session, Session};
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;

pub async fn login(server: &str, email: &str, password: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = ApiClient::new(server, None)?;
    let request = LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
    };

    let response: LoginResponse = client.post(client.endpoint("/auth/login")?, &request).await?;

    save_session(&Session {
        server: server.to_string(),
        email: response.employee.email.clone(),
        token: response.token,
        saved_at: Utc::now(),
    })?;

    output_success(
        &output_format,
        &format!(
            "Logged in as {} {} ({})",
            response.employee.first_name, response.employee.last_name, response.employee.role
        ),
        Some(json!({
            "email": response.employee.email,
            "role": response.employee.role,
            "expires_in": response.expires_in,
        })),
    )
}

pub fn logout(output_format: OutputFormat) -> anyhow::Result<()> {
    let message = if clear_session()? {
        "Logged out"
    } else {
        "No stored session"
    };
    output_success(&output_format, message, None)
}
