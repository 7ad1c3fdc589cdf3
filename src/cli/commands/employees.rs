use anyhow::Context;
use clap::Subcommand;
use serde_json::json;
use uuid::Uuid;

use crate::api::format::EmployeeDto;
use crate::cli::client::ApiClient;
use crate::cli::config::load_session;
use crate::cli::utils::{output_employee, output_employees, output_success};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum EmployeeCommands {
    #[command(about = "List employees, optionally filtered")]
    List {
        #[arg(long, help = "Substring of name, email or document number")]
        q: Option<String>,
    },

    #[command(about = "Show one employee")]
    Show {
        #[arg(help = "Employee id")]
        id: Uuid,
    },

    #[command(about = "Delete an employee")]
    Delete {
        #[arg(help = "Employee id")]
        id: Uuid,
        #[arg(long, help = "Fail unless the record is still at this version")]
        version: Option<i32>,
    },
}

pub async fn handle(cmd: EmployeeCommands, server: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    let session = load_session()?.context("not logged in; run `directory login <email>` first")?;
    let client = ApiClient::new(server, Some(session.token))?;

    match cmd {
        EmployeeCommands::List { q } => {
            let mut url = client.endpoint("/employees")?;
            if let Some(q) = q.as_deref().filter(|q| !q.trim().is_empty()) {
                url.query_pairs_mut().append_pair("q", q);
            }
            let employees: Vec<EmployeeDto> = client.get(url).await?;
            output_employees(&output_format, &employees)
        }
        EmployeeCommands::Show { id } => {
            let employee: EmployeeDto = client.get(client.endpoint(&format!("/employees/{}", id))?).await?;
            output_employee(&output_format, &employee)
        }
        EmployeeCommands::Delete { id, version } => {
            let mut url = client.endpoint(&format!("/employees/{}", id))?;
            if let Some(version) = version {
                url.query_pairs_mut().append_pair("version", &version.to_string());
            }
            client.delete(url).await?;
            output_success(&output_format, &format!("Deleted employee {}", id), Some(json!({ "id": id })))
        }
    }
}
