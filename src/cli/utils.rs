use serde_json::{json, Value};

use crate::api::format::EmployeeDto;
use crate::cli::OutputFormat;

/// Output a success message in the appropriate format
pub fn output_success(output_format: &OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(Value::Object(extra)), Some(obj)) = (data, response.as_object_mut()) {
                obj.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(output_format: &OutputFormat, message: &str) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let response = json!({
                "success": false,
                "error": message
            });
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

pub fn output_employees(output_format: &OutputFormat, employees: &[EmployeeDto]) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(employees)?),
        OutputFormat::Text => {
            if employees.is_empty() {
                println!("No employees found");
                return Ok(());
            }
            println!("{:<36}  {:<24}  {:<28}  {:<10}  {}", "ID", "NAME", "EMAIL", "ROLE", "MANAGER");
            for e in employees {
                println!("{}", employee_row(e));
            }
        }
    }
    Ok(())
}

pub fn output_employee(output_format: &OutputFormat, employee: &EmployeeDto) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(employee)?),
        OutputFormat::Text => {
            println!("{} {} ({})", employee.first_name, employee.last_name, employee.role);
            println!("  id:        {}", employee.id);
            println!("  email:     {}", employee.email);
            println!("  document:  {}", employee.doc_number);
            println!("  born:      {}", employee.date_of_birth);
            println!("  manager:   {}", employee.manager_name.as_deref().unwrap_or("-"));
            let phones: Vec<&str> = employee.phones.iter().map(|p| p.number.as_str()).collect();
            println!("  phones:    {}", phones.join(", "));
            println!("  version:   {}", employee.version);
        }
    }
    Ok(())
}

fn employee_row(e: &EmployeeDto) -> String {
    format!(
        "{:<36}  {:<24}  {:<28}  {:<10}  {}",
        e.id,
        format!("{} {}", e.first_name, e.last_name),
        e.email,
        e.role.as_str(),
        e.manager_name.as_deref().unwrap_or("-")
    )
}
