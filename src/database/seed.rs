use anyhow::Context;
use chrono::NaiveDate;
use tracing::info;
use uuid::Uuid;

use crate::auth::hash_password;
use crate::database::models::NewEmployee;
use crate::database::repository::EmployeeRepository;
use crate::rules::Role;

pub const DEMO_PASSWORD: &str = "P@ssw0rd!";
const DEMO_PHONES: [&str; 2] = ["+55 11 99999-0001", "+55 11 98888-0001"];

struct DemoEmployee {
    first_name: &'static str,
    last_name: &'static str,
    email: &'static str,
    doc_number: &'static str,
    date_of_birth: (i32, u32, u32),
    role: Role,
}

// Managers first so each entry can point at the previous one.
const DEMO_EMPLOYEES: [DemoEmployee; 3] = [
    DemoEmployee {
        first_name: "Diana",
        last_name: "Director",
        email: "director@demo.com",
        doc_number: "DIR-001",
        date_of_birth: (1985, 8, 15),
        role: Role::Director,
    },
    DemoEmployee {
        first_name: "Liam",
        last_name: "Leader",
        email: "leader@demo.com",
        doc_number: "LED-001",
        date_of_birth: (1990, 5, 20),
        role: Role::Leader,
    },
    DemoEmployee {
        first_name: "Erica",
        last_name: "Employee",
        email: "employee@demo.com",
        doc_number: "EMP-001",
        date_of_birth: (1995, 1, 10),
        role: Role::Employee,
    },
];

/// Insert the director -> leader -> employee chain when the directory is empty.
/// Returns how many employees were created.
pub async fn seed_demo_employees(repository: &dyn EmployeeRepository) -> anyhow::Result<usize> {
    if repository.count().await? > 0 {
        info!("Employees already present, skipping seed");
        return Ok(0);
    }

    let mut manager_id: Option<Uuid> = None;
    for demo in &DEMO_EMPLOYEES {
        let (y, m, d) = demo.date_of_birth;
        let date_of_birth = NaiveDate::from_ymd_opt(y, m, d)
            .with_context(|| format!("invalid seed birth date for {}", demo.doc_number))?;

        let created = repository
            .create(NewEmployee {
                first_name: demo.first_name.to_string(),
                last_name: demo.last_name.to_string(),
                email: demo.email.to_string(),
                doc_number: demo.doc_number.to_string(),
                date_of_birth,
                role: demo.role,
                manager_id,
                credentials: hash_password(DEMO_PASSWORD),
                phones: DEMO_PHONES.iter().map(|p| p.to_string()).collect(),
            })
            .await
            .with_context(|| format!("failed to seed {}", demo.doc_number))?;

        info!("Seeded {} ({})", created.display_name(), created.role);
        manager_id = Some(created.id);
    }

    Ok(DEMO_EMPLOYEES.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::verify_password;
    use crate::database::memory::InMemoryEmployeeRepository;

    #[tokio::test]
    async fn seeds_manager_chain_once() {
        let repo = InMemoryEmployeeRepository::new();
        assert_eq!(seed_demo_employees(&repo).await.unwrap(), 3);
        assert_eq!(seed_demo_employees(&repo).await.unwrap(), 0);

        let erica = repo.find_by_email("employee@demo.com").await.unwrap().unwrap();
        let liam = repo.find_by_email("leader@demo.com").await.unwrap().unwrap();
        let diana = repo.find_by_email("director@demo.com").await.unwrap().unwrap();

        assert_eq!(erica.manager_id, Some(liam.id));
        assert_eq!(liam.manager_id, Some(diana.id));
        assert_eq!(diana.manager_id, None);
        assert_eq!(erica.manager_name.as_deref(), Some("Liam Leader"));
        assert_eq!(erica.phones.len(), 2);
        assert!(verify_password(DEMO_PASSWORD, &diana.credentials));
    }
}
