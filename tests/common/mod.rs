#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

use employee_directory_api::config::{AppConfig, Environment};
use employee_directory_api::database::{seed_demo_employees, InMemoryEmployeeRepository};
use employee_directory_api::{app, AppState};

pub const PASSWORD: &str = "P@ssw0rd!";
pub const DIRECTOR: &str = "director@demo.com";
pub const LEADER: &str = "leader@demo.com";
pub const EMPLOYEE: &str = "employee@demo.com";

/// In-process server over a freshly seeded in-memory directory
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub repository: Arc<InMemoryEmployeeRepository>,
    pub client: reqwest::Client,
}

impl TestServer {
    pub async fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let repository = Arc::new(InMemoryEmployeeRepository::new());
        seed_demo_employees(repository.as_ref()).await?;

        let mut config = AppConfig::for_environment(Environment::Development);
        config.api.enable_request_logging = false;
        let router = app(AppState::new(config, repository.clone()));

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test port")?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        let server = Self {
            port,
            base_url,
            repository,
            client: reqwest::Client::new(),
        };
        server.wait_ready(Duration::from_secs(5)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn login(&self, email: &str) -> Result<String> {
        let res = self
            .client
            .post(self.url("/auth/login"))
            .json(&json!({ "email": email, "password": PASSWORD }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "login failed: {}", res.status());
        let body: Value = res.json().await?;
        body["data"]["token"]
            .as_str()
            .map(str::to_string)
            .context("login response carried no token")
    }

    /// Employee record as the API returns it, looked up by document number
    pub async fn employee(&self, token: &str, doc_number: &str) -> Result<Value> {
        let res = self
            .client
            .get(self.url("/employees"))
            .query(&[("q", doc_number)])
            .bearer_auth(token)
            .send()
            .await?;
        let body: Value = res.json().await?;
        body["data"]
            .as_array()
            .and_then(|list| list.iter().find(|e| e["docNumber"] == doc_number))
            .cloned()
            .with_context(|| format!("no employee with document {}", doc_number))
    }
}

/// A valid create body; tweak fields per test
pub fn new_employee_body(doc_number: &str, role: &str) -> Value {
    json!({
        "firstName": "Nina",
        "lastName": "Novak",
        "email": format!("{}@demo.com", doc_number.to_lowercase()),
        "docNumber": doc_number,
        "dateOfBirth": "1992-03-04",
        "role": role,
        "managerId": null,
        "phones": ["+55 11 90000-0001", "+55 11 90000-0002"],
        "password": "Secret#1"
    })
}

/// PUT body carrying over every field of an existing record
pub fn update_body(existing: &Value) -> Value {
    let phones: Vec<Value> = existing["phones"]
        .as_array()
        .map(|p| p.iter().map(|n| n["number"].clone()).collect())
        .unwrap_or_default();
    json!({
        "firstName": existing["firstName"],
        "lastName": existing["lastName"],
        "email": existing["email"],
        "docNumber": existing["docNumber"],
        "dateOfBirth": existing["dateOfBirth"],
        "role": existing["role"],
        "managerId": existing["managerId"],
        "phones": phones,
    })
}
