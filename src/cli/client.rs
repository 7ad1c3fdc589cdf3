use anyhow::{anyhow, Context};
use reqwest::{Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use url::Url;

/// Thin JSON client for the directory HTTP API
pub struct ApiClient {
    base: Url,
    token: Option<String>,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(server: &str, token: Option<String>) -> anyhow::Result<Self> {
        let base = Url::parse(server).with_context(|| format!("invalid server URL '{}'", server))?;
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;
        Ok(Self { base, token, http })
    }

    pub fn endpoint(&self, path: &str) -> anyhow::Result<Url> {
        self.base
            .join(path)
            .with_context(|| format!("invalid endpoint path '{}'", path))
    }

    pub async fn get<T: DeserializeOwned>(&self, url: Url) -> anyhow::Result<T> {
        self.send(Method::GET, url, None::<&()>).await
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(&self, url: Url, body: &B) -> anyhow::Result<T> {
        self.send(Method::POST, url, Some(body)).await
    }

    pub async fn delete(&self, url: Url) -> anyhow::Result<()> {
        self.send::<(), Value>(Method::DELETE, url, None).await.map(|_| ())
    }

    /// Unwrap the `{success, data}` envelope, or turn the error body into an error.
    async fn send<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> anyhow::Result<T> {
        let mut request = self.http.request(method, url.clone());
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("request to {} failed", url))?;
        let status = response.status();

        if status == StatusCode::NO_CONTENT {
            return serde_json::from_value(Value::Null).context("unexpected empty response");
        }

        let payload: Value = response.json().await.unwrap_or(Value::Null);
        if !status.is_success() {
            return Err(anyhow!(error_message(status, &payload)));
        }

        let data = payload.get("data").cloned().unwrap_or(Value::Null);
        serde_json::from_value(data).context("unexpected response shape")
    }
}

fn error_message(status: StatusCode, payload: &Value) -> String {
    let message = payload
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("request failed");
    match payload.get("code").and_then(Value::as_str) {
        Some(code) => format!("{} ({}, HTTP {})", message, code, status.as_u16()),
        None => format!("{} (HTTP {})", message, status.as_u16()),
    }
}
