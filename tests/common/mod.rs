#![allow(dead_code)]

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

use bucketlist_api::auth::TokenService;
use bucketlist_api::config::AppConfig;
use bucketlist_api::database::DatabaseManager;
use bucketlist_api::{app, AppState};

pub const JWT_SECRET: &str = "integration-test-secret";

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub client: reqwest::Client,
}

impl TestServer {
    /// Serve a fresh app on an unused port, backed by its own in-memory database.
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with(&[]).await
    }

    pub async fn spawn_with(extra: &[(&str, &str)]) -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut vars = vec![
            ("JWT_SECRET".to_string(), JWT_SECRET.to_string()),
            ("DATABASE_URL".to_string(), "sqlite::memory:".to_string()),
        ];
        vars.extend(extra.iter().map(|(k, v)| (k.to_string(), v.to_string())));
        let config = AppConfig::from_vars(|key| {
            vars.iter().rev().find(|(k, _)| k == key).map(|(_, v)| v.clone())
        })?;

        let pool = DatabaseManager::connect(&config.database).await?;
        let state = AppState::new(config, pool);

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .with_context(|| format!("failed to bind {}", base_url))?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app(state)).await;
        });

        let server = Self {
            port,
            base_url,
            client: reqwest::Client::new(),
        };
        server.wait_ready(Duration::from_secs(10)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
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

    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<reqwest::Response> {
        Ok(self
            .client
            .post(self.url("/auth/register"))
            .json(&json!({ "username": username, "email": email, "password": password }))
            .send()
            .await?)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<reqwest::Response> {
        Ok(self
            .client
            .post(self.url("/auth/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?)
    }

    /// Register and log in `name`, returning the access token.
    pub async fn user_token(&self, name: &str) -> Result<String> {
        let email = format!("{}@example.com", name);
        let res = self.register(name, &email, "password123").await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "register failed: {}", res.status());

        let res = self.login(&email, "password123").await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "login failed: {}", res.status());
        let body: Value = res.json().await?;
        body["access_token"]
            .as_str()
            .map(str::to_string)
            .context("login response has no access_token")
    }

    pub async fn get(&self, path: &str, token: &str) -> Result<(StatusCode, Value)> {
        let res = self.client.get(self.url(path)).header("Authorization", token).send().await?;
        read(res).await
    }

    pub async fn post(&self, path: &str, token: &str, body: Value) -> Result<(StatusCode, Value)> {
        let res = self
            .client
            .post(self.url(path))
            .header("Authorization", token)
            .json(&body)
            .send()
            .await?;
        read(res).await
    }

    pub async fn put(&self, path: &str, token: &str, body: Value) -> Result<(StatusCode, Value)> {
        let res = self
            .client
            .put(self.url(path))
            .header("Authorization", token)
            .json(&body)
            .send()
            .await?;
        read(res).await
    }

    pub async fn delete(&self, path: &str, token: &str) -> Result<(StatusCode, Value)> {
        let res = self.client.delete(self.url(path)).header("Authorization", token).send().await?;
        read(res).await
    }

    /// Create a bucketlist and return its id.
    pub async fn bucketlist(&self, token: &str, name: &str) -> Result<i64> {
        let (status, body) = self.post("/bucketlists/", token, json!({ "name": name })).await?;
        anyhow::ensure!(status == StatusCode::CREATED, "create bucketlist failed: {} {}", status, body);
        body["id"].as_i64().context("bucketlist has no id")
    }

    /// Create an item and return its id.
    pub async fn item(&self, token: &str, bucketlist_id: i64, name: &str) -> Result<i64> {
        let path = format!("/bucketlists/{}/items", bucketlist_id);
        let (status, body) = self.post(&path, token, json!({ "name": name })).await?;
        anyhow::ensure!(status == StatusCode::CREATED, "create item failed: {} {}", status, body);
        body["id"].as_i64().context("item has no id")
    }
}

/// A token signed with the server's secret, for crafting expired credentials.
pub fn token_service() -> TokenService {
    TokenService::new(JWT_SECRET, 3600)
}

async fn read(res: reqwest::Response) -> Result<(StatusCode, Value)> {
    let status = res.status();
    let body = res.json::<Value>().await?;
    Ok((status, body))
}
