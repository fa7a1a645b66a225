#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::{json, Value};
use sirius_user_management::config::{AppConfig, Environment};
use sirius_user_management::server;
use sirius_user_management::sirius::Client;
use sirius_user_management::templates::PageShell;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// The app served on an ephemeral port, talking to a mock platform.
pub struct TestServer {
    pub base_url: String,
    pub platform: MockServer,
}

impl TestServer {
    pub async fn spawn() -> Result<Self> {
        let platform = MockServer::start().await;

        let mut config = AppConfig::for_environment(Environment::Development);
        config.sirius.url = platform.uri();
        config.sirius.public_url = "http://sirius.example".to_string();

        let client = Client::from_config(&config.sirius).context("failed to build client")?;
        let app = server::app(Arc::new(client), Arc::new(PageShell), &config);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .context("failed to bind test listener")?;
        let base_url = format!("http://{}", listener.local_addr()?);

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Ok(Self { base_url, platform })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Answer the current-user lookup with a caller holding `roles`.
    pub async fn signed_in_as(&self, roles: &[&str]) {
        Mock::given(method("GET"))
            .and(path("/api/v1/users/current"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 1,
                "displayName": "Test Admin",
                "email": "admin@opgtest.com",
                "roles": roles,
            })))
            .mount(&self.platform)
            .await;
    }
}

/// A browser-like client that leaves redirects for the test to inspect.
pub fn browser() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("failed to build test client")
}

/// The view model embedded in a rendered page.
pub fn view_model(html: &str) -> Result<Value> {
    let start = html
        .find("id=\"view-model\">")
        .context("page has no view model")?
        + "id=\"view-model\">".len();
    let end = html[start..]
        .find("</script>")
        .context("unterminated view model")?;
    Ok(serde_json::from_str(&html[start..start + end])?)
}
