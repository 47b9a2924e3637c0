//! HTTP client for the Databricks workspace REST API.
//!
//! All requests go through a single [`WorkspaceClient::request`] funnel that
//! attaches bearer auth, serializes optional bodies and classifies
//! non-success responses into [`Error`] variants.
//!
//! # Usage
//!
//! ```rust,no_run
//! use dbx_core::{Config, Result, WorkspaceClient};
//!
//! async fn list() -> Result<()> {
//!     let config = Config::from_env()?;
//!     let client = WorkspaceClient::new(config)?;
//!     let clusters = client.list_clusters().await?;
//!     Ok(())
//! }
//! ```

mod catalog;
mod compute;
mod dashboards;
mod mlflow;
mod security;
mod sql;
mod workspace;

use crate::config::Config;
use crate::error::{Error, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

/// Client for a single Databricks workspace.
///
/// The workspace host, token and default SQL warehouse are injected at
/// construction; nothing is read from the environment after that.
#[derive(Clone)]
pub struct WorkspaceClient {
    config: Config,
    client: reqwest::Client,
}

/// Error body shape returned by most Databricks APIs.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error_code: Option<String>,
    message: Option<String>,
}

impl WorkspaceClient {
    /// Create a client from a validated [`Config`].
    pub fn new(config: Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(Error::Http)?;
        Ok(Self { config, client })
    }

    /// The configured default SQL warehouse, if any.
    pub fn default_warehouse(&self) -> Option<&str> {
        self.config.warehouse_id.as_deref()
    }

    /// Workspace host this client talks to.
    pub fn host(&self) -> &str {
        &self.config.host
    }

    // ─────────────────────────────────────────────────────────────────────────
    // HTTP Helpers
    // ─────────────────────────────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request(reqwest::Method::GET, path, None, Option::<&()>::None)
            .await
    }

    pub(crate) async fn get_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        self.request(reqwest::Method::GET, path, Some(query), Option::<&()>::None)
            .await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.request(reqwest::Method::POST, path, None, Some(body))
            .await
    }

    pub(crate) async fn patch<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.request(reqwest::Method::PATCH, path, None, Some(body))
            .await
    }

    pub(crate) async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.request(reqwest::Method::PUT, path, None, Some(body))
            .await
    }

    pub(crate) async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request(reqwest::Method::DELETE, path, None, Option::<&()>::None)
            .await
    }

    pub(crate) async fn delete_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        self.request(
            reqwest::Method::DELETE,
            path,
            Some(query),
            Option::<&()>::None,
        )
        .await
    }

    async fn request<T: DeserializeOwned, B: Serialize>(
        &self,
        method: reqwest::Method,
        path: &str,
        query: Option<&[(&str, String)]>,
        body: Option<&B>,
    ) -> Result<T> {
        let url = format!("{}{}", self.config.host, path);
        debug!("API request: {} {}", method, url);

        let mut req = self
            .client
            .request(method, &url)
            .header("Authorization", format!("Bearer {}", self.config.token));

        if let Some(q) = query {
            req = req.query(q);
        }
        if let Some(b) = body {
            req = req.json(b);
        }

        let resp = req.send().await?;
        let status = resp.status();
        if status.is_success() {
            // Several endpoints (delete, pin, workspace-conf PATCH) return an
            // empty body on success; treat that as an empty JSON object.
            let text = resp.text().await?;
            let data: T = if text.trim().is_empty() {
                serde_json::from_value(serde_json::Value::Object(Default::default()))?
            } else {
                serde_json::from_str(&text)?
            };
            Ok(data)
        } else {
            let text = resp.text().await.unwrap_or_default();
            let parsed: Option<ApiErrorBody> = serde_json::from_str(&text).ok();
            let (error_code, message) = match parsed {
                Some(b) => (b.error_code, b.message.unwrap_or(text)),
                None => (None, text),
            };
            Err(Error::from_response(
                status.as_u16(),
                path,
                error_code,
                message,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config::new(
            "https://example.cloud.databricks.com".into(),
            "dapi-test".into(),
            Some("wh-1".into()),
        )
        .unwrap()
    }

    #[test]
    fn client_exposes_injected_warehouse() {
        let client = WorkspaceClient::new(test_config()).unwrap();
        assert_eq!(client.default_warehouse(), Some("wh-1"));
        assert_eq!(client.host(), "https://example.cloud.databricks.com");
    }

    #[test]
    fn error_body_parses_databricks_shape() {
        let body: ApiErrorBody = serde_json::from_str(
            r#"{"error_code": "RESOURCE_DOES_NOT_EXIST", "message": "no such cluster"}"#,
        )
        .unwrap();
        assert_eq!(body.error_code.as_deref(), Some("RESOURCE_DOES_NOT_EXIST"));
        assert_eq!(body.message.as_deref(), Some("no such cluster"));
    }
}
