//! Workspace configuration.
//!
//! Credentials are resolved from the environment exactly once at startup and
//! injected into the client; nothing below this layer touches `std::env`.

use crate::error::{Error, Result};

/// Workspace connection configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Workspace base URL, e.g. `https://adb-1234.5.azuredatabricks.net`
    pub host: String,
    /// Personal access token or service principal token
    pub token: String,
    /// Default SQL warehouse for statement execution (optional)
    pub warehouse_id: Option<String>,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// Reads `DATABRICKS_HOST`, `DATABRICKS_TOKEN` and the optional
    /// `DATABRICKS_SQL_WAREHOUSE_ID`.
    pub fn from_env() -> Result<Self> {
        let host = std::env::var("DATABRICKS_HOST")
            .map_err(|_| Error::Config("DATABRICKS_HOST is not set".into()))?;
        let token = std::env::var("DATABRICKS_TOKEN")
            .map_err(|_| Error::Config("DATABRICKS_TOKEN is not set".into()))?;
        let warehouse_id = std::env::var("DATABRICKS_SQL_WAREHOUSE_ID")
            .ok()
            .filter(|v| !v.trim().is_empty());

        Self::new(host, token, warehouse_id)
    }

    /// Build a configuration from explicit values, normalizing the host URL.
    pub fn new(host: String, token: String, warehouse_id: Option<String>) -> Result<Self> {
        let host = host.trim().trim_end_matches('/').to_string();
        if host.is_empty() {
            return Err(Error::Config("workspace host is empty".into()));
        }
        if !host.starts_with("http://") && !host.starts_with("https://") {
            return Err(Error::Config(format!(
                "workspace host must be an http(s) URL, got '{host}'"
            )));
        }
        if token.trim().is_empty() {
            return Err(Error::Config("workspace token is empty".into()));
        }

        Ok(Self {
            host,
            token,
            warehouse_id,
        })
    }

    /// Whether a default SQL warehouse is configured.
    pub fn has_warehouse(&self) -> bool {
        self.warehouse_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_stripped() {
        let cfg = Config::new(
            "https://adb-1.2.azuredatabricks.net/".into(),
            "dapi123".into(),
            None,
        )
        .unwrap();
        assert_eq!(cfg.host, "https://adb-1.2.azuredatabricks.net");
    }

    #[test]
    fn rejects_missing_scheme() {
        let err = Config::new("adb-1.2.azuredatabricks.net".into(), "dapi123".into(), None)
            .unwrap_err();
        assert!(err.to_string().contains("http(s)"));
    }

    #[test]
    fn rejects_empty_token() {
        let err = Config::new("https://example.com".into(), "  ".into(), None).unwrap_err();
        assert!(err.to_string().contains("token"));
    }

    #[test]
    fn warehouse_is_optional() {
        let cfg = Config::new(
            "https://example.com".into(),
            "dapi123".into(),
            Some("abc123".into()),
        )
        .unwrap();
        assert!(cfg.has_warehouse());
    }
}
