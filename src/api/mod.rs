pub mod auth;
pub mod lookup;

use std::time::Duration;

use anyhow::{Context, Result};

/// HTTP client for the inventory service. One instance is built at
/// startup and shared across the auth flow and the lookup screen.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("macquery/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(ApiClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_stripped_from_base_url() {
        let client = ApiClient::new("http://localhost:5000/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.url("/api/check-mac"), "http://localhost:5000/api/check-mac");
    }

    #[test]
    fn test_bare_base_url_joined() {
        let client = ApiClient::new("http://localhost:5000", Duration::from_secs(5)).unwrap();
        assert_eq!(client.url("/authenticate"), "http://localhost:5000/authenticate");
    }
}
