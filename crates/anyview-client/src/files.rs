//! File icon resolution through a space's gateway.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use anyview_core::{defaults, Error, FileResolver, Result};

/// Resolves uploaded file ids to gateway image URLs.
///
/// A URL is only handed out after the gateway answered it successfully, so
/// a dead gateway or missing file falls back to the default glyph.
#[derive(Debug, Clone)]
pub struct GatewayFileResolver {
    client: Client,
    gateway_url: String,
    width: u32,
}

impl GatewayFileResolver {
    pub fn new(gateway_url: impl Into<String>, width: u32) -> Result<Self> {
        let gateway_url = gateway_url.into().trim_end_matches('/').to_string();
        if gateway_url.is_empty() {
            return Err(Error::Config("gateway_url cannot be empty".to_string()));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(defaults::REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            gateway_url,
            width,
        })
    }

    pub fn image_url(&self, file_id: &str) -> String {
        format!("{}/image/{}?width={}", self.gateway_url, file_id, self.width)
    }
}

#[async_trait]
impl FileResolver for GatewayFileResolver {
    async fn resolve_file(&self, file_id: &str) -> Result<String> {
        let url = self.image_url(file_id);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::IconResolution(format!("{}: {}", file_id, e)))?;
        if !response.status().is_success() {
            return Err(Error::IconResolution(format!(
                "{}: gateway returned {}",
                file_id,
                response.status()
            )));
        }
        debug!(component = "files", file_id, "Resolved file icon");
        Ok(url)
    }
}
