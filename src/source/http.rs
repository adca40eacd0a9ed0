//! Implements the `DataSource` trait by downloading the JSON feed with `reqwest`.

use crate::error::Res;
use crate::source::DataSource;
use anyhow::{bail, Context};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, trace};
use url::Url;

pub(crate) struct HttpSource {
    url: Url,
    client: reqwest::Client,
}

impl HttpSource {
    /// Creates a source that reads `url`. Every request gives up after `timeout`.
    pub(crate) fn new(url: &str, timeout: Duration) -> Res<Self> {
        let url = Url::parse(url).with_context(|| format!("Invalid source URL '{url}'"))?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("sales-report/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build the HTTP client")?;
        Ok(Self { url, client })
    }
}

#[async_trait::async_trait]
impl DataSource for HttpSource {
    async fn fetch(&self) -> Res<Vec<Value>> {
        debug!("Fetching {}", self.url);
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", self.url))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response body".to_string());
            bail!("Fetching {} failed with status {status}: {body}", self.url);
        }

        let items: Vec<Value> = response
            .json()
            .await
            .with_context(|| format!("The response from {} is not a JSON array", self.url))?;
        trace!("Fetched {} items", items.len());
        Ok(items)
    }
}
