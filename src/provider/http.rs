//! Remote JSON content provider.
//!
//! Requests `GET {base}/{slug}?page={cursor}&per_page={n}` and expects a
//! body of the form `{"items": [...], "next_cursor": n}`.

use std::time::Duration;

use async_trait::async_trait;

use super::{Catalog, ContentProvider, Cursor, Page};
use crate::error::ProviderError;

/// A provider backed by an HTTP endpoint.
pub struct HttpProvider {
    client: reqwest::Client,
    url: String,
    label: String,
    page_size: usize,
    timeout: Duration,
}

impl HttpProvider {
    /// Create a provider for one catalog under `base_url`.
    ///
    /// `timeout` bounds every request; it is reported back in
    /// [`ProviderError::Timeout`] when exceeded.
    pub fn new(
        base_url: &str,
        catalog: Catalog,
        page_size: usize,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            url: format!("{}/{}", base_url.trim_end_matches('/'), catalog.slug()),
            label: catalog.title().to_string(),
            page_size: page_size.max(1),
            timeout,
        })
    }

    /// Decode a response body into a [`Page`].
    ///
    /// Pure (no I/O) so the decoding rules can be tested directly.
    pub fn parse_page(body: &[u8]) -> Result<Page, ProviderError> {
        Ok(serde_json::from_slice(body)?)
    }
}

#[async_trait]
impl ContentProvider for HttpProvider {
    fn name(&self) -> &str {
        &self.label
    }

    async fn fetch_page(&self, cursor: Cursor) -> Result<Page, ProviderError> {
        let response = self
            .client
            .get(&self.url)
            .query(&[("page", cursor.0 as usize), ("per_page", self.page_size)])
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }

        let body = response.bytes().await.map_err(|e| self.classify(e))?;
        Self::parse_page(&body)
    }
}

impl HttpProvider {
    fn classify(&self, e: reqwest::Error) -> ProviderError {
        match ProviderError::from(e) {
            ProviderError::Timeout(_) => ProviderError::Timeout(self.timeout),
            other => other,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
