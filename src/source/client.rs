//! HTTP client for the endoflife.date v1 API.

use super::{CatalogSource, ProductRecord, ProductsResponse};
use crate::error::{EolScanError, Result, SourceErrorKind};
use crate::sync::CancelToken;
use std::time::Duration;
#[cfg(feature = "remote")]
use std::{
    sync::mpsc::{self, RecvTimeoutError},
    thread,
};

/// How often a running download checks for cancellation.
#[cfg(feature = "remote")]
const CANCEL_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Public endoflife.date instance.
pub const DEFAULT_BASE_URL: &str = "https://endoflife.date";

/// Configuration for [`EndOfLifeClient`].
#[derive(Debug, Clone)]
pub struct EndOfLifeConfig {
    /// Base URL; the client appends `/api/v1/products/full`
    pub base_url: String,
    /// Whole-request timeout
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for EndOfLifeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(120),
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"))
                .to_string(),
        }
    }
}

impl EndOfLifeConfig {
    /// URL of the full product dump.
    #[must_use]
    pub fn products_url(&self) -> String {
        format!("{}/api/v1/products/full", self.base_url.trim_end_matches('/'))
    }
}

/// Live source that downloads the full product catalog in one request.
pub struct EndOfLifeClient {
    #[cfg(feature = "remote")]
    client: reqwest::blocking::Client,
    config: EndOfLifeConfig,
}

impl std::fmt::Debug for EndOfLifeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EndOfLifeClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Helper to convert reqwest errors to source errors
#[cfg(feature = "remote")]
fn request_error(context: &str, err: &reqwest::Error) -> EolScanError {
    EolScanError::upstream(context, SourceErrorKind::Request(err.to_string()))
}

/// Blocking GET of the product dump; non-2xx statuses are errors.
#[cfg(feature = "remote")]
fn download(client: &reqwest::blocking::Client, url: String) -> Result<String> {
    let response = client
        .get(&url)
        .header(reqwest::header::ACCEPT, "application/json")
        .send()
        .map_err(|e| request_error("fetching products", &e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(EolScanError::upstream(
            "fetching products",
            SourceErrorKind::Status {
                status: status.as_u16(),
                url,
            },
        ));
    }

    response
        .text()
        .map_err(|e| request_error("reading response body", &e))
}

impl EndOfLifeClient {
    /// Create a new client.
    #[cfg(feature = "remote")]
    pub fn new(config: EndOfLifeConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| request_error("building HTTP client", &e))?;
        Ok(Self { client, config })
    }

    #[cfg(not(feature = "remote"))]
    pub fn new(config: EndOfLifeConfig) -> Result<Self> {
        Ok(Self { config })
    }

    #[must_use]
    pub const fn config(&self) -> &EndOfLifeConfig {
        &self.config
    }

    /// Download the raw `products/full` body.
    ///
    /// The request runs on a worker thread so a cancelled token returns
    /// [`EolScanError::Cancelled`] within one poll interval, without waiting
    /// for the HTTP timeout. The abandoned worker exits when its request does.
    #[cfg(feature = "remote")]
    pub fn fetch_raw(&self, cancel: &CancelToken) -> Result<String> {
        cancel.check()?;
        let url = self.config.products_url();
        tracing::info!("Fetching product catalog from {url}");

        let (tx, rx) = mpsc::channel();
        let client = self.client.clone();
        let request_url = url.clone();
        thread::Builder::new()
            .name("eol-fetch".to_string())
            .spawn(move || {
                // The receiver is gone once the fetch was cancelled.
                let _ = tx.send(download(&client, request_url));
            })
            .map_err(|e| {
                EolScanError::upstream("fetching products", SourceErrorKind::Request(e.to_string()))
            })?;

        let body = loop {
            cancel.check()?;
            match rx.recv_timeout(CANCEL_POLL_INTERVAL) {
                Ok(result) => break result?,
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(EolScanError::upstream(
                        "fetching products",
                        SourceErrorKind::Request("download worker exited".to_string()),
                    ));
                }
            }
        };
        tracing::debug!("Received {} bytes from {url}", body.len());
        cancel.check()?;
        Ok(body)
    }

    #[cfg(not(feature = "remote"))]
    pub fn fetch_raw(&self, cancel: &CancelToken) -> Result<String> {
        cancel.check()?;
        Err(EolScanError::upstream(
            "fetching products",
            SourceErrorKind::Unavailable("built without the `remote` feature".to_string()),
        ))
    }
}

/// Decode a `products/full` body into records.
pub(super) fn parse_products(body: &str) -> Result<Vec<ProductRecord>> {
    let response: ProductsResponse = serde_json::from_str(body).map_err(|e| {
        EolScanError::upstream(
            "parsing products response",
            SourceErrorKind::InvalidResponse(e.to_string()),
        )
    })?;
    if response.total != 0 && response.total != response.result.len() {
        tracing::warn!(
            "Upstream reported {} products but returned {}",
            response.total,
            response.result.len()
        );
    }
    Ok(response.result)
}

impl CatalogSource for EndOfLifeClient {
    fn fetch_products(&self, cancel: &CancelToken) -> Result<Vec<ProductRecord>> {
        let body = self.fetch_raw(cancel)?;
        parse_products(&body)
    }

    fn describe(&self) -> String {
        self.config.products_url()
    }
}
