//! Invoice scraper interface - The external utility-bill collaborator.
//!
//! The scraper itself lives behind a serverless proxy and is out of scope;
//! this module defines the request/response contract, the async trait the
//! ingestion coordinator depends on, and [`FailoverScraper`], which bounds
//! the primary endpoint with a timeout and retries once against a fallback
//! before surfacing the upstream failure.

use crate::{
    core::consumo::InvoiceLine,
    errors::{Error, Result},
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

/// Request forwarded to the bill-scraping service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeRequest {
    /// Consumer unit to fetch the invoice for
    pub uc: String,
    /// CPF/CNPJ of the account holder
    pub documento: String,
    /// Birth date, required by some distributors
    pub data_nascimento: Option<String>,
}

/// Structured invoice returned by the scraping service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapedInvoice {
    /// URL of the fetched invoice
    pub fatura_url: String,
    /// Status message reported by the service
    pub message: String,
    /// Path of the fetched PDF artifact
    pub pdf_path: String,
    /// Invoice month in `"MM/AAAA"` format
    pub month_reference: String,
    /// Parsed line items
    pub lines: Vec<InvoiceLine>,
}

/// Fetches a monthly invoice from the external scraping service.
#[allow(async_fn_in_trait)]
pub trait InvoiceScraper {
    /// Fetches the invoice for one consumer unit. Upstream failures surface
    /// as [`Error::Upstream`] with the service's message preserved verbatim.
    async fn fetch_invoice(&self, request: &ScrapeRequest) -> Result<ScrapedInvoice>;
}

/// Default bound on one scraper call
pub const DEFAULT_SCRAPE_TIMEOUT: Duration = Duration::from_secs(15);

/// Wraps a primary and a fallback scraper endpoint. The primary call is
/// bounded by the configured timeout; on timeout or failure the fallback is
/// tried exactly once, and its failure is the one surfaced.
#[derive(Debug, Clone)]
pub struct FailoverScraper<P, F> {
    primary: P,
    fallback: F,
    timeout: Duration,
}

impl<P, F> FailoverScraper<P, F>
where
    P: InvoiceScraper,
    F: InvoiceScraper,
{
    /// Creates a failover wrapper with the default 15 second timeout.
    pub const fn new(primary: P, fallback: F) -> Self {
        Self {
            primary,
            fallback,
            timeout: DEFAULT_SCRAPE_TIMEOUT,
        }
    }

    /// Creates a failover wrapper with a custom timeout.
    pub const fn with_timeout(primary: P, fallback: F, timeout: Duration) -> Self {
        Self {
            primary,
            fallback,
            timeout,
        }
    }
}

impl<P, F> InvoiceScraper for FailoverScraper<P, F>
where
    P: InvoiceScraper,
    F: InvoiceScraper,
{
    async fn fetch_invoice(&self, request: &ScrapeRequest) -> Result<ScrapedInvoice> {
        match tokio::time::timeout(self.timeout, self.primary.fetch_invoice(request)).await {
            Ok(Ok(invoice)) => return Ok(invoice),
            Ok(Err(error)) => {
                warn!(uc = %request.uc, %error, "primary scraper failed, trying fallback");
            }
            Err(_) => {
                warn!(
                    uc = %request.uc,
                    timeout_secs = self.timeout.as_secs(),
                    "primary scraper timed out, trying fallback"
                );
            }
        }
        self.fallback.fetch_invoice(request).await
    }
}

/// A scraper endpoint that always fails with a fixed upstream message.
/// Useful as a fallback slot when no secondary endpoint is configured.
#[derive(Debug, Clone)]
pub struct UnavailableScraper {
    /// Message surfaced for every request
    pub message: String,
}

impl InvoiceScraper for UnavailableScraper {
    async fn fetch_invoice(&self, _request: &ScrapeRequest) -> Result<ScrapedInvoice> {
        Err(Error::Upstream {
            message: self.message.clone(),
        })
    }
}
