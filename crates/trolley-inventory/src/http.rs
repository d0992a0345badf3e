//! # HTTP Inventory Client
//!
//! [`InventoryClient`] over the inventory service's REST API.
//!
//! ## Endpoints
//! ```text
//! GET {base}/stock/{id}     → 200 {"id": 1, "amount": 3}
//!                           → 404                          (no record)
//! GET {base}/products/{id}  → 200 {"id": 1, "title": "...", "price": 179.9, ...}
//! ```
//!
//! A 404 on the stock endpoint is an answer ("no stock"), not a failure.
//! Any other non-2xx status, transport error or undecodable body is an
//! [`InventoryError`].

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, instrument, warn};
use trolley_core::{Metadata, ProductDetails, ProductId, StockRecord};
use url::Url;

use crate::client::InventoryClient;
use crate::config::InventoryConfig;
use crate::error::{InventoryError, InventoryResult};

/// Body of `GET /stock/{id}`.
#[derive(Debug, Deserialize)]
struct StockPayload {
    amount: i64,
}

/// Inventory client backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpInventoryClient {
    http: reqwest::Client,
    base_url: Url,
    timeout_secs: u64,
}

impl HttpInventoryClient {
    /// Creates a client from validated configuration.
    pub fn new(config: &InventoryConfig) -> InventoryResult<Self> {
        config.validate()?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| InventoryError::InvalidConfig(e.to_string()))?;

        Ok(HttpInventoryClient {
            http,
            base_url: config.parsed_base_url()?,
            timeout_secs: config.request_timeout_secs,
        })
    }

    /// Returns the service root every request is resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, resource: &str, product_id: ProductId) -> InventoryResult<Url> {
        Ok(self.base_url.join(&format!("{resource}/{product_id}"))?)
    }

    async fn get(&self, url: Url) -> InventoryResult<reqwest::Response> {
        self.http.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                InventoryError::Timeout(self.timeout_secs)
            } else {
                InventoryError::from(e)
            }
        })
    }
}

fn status_error(status: StatusCode, url: &Url) -> InventoryError {
    InventoryError::Status {
        status: status.as_u16(),
        url: url.to_string(),
    }
}

#[async_trait]
impl InventoryClient for HttpInventoryClient {
    #[instrument(skip_all, fields(product_id = %product_id))]
    async fn stock(&self, product_id: ProductId) -> InventoryResult<Option<StockRecord>> {
        let url = self.endpoint("stock", product_id)?;
        let response = self.get(url.clone()).await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!("No stock record");
            return Ok(None);
        }
        if !status.is_success() {
            warn!(status = status.as_u16(), "Stock query rejected");
            return Err(status_error(status, &url));
        }

        let payload: StockPayload = response.json().await?;
        let amount = u32::try_from(payload.amount.max(0)).unwrap_or(u32::MAX);
        debug!(amount, "Stock received");

        Ok(Some(StockRecord::new(product_id, amount)))
    }

    #[instrument(skip_all, fields(product_id = %product_id))]
    async fn product(&self, product_id: ProductId) -> InventoryResult<ProductDetails> {
        let url = self.endpoint("products", product_id)?;
        let response = self.get(url.clone()).await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Product query rejected");
            return Err(status_error(status, &url));
        }

        // The catalog's own id field is ignored; the cart keys on the id it asked for.
        let mut metadata: Metadata = response.json().await?;
        metadata.remove("id");
        debug!(fields = metadata.len(), "Product details received");

        Ok(ProductDetails {
            id: product_id,
            metadata,
        })
    }
}
