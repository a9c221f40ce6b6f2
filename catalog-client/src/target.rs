//! Target catalog client
//!
//! ```text
//! GET   /products?page=&limit=&join=   listing, paged until an empty page
//! GET   /products/{id}                 full product document
//! PATCH /products/{id}                 replace with a full document
//! ```

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use shared::{ProductDocument, RecordId, TargetProduct};

use crate::catalog::TargetCatalog;
use crate::http::{build_client, check_status, read_json, take_data};
use crate::source::type_name;
use crate::{ClientError, ClientResult, TargetConfig};

/// Header carrying the target API key
pub const API_KEY_HEADER: &str = "Api-Key";

/// HTTP client for the target catalog
#[derive(Debug, Clone)]
pub struct TargetClient {
    client: Client,
    config: TargetConfig,
}

impl TargetClient {
    pub fn new(config: TargetConfig) -> ClientResult<Self> {
        Ok(Self {
            client: build_client(config.timeout)?,
            config,
        })
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header(API_KEY_HEADER, &self.config.api_key)
            .header(ACCEPT, "application/json")
    }

    /// Fetch one listing page (1-based). An empty result marks the end.
    pub async fn fetch_page(&self, page: u32) -> ClientResult<Vec<TargetProduct>> {
        let request = self.client.get(self.config.url("products")).query(&[
            ("page", page.to_string()),
            ("limit", self.config.page_size.to_string()),
            ("join", self.config.join.clone()),
        ]);
        let response = self.authorized(request).send().await?;
        parse_page(read_json(response).await?)
    }
}

/// Decode one listing page; a missing or non-list `data` is an empty page
pub(crate) fn parse_page(mut body: Value) -> ClientResult<Vec<TargetProduct>> {
    match take_data(&mut body) {
        data @ Value::Array(_) => serde_json::from_value(data)
            .map_err(|e| ClientError::DataShape(format!("Malformed target product: {e}"))),
        other => {
            if !other.is_null() {
                tracing::debug!(
                    kind = type_name(&other),
                    "Target listing `data` is not a list, treating as last page"
                );
            }
            Ok(Vec::new())
        }
    }
}

#[async_trait]
impl TargetCatalog for TargetClient {
    async fn fetch_all_products(&self) -> ClientResult<Vec<TargetProduct>> {
        let mut products = Vec::new();
        let mut previous_ids: Vec<Option<RecordId>> = Vec::new();
        let mut page = 1;

        loop {
            let items = self.fetch_page(page).await?;
            if items.is_empty() {
                break;
            }
            // A server that ignores `page` serves the same records forever
            let ids: Vec<Option<RecordId>> = items.iter().map(|p| p.id.clone()).collect();
            if ids == previous_ids {
                tracing::warn!(page, "Target listing repeated the previous page, stopping pagination");
                break;
            }
            tracing::debug!(page, count = items.len(), "Fetched target catalog page");
            products.extend(items);
            previous_ids = ids;
            page += 1;
        }

        tracing::debug!(
            pages = page - 1,
            count = products.len(),
            "Fetched target catalog"
        );
        Ok(products)
    }

    async fn get_product(&self, id: &RecordId) -> ClientResult<ProductDocument> {
        let request = self
            .client
            .get(self.config.url(&format!("products/{id}")));
        let response = self.authorized(request).send().await?;
        let body = read_json(response).await?;
        let kind = type_name(&body);
        ProductDocument::from_value(body).ok_or_else(|| {
            ClientError::DataShape(format!("Product {id} document is a {kind}, not an object"))
        })
    }

    async fn replace_product(&self, id: &RecordId, document: &ProductDocument) -> ClientResult<()> {
        let request = self
            .client
            .patch(self.config.url(&format!("products/{id}")))
            .json(document);
        let response = self.authorized(request).send().await?;
        check_status(response).await?;
        Ok(())
    }
}
