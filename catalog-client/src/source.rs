//! Source catalog client

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::ACCEPT;
use serde_json::Value;
use shared::SourceProduct;

use crate::catalog::SourceCatalog;
use crate::http::{build_client, read_json, take_data};
use crate::{ClientError, ClientResult, SourceConfig};

/// HTTP client for the source catalog
#[derive(Debug, Clone)]
pub struct SourceClient {
    client: Client,
    url: String,
}

impl SourceClient {
    pub fn new(config: &SourceConfig) -> ClientResult<Self> {
        Ok(Self {
            client: build_client(config.timeout)?,
            url: config.url.clone(),
        })
    }
}

/// Decode `{ data: [SourceProduct] }`; an absent `data` is an empty catalog
pub(crate) fn parse_source_catalog(mut body: Value) -> ClientResult<Vec<SourceProduct>> {
    let data = take_data(&mut body);
    match data {
        Value::Null => Ok(Vec::new()),
        Value::Array(_) => serde_json::from_value(data)
            .map_err(|e| ClientError::DataShape(format!("Malformed source product: {e}"))),
        other => Err(ClientError::DataShape(format!(
            "Source `data` is not a list: {}",
            type_name(&other)
        ))),
    }
}

pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[async_trait]
impl SourceCatalog for SourceClient {
    async fn fetch_products(&self) -> ClientResult<Vec<SourceProduct>> {
        let response = self
            .client
            .get(&self.url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        let products = parse_source_catalog(read_json(response).await?)?;
        tracing::debug!(count = products.len(), "Fetched source catalog");
        Ok(products)
    }
}
