//! HTTP plumbing shared by the catalog clients

use crate::{ClientError, ClientResult};
use reqwest::{Client, Response};
use serde_json::Value;
use std::time::Duration;

/// Build a reqwest client with the given request timeout
pub(crate) fn build_client(timeout_secs: u64) -> ClientResult<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| ClientError::Setup(format!("Failed to build HTTP client: {e}")))
}

/// Turn a non-success status into [`ClientError::Status`]
pub(crate) async fn check_status(response: Response) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ClientError::Status { status, body })
}

/// Read a successful response as JSON
pub(crate) async fn read_json(response: Response) -> ClientResult<Value> {
    let response = check_status(response).await?;
    let text = response.text().await?;
    serde_json::from_str(&text)
        .map_err(|e| ClientError::DataShape(format!("Response is not JSON: {e}")))
}

/// Move the `data` member out of an envelope payload
///
/// `Value::Null` when the member is absent or the payload is not an object;
/// callers treat that as "nothing there".
pub(crate) fn take_data(body: &mut Value) -> Value {
    body.get_mut("data").map(Value::take).unwrap_or(Value::Null)
}
