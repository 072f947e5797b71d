use std::sync::Arc;

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
    StatusCode,
};
use serde_json::Value;

use crate::{MidtransApiError, MidtransConfig, TransactionRecord};

#[derive(Clone)]
pub struct MidtransApi {
    config: MidtransConfig,
    client: Arc<Client>,
}

impl MidtransApi {
    pub fn new(config: MidtransConfig) -> Result<Self, MidtransApiError> {
        let mut headers = HeaderMap::with_capacity(1);
        headers.insert("Accept", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| MidtransApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url)
    }

    /// Fetch the authoritative status for `reference` from the provider, retrying once on a transient transport
    /// failure. A 404 means the provider has never heard of the transaction: the inbound notification that named
    /// it cannot be genuine.
    pub async fn transaction_status(&self, reference: &str) -> Result<TransactionRecord, MidtransApiError> {
        retry_once(reference, || self.fetch_status(reference)).await
    }

    async fn fetch_status(&self, reference: &str) -> Result<TransactionRecord, MidtransApiError> {
        let url = self.url(&format!("/v2/{reference}/status"));
        trace!("Querying transaction status: {url}");
        let response = self
            .client
            .get(url)
            // Midtrans HTTP basic auth: the server key as username, empty password
            .basic_auth(self.config.server_key.reveal(), Some(""))
            .send()
            .await
            .map_err(|e| MidtransApiError::Unavailable(e.to_string()))?;
        match response.status() {
            s if s.is_success() => {
                trace!("Status query successful. {s}");
                let body = response.json::<Value>().await.map_err(|e| MidtransApiError::JsonError(e.to_string()))?;
                TransactionRecord::from_response(body)
            },
            StatusCode::NOT_FOUND => {
                warn!("Midtrans has no record of transaction [{reference}]");
                Err(MidtransApiError::TransactionNotFound(reference.to_string()))
            },
            s => {
                let status = s.as_u16();
                let message = response.text().await.map_err(|e| MidtransApiError::ResponseError(e.to_string()))?;
                Err(MidtransApiError::QueryError { status, message })
            },
        }
    }
}

/// Run `call`, and run it a second time if the first attempt failed transiently. Anything beyond that single
/// retry is left to the provider's own redelivery mechanism.
async fn retry_once<T, F, Fut>(reference: &str, mut call: F) -> Result<T, MidtransApiError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, MidtransApiError>>,
{
    match call().await {
        Err(e) if e.is_transient() => {
            info!("Transient error fetching status for [{reference}] ({e}). Retrying once.");
            call().await
        },
        other => other,
    }
}
