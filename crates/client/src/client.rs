//! Back-office API client.

use std::time::Duration;

use clearline_core::invoice::{
    ApiEnvelope, ChargeCatalog, ChargeType, CreateInvoiceRequest, CreateInvoiceResponse,
};
use clearline_shared::config::ApiConfig;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::error::ClientError;

const CHARGE_TYPES_PATH: &str = "charge-types";
const CREATE_INVOICE_PATH: &str = "invoices/create";

/// Client for the charge-types and invoice endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Creates a client with the configured base URL, timeout and token.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Build`] if the HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ClientError::Build(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config
                .token
                .as_deref()
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .map(str::to_string),
        })
    }

    /// Base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for an API path.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Fetches the charge types offered in the description dropdown.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the status is not 2xx or the
    /// server reports `success: false`.
    pub async fn fetch_charge_types(&self) -> Result<Vec<ChargeType>, ClientError> {
        let url = self.endpoint(CHARGE_TYPES_PATH);
        debug!(url = %url, "Fetching charge types");

        let response = self
            .authorize(self.http.get(&url))
            .send()
            .await
            .map_err(|e| request_error(&url, &e))?;

        let envelope: ApiEnvelope<Vec<ChargeType>> = read_json(response).await?;
        if !envelope.success {
            return Err(ClientError::Rejected(
                envelope
                    .message
                    .unwrap_or_else(|| "Charge types unavailable".to_string()),
            ));
        }
        Ok(envelope.data.unwrap_or_default())
    }

    /// Loads the charge catalog, using `fallback` when the endpoint fails or
    /// returns nothing.
    pub async fn load_catalog(&self, fallback: ChargeCatalog) -> ChargeCatalog {
        match self.fetch_charge_types().await {
            Ok(types) if !types.is_empty() => {
                info!(count = types.len(), "Loaded charge types");
                ChargeCatalog::from_charge_types(&types)
            }
            Ok(_) => {
                warn!("Charge types endpoint returned no data, using fallback list");
                fallback
            }
            Err(e) => {
                warn!(error = %e, code = e.error_code(), "Failed to load charge types, using fallback list");
                fallback
            }
        }
    }

    /// Submits a finalized invoice.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the status is not 2xx or the
    /// server reports `success: false`.
    pub async fn create_invoice(
        &self,
        request: &CreateInvoiceRequest,
    ) -> Result<CreateInvoiceResponse, ClientError> {
        let url = self.endpoint(CREATE_INVOICE_PATH);
        debug!(url = %url, job_card_id = %request.job_card_id, "Submitting invoice");

        let response = self
            .authorize(self.http.post(&url))
            .json(request)
            .send()
            .await
            .map_err(|e| request_error(&url, &e))?;

        let body: CreateInvoiceResponse = read_json(response).await?;
        if !body.success {
            return Err(ClientError::Rejected(
                body.message
                    .unwrap_or_else(|| "Failed to create invoice".to_string()),
            ));
        }

        info!(
            job_card_id = %request.job_card_id,
            invoice_number = body.invoice_number.as_deref().unwrap_or("-"),
            "Invoice created"
        );
        Ok(body)
    }
}

/// Error body returned with non-2xx statuses.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

fn request_error(url: &str, err: &reqwest::Error) -> ClientError {
    let message = if err.is_timeout() {
        "request timed out".to_string()
    } else {
        err.to_string()
    };
    ClientError::Request {
        url: url.to_string(),
        message,
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ClientError::Decode(e.to_string()))?;

    if !status.is_success() {
        let parsed: ErrorBody = serde_json::from_str(&body).unwrap_or_default();
        let message = parsed.message.or(parsed.error).unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });
        return Err(ClientError::Status {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))
}
