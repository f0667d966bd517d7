use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use super::{Checkout, CheckoutRequest, PaymentError, PaymentGateway, VerifiedTransaction};
use crate::config::PaystackConfig;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_RETRIES: u32 = 3;
const BACKOFF_BASE: Duration = Duration::from_millis(500);

/// Envelope every Paystack API response is wrapped in.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    status: bool,
    #[serde(default)]
    message: Option<String>,
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct InitializeData {
    authorization_url: String,
    reference: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VerifyData {
    status: String,
    reference: String,
    #[serde(default)]
    amount: Option<u64>,
    #[serde(default)]
    metadata: Value,
}

/// Which failures a request may be resent after.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Retry {
    /// Reads: any transient failure.
    Transient,
    /// Writes: only failures the processor cannot have acted on.
    Unprocessed,
}

impl Retry {
    fn allows(self, error: &PaymentError) -> bool {
        match self {
            Retry::Transient => error.is_retryable(),
            Retry::Unprocessed => error.is_retryable_unprocessed(),
        }
    }
}

pub struct PaystackClient {
    http: Client,
    base_url: Url,
    secret_key: Option<String>,
}

impl PaystackClient {
    pub fn new(config: &PaystackConfig) -> Result<Self, PaymentError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| PaymentError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;

        Ok(Self {
            http,
            base_url,
            secret_key: config.secret_key.clone(),
        })
    }

    fn secret_key(&self) -> Result<&str, PaymentError> {
        self.secret_key
            .as_deref()
            .ok_or(PaymentError::NotConfigured("PAYSTACK_SECRET_KEY not set"))
    }

    /// `base_url` followed by `segments`, each percent-encoded as a single
    /// path segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, PaymentError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| PaymentError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Sends the request built by `build`, retrying the failures `retry`
    /// allows with exponential backoff.
    async fn send_with_retry<T, F>(&self, retry: Retry, build: F) -> Result<ApiResponse<T>, PaymentError>
    where
        T: for<'de> Deserialize<'de>,
        F: Fn() -> RequestBuilder,
    {
        let mut attempt = 0;
        loop {
            match self.send_once(build()).await {
                Err(e) if retry.allows(&e) && attempt < MAX_RETRIES => {
                    let delay = BACKOFF_BASE * 2u32.pow(attempt);
                    attempt += 1;
                    warn!("Paystack request failed ({}), retry {}/{} in {:?}", e, attempt, MAX_RETRIES, delay);
                    tokio::time::sleep(delay).await;
                }
                result => return result,
            }
        }
    }

    async fn send_once<T>(&self, request: RequestBuilder) -> Result<ApiResponse<T>, PaymentError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let response = request.send().await?;
        let status = response.status();

        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(PaymentError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<ApiResponse<T>>()
            .await
            .map_err(|e| PaymentError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl PaymentGateway for PaystackClient {
    async fn initialize(&self, request: &CheckoutRequest) -> Result<Checkout, PaymentError> {
        let secret_key = self.secret_key()?;
        let url = self.endpoint(&["transaction", "initialize"])?;

        // Paystack expects the amount in the currency's subunit.
        let amount = request
            .amount
            .checked_mul(100)
            .ok_or_else(|| PaymentError::Rejected(format!("amount {} overflows", request.amount)))?;

        let payload = serde_json::json!({
            "email": request.email(),
            "amount": amount,
            "reference": request.reference,
            "metadata": request.metadata(),
            "callback_url": request.callback_url,
        });

        debug!("Initializing Paystack transaction {} for user {}", request.reference, request.user_id);
        let response: ApiResponse<InitializeData> = self
            .send_with_retry(Retry::Unprocessed, || {
                self.http.post(url.clone()).bearer_auth(secret_key).json(&payload)
            })
            .await?;

        if !response.status {
            return Err(PaymentError::Rejected(
                response.message.unwrap_or_else(|| "initialize failed".to_string()),
            ));
        }

        let data = response
            .data
            .ok_or_else(|| PaymentError::InvalidResponse("missing data".to_string()))?;

        Ok(Checkout {
            authorization_url: data.authorization_url,
            reference: data.reference.unwrap_or_else(|| request.reference.clone()),
        })
    }

    async fn verify(&self, reference: &str) -> Result<Option<VerifiedTransaction>, PaymentError> {
        let secret_key = self.secret_key()?;
        let url = self.endpoint(&["transaction", "verify", reference])?;

        let response: ApiResponse<VerifyData> = self
            .send_with_retry(Retry::Transient, || self.http.get(url.clone()).bearer_auth(secret_key))
            .await?;

        match response.data {
            Some(data) if response.status && data.status == "success" => Ok(Some(VerifiedTransaction {
                reference: data.reference,
                amount: data.amount,
                metadata: data.metadata,
            })),
            Some(data) => {
                warn!("Paystack verify not successful for {}: status {}", reference, data.status);
                Ok(None)
            }
            None => {
                warn!(
                    "Paystack verify returned no data for {}: {}",
                    reference,
                    response.message.unwrap_or_default()
                );
                Ok(None)
            }
        }
    }

    fn name(&self) -> &str {
        "paystack"
    }
}
