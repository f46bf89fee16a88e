//! Paystack gateway client
//!
//! Charges, charge verification and bank transfers against Paystack's REST
//! API. Only idempotent GET calls are retried; POSTs that move money are sent
//! once and a timeout is surfaced as an unknown outcome.

use crate::config::GatewayConfig;
use crate::error::{AppError, AppResult, ExternalError};
use crate::payments::traits::PaymentProvider;
use crate::payments::types::{
    ChargeVerification, PaymentRequest, PaymentResponse, PaymentStatus, TransferStatus,
    WithdrawalRequest, WithdrawalResponse,
};
use async_trait::async_trait;
use hmac::{Hmac, Mac};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use sha2::Sha512;
use std::time::Duration;
use tracing::{error, info, warn};

const PROVIDER: &str = "Paystack";

type HmacSha512 = Hmac<Sha512>;

pub struct PaystackProvider {
    config: GatewayConfig,
    client: Client,
}

impl PaystackProvider {
    pub fn new(config: GatewayConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build Paystack client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn provider_error(message: impl Into<String>, is_retryable: bool) -> AppError {
        ExternalError::PaymentProvider {
            provider: PROVIDER.to_string(),
            message: message.into(),
            is_retryable,
        }
        .into()
    }

    fn outcome_unknown(operation: &str) -> AppError {
        ExternalError::Timeout {
            service: PROVIDER.to_string(),
            operation: operation.to_string(),
        }
        .into()
    }

    /// Authenticated call returning the unwrapped `data` field.
    ///
    /// GET lookups are retried with exponential backoff on transport errors,
    /// 429 and 5xx. Anything else is attempted exactly once, and once its
    /// headers are back any failure to read a usable body is an unknown
    /// outcome.
    async fn call<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        operation: &str,
    ) -> AppResult<T>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.config.base_url, path);
        let is_write = method != Method::GET;
        let retries = if is_write {
            0
        } else {
            self.config.lookup_retries
        };

        let mut attempt = 0;
        loop {
            let mut request = self
                .client
                .request(method.clone(), &url)
                .bearer_auth(&self.config.secret_key);
            if let Some(body) = body {
                request = request.json(body);
            }

            let response = match request.send().await {
                Ok(response) => response,
                Err(e) if attempt < retries => {
                    let delay = backoff(attempt);
                    warn!(operation, attempt = attempt + 1, ?delay, error = %e, "Paystack unreachable, retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                    continue;
                }
                // only a refused connection proves a write never reached Paystack
                Err(e) if e.is_timeout() || (is_write && !e.is_connect()) => {
                    error!(operation, error = %e, "Paystack call timed out or dropped");
                    return Err(Self::outcome_unknown(operation));
                }
                Err(e) => {
                    error!(operation, error = %e, "Paystack call failed");
                    return Err(Self::provider_error(
                        format!("Request failed: {}", e),
                        e.is_connect(),
                    ));
                }
            };

            let status = response.status();
            let text = match response.text().await {
                Ok(text) => text,
                Err(e) if is_write => {
                    error!(operation, %status, error = %e, "Paystack write response cut off");
                    return Err(Self::outcome_unknown(operation));
                }
                Err(e) if attempt < retries => {
                    let delay = backoff(attempt);
                    warn!(operation, attempt = attempt + 1, ?delay, error = %e, "Paystack response cut off, retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                    continue;
                }
                Err(e) => {
                    error!(operation, %status, error = %e, "Paystack response cut off");
                    return Err(Self::provider_error(
                        format!("Incomplete response: {}", e),
                        true,
                    ));
                }
            };

            if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                if attempt < retries {
                    let delay = backoff(attempt);
                    warn!(operation, %status, attempt = attempt + 1, ?delay, "Paystack busy, retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                    continue;
                }
                if status == StatusCode::TOO_MANY_REQUESTS {
                    return Err(ExternalError::RateLimit {
                        service: PROVIDER.to_string(),
                        retry_after: Some(60),
                    }
                    .into());
                }
                // a 5xx on a write may still have been applied upstream
                if is_write {
                    error!(operation, %status, body = %text, "Paystack write returned server error");
                    return Err(Self::outcome_unknown(operation));
                }
            }

            return Self::unwrap_data(status, &text, operation, is_write);
        }
    }

    /// A 2xx on a write that does not carry a readable `data` payload may
    /// still have been applied, so it is reported as an unknown outcome.
    fn unwrap_data<T>(
        status: StatusCode,
        text: &str,
        operation: &str,
        is_write: bool,
    ) -> AppResult<T>
    where
        T: DeserializeOwned,
    {
        match serde_json::from_str::<Envelope<T>>(text) {
            Ok(Envelope {
                status: true,
                data: Some(data),
                ..
            }) if status.is_success() => Ok(data),
            Ok(Envelope { status: true, .. }) if status.is_success() && is_write => {
                error!(operation, "Paystack accepted write without data");
                Err(Self::outcome_unknown(operation))
            }
            Ok(Envelope { message, .. }) => {
                error!(operation, %status, %message, "Paystack rejected call");
                Err(Self::provider_error(message, status.is_server_error()))
            }
            Err(e) if status.is_success() && is_write => {
                error!(operation, error = %e, "Unreadable Paystack response to a write");
                Err(Self::outcome_unknown(operation))
            }
            Err(e) if status.is_success() => {
                error!(operation, error = %e, "Unreadable Paystack response");
                Err(Self::provider_error(
                    format!("Invalid response format: {}", e),
                    false,
                ))
            }
            Err(_) => {
                let message = format!("HTTP {}: {}", status, text);
                error!(operation, %message, "Paystack call failed");
                Err(Self::provider_error(message, status.is_server_error()))
            }
        }
    }

    /// Transfers need a bank code; campaign owners register a bank name
    async fn bank_code(&self, bank_name: &str, currency: &str) -> AppResult<String> {
        let banks: Vec<Bank> = self
            .call(
                Method::GET,
                &format!("/bank?currency={}", currency),
                None,
                "bank lookup",
            )
            .await?;

        let wanted = bank_name.trim().to_lowercase();
        banks
            .into_iter()
            .find(|bank| bank.name.trim().to_lowercase() == wanted)
            .map(|bank| bank.code)
            .ok_or_else(|| {
                AppError::validation("bank_name", format!("Unknown bank '{}'", bank_name))
            })
    }
}

/// Exponential backoff for lookup retries: 1s, 2s, 4s, ... capped at a minute
fn backoff(attempt: u32) -> Duration {
    Duration::from_secs(2_u64.saturating_pow(attempt).min(60))
}

/// Failures before the transfer call cannot have moved money
fn before_transfer(err: AppError) -> AppError {
    if err.is_timeout() {
        PaystackProvider::provider_error(err.to_string(), true)
    } else {
        err
    }
}

#[async_trait]
impl PaymentProvider for PaystackProvider {
    async fn initialize_charge(&self, request: PaymentRequest) -> AppResult<PaymentResponse> {
        info!(
            reference = %request.reference,
            amount = request.amount,
            currency = %request.currency,
            "Opening Paystack charge"
        );

        let mut payload = json!({
            "email": request.email,
            "amount": request.amount,
            "currency": request.currency,
            "reference": request.reference,
            "metadata": request.metadata,
        });
        if let Some(callback_url) = request.callback_url {
            payload["callback_url"] = Value::String(callback_url);
        }

        let opened: InitializeData = self
            .call(
                Method::POST,
                "/transaction/initialize",
                Some(&payload),
                "charge initialization",
            )
            .await?;

        info!(reference = %opened.reference, "Paystack charge opened");

        Ok(PaymentResponse {
            authorization_url: opened.authorization_url,
            access_code: Some(opened.access_code),
            reference: opened.reference,
        })
    }

    async fn verify_charge(&self, reference: &str) -> AppResult<ChargeVerification> {
        let charge: VerifyData = self
            .call(
                Method::GET,
                &format!("/transaction/verify/{}", reference),
                None,
                "charge verification",
            )
            .await?;

        info!(reference, gateway_status = %charge.status, "Paystack charge looked up");

        Ok(ChargeVerification {
            status: PaymentStatus::from_gateway(&charge.status),
            gateway_status: charge.status,
            amount: charge.amount,
            currency: charge.currency,
            reference: charge.reference,
            message: charge.gateway_response,
            paid_at: charge.paid_at,
        })
    }

    async fn send_transfer(&self, request: WithdrawalRequest) -> AppResult<WithdrawalResponse> {
        info!(
            reference = %request.reference,
            amount = request.amount,
            currency = %request.currency,
            "Sending Paystack transfer"
        );

        let bank_code = self
            .bank_code(&request.bank_name, &request.currency)
            .await
            .map_err(before_transfer)?;

        let recipient: RecipientData = self
            .call(
                Method::POST,
                "/transferrecipient",
                Some(&json!({
                    "type": "nuban",
                    "name": request.recipient_name,
                    "account_number": request.account_number,
                    "bank_code": bank_code,
                    "currency": request.currency,
                })),
                "recipient creation",
            )
            .await
            .map_err(before_transfer)?;

        let mut payload = json!({
            "source": "balance",
            "amount": request.amount,
            "currency": request.currency,
            "recipient": recipient.recipient_code,
            "reference": request.reference,
        });
        if let Some(reason) = request.reason {
            payload["reason"] = Value::String(reason);
        }

        let transfer: TransferData = self
            .call(Method::POST, "/transfer", Some(&payload), "transfer")
            .await?;

        info!(
            transfer_code = %transfer.transfer_code,
            gateway_status = %transfer.status,
            "Paystack transfer accepted"
        );

        let status = match transfer.status.as_str() {
            "success" => TransferStatus::Success,
            "otp" => TransferStatus::AwaitingOtp,
            "reversed" => TransferStatus::Reversed,
            "failed" => {
                return Err(Self::provider_error(
                    transfer
                        .failure_reason
                        .unwrap_or_else(|| "Transfer failed".to_string()),
                    false,
                ))
            }
            _ => TransferStatus::Pending,
        };

        Ok(WithdrawalResponse {
            transfer_code: transfer.transfer_code,
            transfer_reference: transfer.reference,
            status,
        })
    }

    fn verify_webhook_signature(&self, payload: &[u8], signature: &str) -> bool {
        let Ok(expected) = hex::decode(signature.trim()) else {
            return false;
        };
        let Ok(mut mac) = HmacSha512::new_from_slice(self.config.secret_key.as_bytes()) else {
            return false;
        };
        mac.update(payload);
        mac.verify_slice(&expected).is_ok()
    }
}

/// Every Paystack response is wrapped as `{status, message, data}`
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    status: bool,
    #[serde(default)]
    message: String,
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct InitializeData {
    authorization_url: String,
    access_code: String,
    reference: String,
}

#[derive(Debug, Deserialize)]
struct VerifyData {
    amount: i64,
    currency: String,
    status: String,
    reference: String,
    #[serde(default)]
    paid_at: Option<String>,
    #[serde(default)]
    gateway_response: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Bank {
    name: String,
    code: String,
}

#[derive(Debug, Deserialize)]
struct RecipientData {
    recipient_code: String,
}

#[derive(Debug, Deserialize)]
struct TransferData {
    transfer_code: String,
    reference: String,
    status: String,
    #[serde(default)]
    failure_reason: Option<String>,
}
