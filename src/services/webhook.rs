//! Inbound gateway events
//!
//! Deliveries are authenticated against the raw body before anything is
//! parsed, journaled, then applied through the shared [`Settler`]. Only a
//! fully applied (or idempotently ignored) event is acknowledged.

use crate::database::donation_repository::DonationStatus;
use crate::database::repository::LedgerStore;
use crate::error::{AppError, AppResult, DomainError};
use crate::payments::money::to_minor_units;
use crate::payments::PaymentProvider;
use crate::services::settlement::Settler;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Header carrying the hex HMAC of the body
pub const SIGNATURE_HEADER: &str = "x-paystack-signature";

#[derive(Debug, Deserialize)]
struct WebhookEnvelope {
    event: String,
    #[serde(default)]
    data: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ChargeEventData {
    reference: String,
    #[serde(default)]
    amount: Option<i64>,
}

/// Body returned to the gateway once an event has been handled
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookAck {
    pub received: bool,
}

pub struct WebhookService {
    ledger: Arc<dyn LedgerStore>,
    gateway: Arc<dyn PaymentProvider>,
    settler: Settler,
}

impl WebhookService {
    pub fn new(ledger: Arc<dyn LedgerStore>, gateway: Arc<dyn PaymentProvider>) -> Self {
        Self {
            settler: Settler::new(ledger.clone()),
            ledger,
            gateway,
        }
    }

    pub async fn handle(&self, body: &[u8], signature: Option<&str>) -> AppResult<WebhookAck> {
        let signature = signature.map(str::trim).filter(|s| !s.is_empty());
        match signature {
            Some(signature) if self.gateway.verify_webhook_signature(body, signature) => {}
            _ => {
                warn!("Rejected webhook with missing or invalid signature");
                return Err(DomainError::InvalidSignature.into());
            }
        }

        let payload: serde_json::Value = serde_json::from_slice(body)
            .map_err(|e| AppError::validation("body", format!("malformed JSON: {}", e)))?;
        let envelope: WebhookEnvelope = serde_json::from_value(payload.clone())
            .map_err(|e| AppError::validation("body", format!("malformed event: {}", e)))?;

        info!("Webhook event received: {}", envelope.event);
        let event_id = self.ledger.log_webhook_event(&envelope.event, &payload).await?;

        match self.dispatch(&envelope).await {
            Ok(()) => {
                if let Err(e) = self.ledger.mark_webhook_processed(event_id).await {
                    error!("Failed to mark webhook event {} processed: {}", event_id, e);
                }
                Ok(WebhookAck { received: true })
            }
            Err(err) => {
                self.journal_failure(event_id, &err).await;
                Err(err.with_context(envelope.event))
            }
        }
    }

    async fn journal_failure(&self, event_id: Uuid, err: &AppError) {
        if let Err(e) = self
            .ledger
            .record_webhook_failure(event_id, &err.to_string())
            .await
        {
            error!("Failed to record webhook failure for {}: {}", event_id, e);
        }
    }

    async fn dispatch(&self, envelope: &WebhookEnvelope) -> AppResult<()> {
        match envelope.event.as_str() {
            "charge.success" => {
                let data = Self::charge_data(&envelope.data)?;
                let settlement = self
                    .settler
                    .settle(&data.reference, DonationStatus::Completed)
                    .await?;
                if let Some(reported) = data.amount {
                    let expected = to_minor_units(&settlement.donation.amount)?;
                    if reported != expected {
                        warn!(
                            "Charge {} reported {} minor units, donation records {}",
                            data.reference, reported, expected
                        );
                    }
                }
                Ok(())
            }
            "charge.failed" => {
                let data = Self::charge_data(&envelope.data)?;
                self.settler
                    .settle(&data.reference, DonationStatus::Failed)
                    .await?;
                Ok(())
            }
            "transfer.success" | "transfer.failed" | "transfer.reversed" => {
                info!("Transfer event: {} {}", envelope.event, envelope.data);
                Ok(())
            }
            other => {
                info!("Ignoring unhandled webhook event {}", other);
                Ok(())
            }
        }
    }

    fn charge_data(data: &serde_json::Value) -> AppResult<ChargeEventData> {
        let data: ChargeEventData = serde_json::from_value(data.clone())
            .map_err(|e| AppError::validation("data", format!("malformed charge data: {}", e)))?;
        if data.reference.trim().is_empty() {
            return Err(AppError::validation("reference", "cannot be empty"));
        }
        Ok(data)
    }
}
