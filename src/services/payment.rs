//! Charge initialization and client-driven verification

use crate::config::PaymentsConfig;
use crate::database::donation_repository::{DonationStatus, NewDonation};
use crate::database::repository::LedgerStore;
use crate::error::{AppError, AppResult};
use crate::payments::money::{deserialize_major_amount, from_minor_units, to_minor_units};
use crate::payments::types::{ChargeMetadata, PaymentRequest};
use crate::payments::PaymentProvider;
use crate::services::settlement::Settler;
use bigdecimal::BigDecimal;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

const EMAIL_PATTERN: &str = r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}$";

/// References travel in gateway URL paths, so only URL-safe characters pass
const REFERENCE_PATTERN: &str = r"^[A-Za-z0-9_\-]{1,100}$";

fn compile(name: &str, pattern: &str) -> AppResult<Regex> {
    Regex::new(pattern)
        .map_err(|e| AppError::configuration(format!("invalid {} pattern: {}", name, e)))
}

/// Donor details attached to a charge
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DonationMetadata {
    #[serde(default)]
    pub donor_id: Option<Uuid>,
    #[serde(default)]
    pub is_anonymous: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializePayment {
    pub campaign_id: Uuid,
    /// Major units
    #[serde(deserialize_with = "deserialize_major_amount")]
    pub amount: BigDecimal,
    pub email: String,
    #[serde(default)]
    pub metadata: DonationMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InitializedPayment {
    pub authorization_url: String,
    pub access_code: Option<String>,
    pub reference: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerifiedPayment {
    /// Charge status as the gateway reported it
    pub status: String,
    /// Major units
    pub amount: BigDecimal,
    pub reference: String,
    pub message: Option<String>,
    /// Ledger state of the donation after settlement
    pub donation_status: DonationStatus,
}

pub struct PaymentService {
    ledger: Arc<dyn LedgerStore>,
    gateway: Arc<dyn PaymentProvider>,
    settler: Settler,
    config: PaymentsConfig,
    email_pattern: Regex,
    reference_pattern: Regex,
}

impl PaymentService {
    pub fn new(
        ledger: Arc<dyn LedgerStore>,
        gateway: Arc<dyn PaymentProvider>,
        config: PaymentsConfig,
    ) -> AppResult<Self> {
        Ok(Self {
            settler: Settler::new(ledger.clone()),
            ledger,
            gateway,
            config,
            email_pattern: compile("email", EMAIL_PATTERN)?,
            reference_pattern: compile("reference", REFERENCE_PATTERN)?,
        })
    }

    fn new_reference() -> String {
        format!("CF-{}", Uuid::new_v4().simple()).to_uppercase()
    }

    fn validate(&self, request: &InitializePayment) -> AppResult<i64> {
        if request.amount < self.config.min_donation_amount {
            return Err(AppError::validation(
                "amount",
                format!(
                    "minimum donation is {} {}",
                    self.config.min_donation_amount, self.config.currency
                ),
            ));
        }

        if !self.email_pattern.is_match(request.email.trim()) {
            return Err(AppError::validation("email", "must be a valid email address"));
        }

        to_minor_units(&request.amount)
    }

    /// Open a gateway charge for a donation.
    ///
    /// The pending donation is recorded under a locally generated reference
    /// before the gateway is called, so a webhook can always find it.
    pub async fn initialize(&self, request: InitializePayment) -> AppResult<InitializedPayment> {
        let minor_amount = self.validate(&request)?;

        let campaign = self
            .ledger
            .find_campaign(request.campaign_id)
            .await?
            .ok_or_else(|| AppError::not_found("Campaign", request.campaign_id))?;

        let reference = Self::new_reference();
        info!(
            "Initializing payment {} of {} for campaign {}",
            reference, request.amount, campaign.id
        );

        self.ledger
            .insert_donation(&NewDonation {
                campaign_id: campaign.id,
                donor_id: request.metadata.donor_id,
                amount: request.amount.clone(),
                currency: self.config.currency.clone(),
                payment_reference: reference.clone(),
                message: request.metadata.message.clone(),
                is_anonymous: request.metadata.is_anonymous,
            })
            .await?;

        let charge = PaymentRequest {
            email: request.email.trim().to_string(),
            amount: minor_amount,
            currency: self.config.currency.clone(),
            reference: reference.clone(),
            callback_url: self.config.callback_url.clone(),
            metadata: ChargeMetadata {
                campaign_id: campaign.id,
                donor_id: request.metadata.donor_id,
                is_anonymous: request.metadata.is_anonymous,
                message: request.metadata.message,
            },
        };

        match self.gateway.initialize_charge(charge).await {
            Ok(response) => {
                if response.reference != reference {
                    warn!(
                        "Gateway returned reference {} for charge {}",
                        response.reference, reference
                    );
                }
                info!("Payment initialized: {}", reference);
                Ok(InitializedPayment {
                    authorization_url: response.authorization_url,
                    access_code: response.access_code,
                    reference,
                })
            }
            Err(err) if err.is_timeout() => {
                // The charge may exist upstream; keep the row for the webhook.
                warn!("Charge {} outcome unknown, keeping pending donation", reference);
                Err(err.with_context(format!("reference {}", reference)))
            }
            Err(err) => {
                error!("Charge {} rejected by gateway: {}", reference, err);
                if let Err(cleanup) = self.ledger.discard_pending_donation(&reference).await {
                    error!(
                        "Failed to discard provisional donation {}: {}",
                        reference, cleanup
                    );
                }
                Err(err)
            }
        }
    }

    /// Ask the gateway for the outcome of `reference` and settle the donation
    pub async fn verify(&self, reference: &str) -> AppResult<VerifiedPayment> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(AppError::validation("reference", "cannot be empty"));
        }
        if !self.reference_pattern.is_match(reference) {
            return Err(AppError::validation(
                "reference",
                "may only contain letters, digits, '-' and '_'",
            ));
        }

        info!("Verifying payment: {}", reference);
        let verification = self.gateway.verify_charge(reference).await?;
        info!(
            "Payment {} verified: {}",
            reference, verification.gateway_status
        );

        let outcome = if verification.status.is_success() {
            DonationStatus::Completed
        } else {
            DonationStatus::Failed
        };
        let settlement = self.settler.settle(reference, outcome).await?;

        Ok(VerifiedPayment {
            status: verification.gateway_status,
            amount: from_minor_units(verification.amount),
            reference: verification.reference,
            message: verification.message,
            donation_status: settlement.donation.status,
        })
    }
}
