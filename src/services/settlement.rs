//! Applying a gateway charge outcome to the ledger
//!
//! Webhook delivery and client verification both end here, so a donation is
//! settled and its campaign credited at most once no matter which path, or how
//! many deliveries, observe the outcome.

use crate::database::donation_repository::DonationStatus;
use crate::database::repository::{LedgerStore, Settlement};
use crate::error::{AppError, AppResult};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub struct Settler {
    ledger: Arc<dyn LedgerStore>,
}

impl Settler {
    pub fn new(ledger: Arc<dyn LedgerStore>) -> Self {
        Self { ledger }
    }

    /// Settle the donation carrying `reference` as completed or failed.
    ///
    /// Already-terminal donations come back unchanged with `applied == false`.
    pub async fn settle(&self, reference: &str, outcome: DonationStatus) -> AppResult<Settlement> {
        if !DonationStatus::Pending.can_transition_to(outcome) {
            return Err(AppError::validation(
                "status",
                format!("cannot settle a donation as {}", outcome.as_str()),
            ));
        }

        let settlement = self
            .ledger
            .settle_donation(reference, outcome)
            .await?
            .ok_or_else(|| AppError::not_found("Donation", reference))?;

        if settlement.applied {
            info!(
                "Donation {} settled as {} for campaign {}",
                reference,
                settlement.donation.status.as_str(),
                settlement.donation.campaign_id
            );
            if settlement.credited() {
                info!(
                    "Campaign {} credited with {}",
                    settlement.donation.campaign_id, settlement.donation.amount
                );
            }
        } else if settlement.donation.status != outcome {
            warn!(
                "Donation {} already {}; ignoring {} outcome",
                reference,
                settlement.donation.status.as_str(),
                outcome.as_str()
            );
        } else {
            info!(
                "Donation {} already {}; nothing to apply",
                reference,
                settlement.donation.status.as_str()
            );
        }

        Ok(settlement)
    }
}
