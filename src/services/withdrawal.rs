//! Admin approval and rejection of creator withdrawals
//!
//! A withdrawal is claimed (`pending -> processing`) before the transfer is
//! sent, so concurrent approvals cannot both reach the gateway.

use crate::config::PaymentsConfig;
use crate::database::repository::LedgerStore;
use crate::database::withdrawal_repository::{Withdrawal, WithdrawalStatus};
use crate::error::{AppError, AppResult, InfrastructureError};
use crate::identity::IdentityProvider;
use crate::payments::money::to_minor_units;
use crate::payments::types::WithdrawalRequest;
use crate::payments::PaymentProvider;
use crate::services::admin::require_admin;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WithdrawalAction {
    Approve,
    Reject,
}

impl FromStr for WithdrawalAction {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "approve" => Ok(WithdrawalAction::Approve),
            "reject" => Ok(WithdrawalAction::Reject),
            _ => Err(AppError::validation(
                "action",
                "Invalid action. Use \"approve\" or \"reject\"",
            )),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessWithdrawal {
    pub withdrawal_id: Uuid,
    pub action: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WithdrawalOutcome {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer_code: Option<String>,
}

pub struct WithdrawalService {
    ledger: Arc<dyn LedgerStore>,
    gateway: Arc<dyn PaymentProvider>,
    identity: Arc<dyn IdentityProvider>,
    config: PaymentsConfig,
}

impl WithdrawalService {
    pub fn new(
        ledger: Arc<dyn LedgerStore>,
        gateway: Arc<dyn PaymentProvider>,
        identity: Arc<dyn IdentityProvider>,
        config: PaymentsConfig,
    ) -> Self {
        Self {
            ledger,
            gateway,
            identity,
            config,
        }
    }

    /// Transfer reference for a withdrawal; stable so the gateway can dedupe
    fn transfer_reference(id: Uuid) -> String {
        format!("WD-{}", id.simple())
    }

    /// Resolve the caller and require the admin role
    pub async fn authorize(&self, authorization: Option<&str>) -> AppResult<Uuid> {
        require_admin(self.identity.as_ref(), self.ledger.as_ref(), authorization).await
    }

    pub async fn process(
        &self,
        authorization: Option<&str>,
        request: ProcessWithdrawal,
    ) -> AppResult<WithdrawalOutcome> {
        let admin_id = self.authorize(authorization).await?;
        let action = WithdrawalAction::from_str(&request.action)?;

        info!(
            "Processing withdrawal: {} {:?}",
            request.withdrawal_id, action
        );

        let withdrawal = self
            .ledger
            .find_withdrawal(request.withdrawal_id)
            .await?
            .ok_or_else(|| AppError::not_found("Withdrawal", request.withdrawal_id))?;

        if withdrawal.status != WithdrawalStatus::Pending {
            return Err(AppError::conflict("Withdrawal already processed"));
        }

        match action {
            WithdrawalAction::Approve => self.approve(withdrawal, admin_id).await,
            WithdrawalAction::Reject => self.reject(withdrawal, admin_id).await,
        }
    }

    async fn ensure_withdrawable(&self, withdrawal: &Withdrawal) -> AppResult<()> {
        let campaign = self
            .ledger
            .find_campaign(withdrawal.campaign_id)
            .await?
            .ok_or_else(|| AppError::not_found("Campaign", withdrawal.campaign_id))?;
        let committed = self
            .ledger
            .committed_withdrawal_total(withdrawal.campaign_id, Some(withdrawal.id))
            .await?;
        let available = campaign.current_amount - committed;

        if withdrawal.amount > available {
            warn!(
                "Withdrawal {} of {} exceeds withdrawable balance {}",
                withdrawal.id, withdrawal.amount, available
            );
            return Err(AppError::validation(
                "amount",
                format!(
                    "{} exceeds the campaign's withdrawable balance of {}",
                    withdrawal.amount, available
                ),
            ));
        }
        Ok(())
    }

    async fn approve(&self, withdrawal: Withdrawal, admin_id: Uuid) -> AppResult<WithdrawalOutcome> {
        self.ensure_withdrawable(&withdrawal).await?;
        let minor_amount = to_minor_units(&withdrawal.amount)?;

        let claimed = self
            .ledger
            .claim_withdrawal(withdrawal.id)
            .await?
            .ok_or_else(|| AppError::conflict("Withdrawal already processed"))?;

        let reference = Self::transfer_reference(claimed.id);
        let request = WithdrawalRequest {
            recipient_name: claimed.account_name.clone(),
            account_number: claimed.account_number.clone(),
            bank_name: claimed.bank_name.clone(),
            amount: minor_amount,
            currency: self.config.currency.clone(),
            reference: reference.clone(),
            reason: Some(format!("Withdrawal for campaign {}", claimed.campaign_id)),
        };

        match self.gateway.send_transfer(request).await {
            Ok(transfer) => {
                let notes = format!("Transfer initiated: {}", transfer.transfer_code);
                let recorded = self
                    .ledger
                    .record_transfer(claimed.id, admin_id, &notes)
                    .await;
                match recorded {
                    Ok(Some(_)) => {
                        info!(
                            "Withdrawal {} approved and transfer {} initiated",
                            claimed.id, transfer.transfer_code
                        );
                        Ok(WithdrawalOutcome {
                            message: "Withdrawal approved and transfer initiated".to_string(),
                            transfer_code: Some(transfer.transfer_code),
                        })
                    }
                    Ok(None) => Err(Self::reconciliation(
                        &transfer.transfer_code,
                        "withdrawal was no longer claimed",
                    )),
                    Err(e) => Err(Self::reconciliation(&transfer.transfer_code, &e.to_string())),
                }
            }
            Err(err) if err.is_timeout() => {
                let notes = format!(
                    "Transfer outcome unknown for reference {}; reconcile with the gateway",
                    reference
                );
                if let Err(e) = self
                    .ledger
                    .record_transfer(claimed.id, admin_id, &notes)
                    .await
                {
                    error!("Failed to note unknown transfer for {}: {}", claimed.id, e);
                }
                error!(
                    "Transfer for withdrawal {} timed out; left in processing",
                    claimed.id
                );
                Err(err.with_context(format!("transfer reference {}", reference)))
            }
            Err(err) => {
                error!("Transfer for withdrawal {} failed: {}", claimed.id, err);
                match self.ledger.release_withdrawal(claimed.id).await {
                    Ok(true) => {}
                    Ok(false) => warn!("Withdrawal {} was not released", claimed.id),
                    Err(e) => error!("Failed to release withdrawal {}: {}", claimed.id, e),
                }
                Err(err)
            }
        }
    }

    async fn reject(&self, withdrawal: Withdrawal, admin_id: Uuid) -> AppResult<WithdrawalOutcome> {
        self.ledger
            .reject_withdrawal(withdrawal.id, admin_id, None)
            .await?
            .ok_or_else(|| AppError::conflict("Withdrawal already processed"))?;

        info!("Withdrawal {} rejected", withdrawal.id);
        Ok(WithdrawalOutcome {
            message: "Withdrawal rejected".to_string(),
            transfer_code: None,
        })
    }

    fn reconciliation(transfer_code: &str, message: &str) -> AppError {
        error!(
            "Transfer {} succeeded but the withdrawal could not be updated: {}",
            transfer_code, message
        );
        InfrastructureError::Reconciliation {
            transfer_code: transfer_code.to_string(),
            message: message.to_string(),
        }
        .into()
    }
}
