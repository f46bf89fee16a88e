//! Admin-only views over the ledger

use crate::database::repository::LedgerStore;
use crate::database::role_repository::AppRole;
use crate::database::withdrawal_repository::{Withdrawal, WithdrawalStatus};
use crate::error::{AppError, AppResult};
use crate::identity::{bearer_token, IdentityProvider};
use bigdecimal::BigDecimal;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Resolve the caller from an `Authorization` header value and require the
/// admin role. Returns the admin's user id.
pub async fn require_admin(
    identity: &dyn IdentityProvider,
    ledger: &dyn LedgerStore,
    authorization: Option<&str>,
) -> AppResult<Uuid> {
    let token = bearer_token(authorization)?;
    let user_id = identity.resolve_user(token).await?;

    if !ledger.has_role(user_id, AppRole::Admin).await? {
        warn!("User {} attempted an admin action", user_id);
        return Err(AppError::authorization(
            "Only admins can process withdrawals",
        ));
    }

    debug!("Admin {} authorized", user_id);
    Ok(user_id)
}

/// Campaign counter checked against the donations and withdrawals behind it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignReconciliation {
    pub campaign_id: Uuid,
    pub current_amount: BigDecimal,
    pub completed_donations: BigDecimal,
    /// `current_amount - completed_donations`; zero when the ledger is consistent
    pub drift: BigDecimal,
    pub committed_withdrawals: BigDecimal,
    pub withdrawable_balance: BigDecimal,
    pub consistent: bool,
}

pub struct AdminService {
    ledger: Arc<dyn LedgerStore>,
    identity: Arc<dyn IdentityProvider>,
}

impl AdminService {
    pub fn new(ledger: Arc<dyn LedgerStore>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self { ledger, identity }
    }

    pub async fn list_withdrawals(
        &self,
        authorization: Option<&str>,
        status: Option<&str>,
    ) -> AppResult<Vec<Withdrawal>> {
        require_admin(self.identity.as_ref(), self.ledger.as_ref(), authorization).await?;

        let status = match status.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => Some(
                WithdrawalStatus::parse(raw)
                    .ok_or_else(|| AppError::validation("status", format!("unknown status {}", raw)))?,
            ),
            None => None,
        };

        Ok(self.ledger.list_withdrawals(status).await?)
    }

    pub async fn campaign_reconciliation(
        &self,
        authorization: Option<&str>,
        campaign_id: Uuid,
    ) -> AppResult<CampaignReconciliation> {
        require_admin(self.identity.as_ref(), self.ledger.as_ref(), authorization).await?;

        let campaign = self
            .ledger
            .find_campaign(campaign_id)
            .await?
            .ok_or_else(|| AppError::not_found("Campaign", campaign_id))?;
        let completed_donations = self.ledger.completed_donation_total(campaign_id).await?;
        let committed_withdrawals = self
            .ledger
            .committed_withdrawal_total(campaign_id, None)
            .await?;

        let drift = &campaign.current_amount - &completed_donations;
        let withdrawable_balance = &campaign.current_amount - &committed_withdrawals;
        let consistent = drift == BigDecimal::from(0);
        if !consistent {
            warn!(
                "Campaign {} counter {} differs from completed donations {}",
                campaign_id, campaign.current_amount, completed_donations
            );
        }

        Ok(CampaignReconciliation {
            campaign_id,
            current_amount: campaign.current_amount,
            completed_donations,
            drift,
            committed_withdrawals,
            withdrawable_balance,
            consistent,
        })
    }
}
