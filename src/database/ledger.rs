use crate::database::campaign_repository::{Campaign, CampaignRepository};
use crate::database::donation_repository::{
    Donation, DonationRepository, DonationStatus, NewDonation,
};
use crate::database::error::{DatabaseError, DbResult};
use crate::database::repository::{LedgerStore, Settlement};
use crate::database::role_repository::{AppRole, RoleRepository};
use crate::database::transaction::LedgerTransaction;
use crate::database::webhook_repository::WebhookRepository;
use crate::database::withdrawal_repository::{
    Withdrawal, WithdrawalRepository, WithdrawalStatus,
};
use async_trait::async_trait;
use bigdecimal::BigDecimal;
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

const WEBHOOK_SOURCE: &str = "paystack";

/// Postgres-backed ledger
pub struct PgLedger {
    pool: PgPool,
    donations: DonationRepository,
    campaigns: CampaignRepository,
    withdrawals: WithdrawalRepository,
    roles: RoleRepository,
    webhooks: WebhookRepository,
}

impl PgLedger {
    pub fn new(pool: PgPool) -> Self {
        Self {
            donations: DonationRepository::new(pool.clone()),
            campaigns: CampaignRepository::new(pool.clone()),
            withdrawals: WithdrawalRepository::new(pool.clone()),
            roles: RoleRepository::new(pool.clone()),
            webhooks: WebhookRepository::new(pool.clone()),
            pool,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl LedgerStore for PgLedger {
    async fn insert_donation(&self, donation: &NewDonation) -> DbResult<Donation> {
        self.donations.insert_pending(donation).await
    }

    async fn discard_pending_donation(&self, reference: &str) -> DbResult<bool> {
        self.donations.delete_pending(reference).await
    }

    async fn find_donation_by_reference(&self, reference: &str) -> DbResult<Option<Donation>> {
        self.donations.find_by_reference(reference).await
    }

    async fn settle_donation(
        &self,
        reference: &str,
        outcome: DonationStatus,
    ) -> DbResult<Option<Settlement>> {
        let mut tx = LedgerTransaction::begin(&self.pool, "settle donation").await?;

        let transitioned =
            DonationRepository::transition_from_pending(tx.conn()?, reference, outcome).await?;

        let settlement = match transitioned {
            Some(donation) => {
                if donation.status == DonationStatus::Completed {
                    let credited =
                        CampaignRepository::credit(tx.conn()?, donation.campaign_id, &donation.amount)
                            .await?;
                    if !credited {
                        tx.rollback().await?;
                        return Err(DatabaseError::not_found("Campaign", donation.campaign_id)
                            .with_context(format!("crediting donation {}", reference)));
                    }
                    info!(
                        "Credited campaign {} with {} from donation {}",
                        donation.campaign_id, donation.amount, reference
                    );
                }
                Some(Settlement {
                    donation,
                    applied: true,
                })
            }
            None => {
                let existing = DonationRepository::find_by_reference_in(tx.conn()?, reference).await?;
                if let Some(ref donation) = existing {
                    debug!(
                        "Donation {} already {}, settlement skipped",
                        reference,
                        donation.status.as_str()
                    );
                }
                existing.map(|donation| Settlement {
                    donation,
                    applied: false,
                })
            }
        };

        tx.commit().await?;
        Ok(settlement)
    }

    async fn completed_donation_total(&self, campaign_id: Uuid) -> DbResult<BigDecimal> {
        self.donations.completed_total(campaign_id).await
    }

    async fn find_campaign(&self, id: Uuid) -> DbResult<Option<Campaign>> {
        self.campaigns.find_by_id(id).await
    }

    async fn find_withdrawal(&self, id: Uuid) -> DbResult<Option<Withdrawal>> {
        self.withdrawals.find_by_id(id).await
    }

    async fn list_withdrawals(
        &self,
        status: Option<WithdrawalStatus>,
    ) -> DbResult<Vec<Withdrawal>> {
        self.withdrawals.find_all(status).await
    }

    async fn claim_withdrawal(&self, id: Uuid) -> DbResult<Option<Withdrawal>> {
        self.withdrawals.claim(id).await
    }

    async fn release_withdrawal(&self, id: Uuid) -> DbResult<bool> {
        self.withdrawals.release(id).await
    }

    async fn record_transfer(
        &self,
        id: Uuid,
        processed_by: Uuid,
        notes: &str,
    ) -> DbResult<Option<Withdrawal>> {
        self.withdrawals.stamp_processing(id, processed_by, notes).await
    }

    async fn reject_withdrawal(
        &self,
        id: Uuid,
        processed_by: Uuid,
        notes: Option<&str>,
    ) -> DbResult<Option<Withdrawal>> {
        self.withdrawals.reject(id, processed_by, notes).await
    }

    async fn committed_withdrawal_total(
        &self,
        campaign_id: Uuid,
        excluding: Option<Uuid>,
    ) -> DbResult<BigDecimal> {
        self.withdrawals.committed_total(campaign_id, excluding).await
    }

    async fn has_role(&self, user_id: Uuid, role: AppRole) -> DbResult<bool> {
        self.roles.has_role(user_id, role).await
    }

    async fn log_webhook_event(
        &self,
        event_type: &str,
        payload: &serde_json::Value,
    ) -> DbResult<Uuid> {
        self.webhooks
            .log_event(event_type, WEBHOOK_SOURCE, payload)
            .await
    }

    async fn mark_webhook_processed(&self, event_id: Uuid) -> DbResult<()> {
        self.webhooks.mark_processed(event_id).await
    }

    async fn record_webhook_failure(&self, event_id: Uuid, error: &str) -> DbResult<()> {
        self.webhooks.record_failure(event_id, error).await
    }

    async fn ping(&self) -> DbResult<()> {
        super::ping(&self.pool).await
    }
}
