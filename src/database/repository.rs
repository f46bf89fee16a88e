use crate::database::campaign_repository::Campaign;
use crate::database::donation_repository::{Donation, DonationStatus, NewDonation};
use crate::database::error::DbResult;
use crate::database::role_repository::AppRole;
use crate::database::withdrawal_repository::{Withdrawal, WithdrawalStatus};
use async_trait::async_trait;
use bigdecimal::BigDecimal;
use uuid::Uuid;

/// Result of applying a gateway outcome to a donation
#[derive(Debug, Clone, PartialEq)]
pub struct Settlement {
    /// Donation as stored after the attempt
    pub donation: Donation,
    /// `true` only for the call that moved the donation out of `pending`
    pub applied: bool,
}

impl Settlement {
    /// Whether this settlement credited the campaign
    pub fn credited(&self) -> bool {
        self.applied && self.donation.status == DonationStatus::Completed
    }
}

/// Ledger store consumed by the payment handlers.
///
/// Every status change is a conditional update on the current status so that
/// concurrent handlers racing on the same row cannot both apply it.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Record a provisional pending donation
    async fn insert_donation(&self, donation: &NewDonation) -> DbResult<Donation>;

    /// Remove a donation that is still pending; returns whether a row went away
    async fn discard_pending_donation(&self, reference: &str) -> DbResult<bool>;

    async fn find_donation_by_reference(&self, reference: &str) -> DbResult<Option<Donation>>;

    /// Move the donation with `reference` from pending to `outcome`.
    ///
    /// When the transition applies and `outcome` is completed, the campaign's
    /// `current_amount` is incremented by the donation amount in the same unit
    /// of work. Already-settled donations are returned untouched with
    /// `applied == false`. `None` means no donation carries the reference.
    async fn settle_donation(
        &self,
        reference: &str,
        outcome: DonationStatus,
    ) -> DbResult<Option<Settlement>>;

    /// Sum of completed donations for a campaign
    async fn completed_donation_total(&self, campaign_id: Uuid) -> DbResult<BigDecimal>;

    async fn find_campaign(&self, id: Uuid) -> DbResult<Option<Campaign>>;

    async fn find_withdrawal(&self, id: Uuid) -> DbResult<Option<Withdrawal>>;

    /// Withdrawals, optionally filtered by status, newest first
    async fn list_withdrawals(&self, status: Option<WithdrawalStatus>)
        -> DbResult<Vec<Withdrawal>>;

    /// `pending -> processing`; `None` if the withdrawal was not pending
    async fn claim_withdrawal(&self, id: Uuid) -> DbResult<Option<Withdrawal>>;

    /// `processing -> pending` for a claim that was never stamped
    async fn release_withdrawal(&self, id: Uuid) -> DbResult<bool>;

    /// Stamp a claimed withdrawal with processor identity, time and notes
    async fn record_transfer(
        &self,
        id: Uuid,
        processed_by: Uuid,
        notes: &str,
    ) -> DbResult<Option<Withdrawal>>;

    /// `pending -> rejected`; `None` if the withdrawal was not pending
    async fn reject_withdrawal(
        &self,
        id: Uuid,
        processed_by: Uuid,
        notes: Option<&str>,
    ) -> DbResult<Option<Withdrawal>>;

    /// Sum of processing and completed withdrawals, optionally excluding one
    async fn committed_withdrawal_total(
        &self,
        campaign_id: Uuid,
        excluding: Option<Uuid>,
    ) -> DbResult<BigDecimal>;

    async fn has_role(&self, user_id: Uuid, role: AppRole) -> DbResult<bool>;

    /// Journal an authenticated webhook delivery
    async fn log_webhook_event(
        &self,
        event_type: &str,
        payload: &serde_json::Value,
    ) -> DbResult<Uuid>;

    async fn mark_webhook_processed(&self, event_id: Uuid) -> DbResult<()>;

    async fn record_webhook_failure(&self, event_id: Uuid, error: &str) -> DbResult<()>;

    /// Connectivity check
    async fn ping(&self) -> DbResult<()>;
}
