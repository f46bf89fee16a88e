use crate::database::error::{DatabaseError, DbResult};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

/// Donation payment status (`payment_status` enum in Postgres)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "payment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DonationStatus {
    Pending,
    #[sqlx(rename = "successful")]
    Completed,
    Failed,
    Refunded,
}

impl DonationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DonationStatus::Pending => "pending",
            DonationStatus::Completed => "completed",
            DonationStatus::Failed => "failed",
            DonationStatus::Refunded => "refunded",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, DonationStatus::Pending)
    }

    /// Settlement only ever moves a pending donation to completed or failed
    pub fn can_transition_to(&self, next: DonationStatus) -> bool {
        matches!(
            (self, next),
            (DonationStatus::Pending, DonationStatus::Completed)
                | (DonationStatus::Pending, DonationStatus::Failed)
        )
    }
}

/// Donation entity
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Donation {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub donor_id: Option<Uuid>,
    pub amount: BigDecimal,
    pub currency: Option<String>,
    pub payment_reference: String,
    #[sqlx(rename = "payment_status")]
    pub status: DonationStatus,
    pub message: Option<String>,
    pub is_anonymous: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Fields supplied when a provisional donation is recorded
#[derive(Debug, Clone)]
pub struct NewDonation {
    pub campaign_id: Uuid,
    pub donor_id: Option<Uuid>,
    pub amount: BigDecimal,
    pub currency: String,
    pub payment_reference: String,
    pub message: Option<String>,
    pub is_anonymous: bool,
}

const DONATION_COLUMNS: &str = "id, campaign_id, donor_id, amount, currency, payment_reference, \
     COALESCE(payment_status, 'pending'::payment_status) AS payment_status, message, \
     COALESCE(is_anonymous, false) AS is_anonymous, COALESCE(created_at, NOW()) AS created_at";

/// Donation Repository for donation-specific operations
pub struct DonationRepository {
    pool: PgPool,
}

impl DonationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a pending donation keyed by its payment reference
    pub async fn insert_pending(&self, donation: &NewDonation) -> DbResult<Donation> {
        sqlx::query_as::<_, Donation>(&format!(
            "INSERT INTO donations
             (campaign_id, donor_id, amount, currency, payment_reference, paystack_reference,
              payment_status, message, is_anonymous, created_at)
             VALUES ($1, $2, $3, $4, $5, $5, 'pending', $6, $7, NOW())
             RETURNING {}",
            DONATION_COLUMNS
        ))
        .bind(donation.campaign_id)
        .bind(donation.donor_id)
        .bind(&donation.amount)
        .bind(&donation.currency)
        .bind(&donation.payment_reference)
        .bind(&donation.message)
        .bind(donation.is_anonymous)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_sqlx)
    }

    /// Delete a donation that never left `pending`
    pub async fn delete_pending(&self, reference: &str) -> DbResult<bool> {
        let result = sqlx::query(
            "DELETE FROM donations WHERE payment_reference = $1 AND payment_status = 'pending'",
        )
        .bind(reference)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::from_sqlx)?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn find_by_reference(&self, reference: &str) -> DbResult<Option<Donation>> {
        sqlx::query_as::<_, Donation>(&format!(
            "SELECT {} FROM donations WHERE payment_reference = $1",
            DONATION_COLUMNS
        ))
        .bind(reference)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from_sqlx)
    }

    /// Sum of completed donations for a campaign
    pub async fn completed_total(&self, campaign_id: Uuid) -> DbResult<BigDecimal> {
        sqlx::query_scalar::<_, BigDecimal>(
            "SELECT COALESCE(SUM(amount), 0) FROM donations
             WHERE campaign_id = $1 AND payment_status = 'successful'",
        )
        .bind(campaign_id)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_sqlx)
    }

    /// Conditionally move a pending donation to `next`.
    ///
    /// Returns the updated row, or `None` when no pending donation carries the
    /// reference (unknown, or already settled).
    pub async fn transition_from_pending(
        conn: &mut PgConnection,
        reference: &str,
        next: DonationStatus,
    ) -> DbResult<Option<Donation>> {
        sqlx::query_as::<_, Donation>(&format!(
            "UPDATE donations SET payment_status = $2
             WHERE payment_reference = $1 AND payment_status = 'pending'
             RETURNING {}",
            DONATION_COLUMNS
        ))
        .bind(reference)
        .bind(next)
        .fetch_optional(conn)
        .await
        .map_err(DatabaseError::from_sqlx)
    }

    pub async fn find_by_reference_in(
        conn: &mut PgConnection,
        reference: &str,
    ) -> DbResult<Option<Donation>> {
        sqlx::query_as::<_, Donation>(&format!(
            "SELECT {} FROM donations WHERE payment_reference = $1",
            DONATION_COLUMNS
        ))
        .bind(reference)
        .fetch_optional(conn)
        .await
        .map_err(DatabaseError::from_sqlx)
    }
}
