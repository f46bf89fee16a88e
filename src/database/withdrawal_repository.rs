use crate::database::error::{DatabaseError, DbResult};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// Withdrawal status (`withdrawal_status` enum in Postgres)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "withdrawal_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum WithdrawalStatus {
    Pending,
    Processing,
    Completed,
    Rejected,
}

impl WithdrawalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WithdrawalStatus::Pending => "pending",
            WithdrawalStatus::Processing => "processing",
            WithdrawalStatus::Completed => "completed",
            WithdrawalStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(WithdrawalStatus::Pending),
            "processing" => Some(WithdrawalStatus::Processing),
            "completed" => Some(WithdrawalStatus::Completed),
            "rejected" => Some(WithdrawalStatus::Rejected),
            _ => None,
        }
    }

    /// Statuses whose amount is no longer available to the campaign
    pub fn is_committed(&self) -> bool {
        matches!(
            self,
            WithdrawalStatus::Processing | WithdrawalStatus::Completed
        )
    }
}

/// Withdrawal entity
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Withdrawal {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub creator_id: Uuid,
    pub amount: BigDecimal,
    pub account_name: String,
    pub account_number: String,
    pub bank_name: String,
    pub status: WithdrawalStatus,
    pub processed_by: Option<Uuid>,
    pub processed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub notes: Option<String>,
    pub requested_at: Option<chrono::DateTime<chrono::Utc>>,
}

const WITHDRAWAL_COLUMNS: &str = "id, campaign_id, creator_id, amount, account_name, \
     account_number, bank_name, COALESCE(status, 'pending'::withdrawal_status) AS status, \
     processed_by, processed_at, notes, requested_at";

/// Withdrawal Repository. Every status change is guarded by the current status.
pub struct WithdrawalRepository {
    pool: PgPool,
}

impl WithdrawalRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> DbResult<Option<Withdrawal>> {
        sqlx::query_as::<_, Withdrawal>(&format!(
            "SELECT {} FROM withdrawals WHERE id = $1",
            WITHDRAWAL_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from_sqlx)
    }

    /// List withdrawals, optionally filtered by status, newest first
    pub async fn find_all(&self, status: Option<WithdrawalStatus>) -> DbResult<Vec<Withdrawal>> {
        sqlx::query_as::<_, Withdrawal>(&format!(
            "SELECT {} FROM withdrawals
             WHERE $1::withdrawal_status IS NULL OR status = $1
             ORDER BY requested_at DESC NULLS LAST",
            WITHDRAWAL_COLUMNS
        ))
        .bind(status)
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::from_sqlx)
    }

    /// `pending -> processing`; `None` when the withdrawal was not pending
    pub async fn claim(&self, id: Uuid) -> DbResult<Option<Withdrawal>> {
        sqlx::query_as::<_, Withdrawal>(&format!(
            "UPDATE withdrawals SET status = 'processing'
             WHERE id = $1 AND status = 'pending'
             RETURNING {}",
            WITHDRAWAL_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from_sqlx)
    }

    /// Undo a claim that never reached the gateway successfully
    pub async fn release(&self, id: Uuid) -> DbResult<bool> {
        let result = sqlx::query(
            "UPDATE withdrawals SET status = 'pending'
             WHERE id = $1 AND status = 'processing' AND processed_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::from_sqlx)?;

        Ok(result.rows_affected() > 0)
    }

    /// Stamp a claimed withdrawal with its processor and notes
    pub async fn stamp_processing(
        &self,
        id: Uuid,
        processed_by: Uuid,
        notes: &str,
    ) -> DbResult<Option<Withdrawal>> {
        sqlx::query_as::<_, Withdrawal>(&format!(
            "UPDATE withdrawals
             SET processed_by = $2, processed_at = NOW(), notes = $3
             WHERE id = $1 AND status = 'processing' AND processed_at IS NULL
             RETURNING {}",
            WITHDRAWAL_COLUMNS
        ))
        .bind(id)
        .bind(processed_by)
        .bind(notes)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from_sqlx)
    }

    /// `pending -> rejected`; `None` when the withdrawal was not pending
    pub async fn reject(
        &self,
        id: Uuid,
        processed_by: Uuid,
        notes: Option<&str>,
    ) -> DbResult<Option<Withdrawal>> {
        sqlx::query_as::<_, Withdrawal>(&format!(
            "UPDATE withdrawals
             SET status = 'rejected', processed_by = $2, processed_at = NOW(),
                 notes = COALESCE($3, notes)
             WHERE id = $1 AND status = 'pending'
             RETURNING {}",
            WITHDRAWAL_COLUMNS
        ))
        .bind(id)
        .bind(processed_by)
        .bind(notes)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from_sqlx)
    }

    /// Sum of processing and completed withdrawals for a campaign
    pub async fn committed_total(
        &self,
        campaign_id: Uuid,
        excluding: Option<Uuid>,
    ) -> DbResult<BigDecimal> {
        sqlx::query_scalar::<_, BigDecimal>(
            "SELECT COALESCE(SUM(amount), 0) FROM withdrawals
             WHERE campaign_id = $1
               AND status IN ('processing', 'completed')
               AND ($2::uuid IS NULL OR id <> $2)",
        )
        .bind(campaign_id)
        .bind(excluding)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_sqlx)
    }
}
