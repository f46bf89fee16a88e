use crate::database::error::{DatabaseError, DbResult};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

/// Campaign lifecycle status (`campaign_status` enum in Postgres)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "campaign_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    Draft,
    Pending,
    Active,
    Completed,
    Suspended,
    Rejected,
}

/// Uploaded verification document descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationDocument {
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(rename = "type", default)]
    pub content_type: Option<String>,
}

/// Campaign entity
#[derive(Debug, Clone, FromRow)]
pub struct Campaign {
    pub id: Uuid,
    pub creator_id: Uuid,
    pub title: String,
    pub goal_amount: BigDecimal,
    pub current_amount: BigDecimal,
    pub currency: Option<String>,
    pub status: CampaignStatus,
    pub verified: bool,
    pub verification_documents: Json<Vec<VerificationDocument>>,
}

const CAMPAIGN_COLUMNS: &str = "id, creator_id, title, goal_amount, \
     COALESCE(current_amount, 0) AS current_amount, currency, \
     COALESCE(status, 'pending'::campaign_status) AS status, \
     COALESCE(verified, false) AS verified, \
     COALESCE(verification_documents, '[]'::jsonb) AS verification_documents";

/// Campaign Repository; the raised-amount counter is only written by settlement
pub struct CampaignRepository {
    pool: PgPool,
}

impl CampaignRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> DbResult<Option<Campaign>> {
        sqlx::query_as::<_, Campaign>(&format!(
            "SELECT {} FROM campaigns WHERE id = $1",
            CAMPAIGN_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from_sqlx)
    }

    /// Increment `current_amount` in place; returns whether the campaign exists
    pub async fn credit(
        conn: &mut PgConnection,
        campaign_id: Uuid,
        amount: &BigDecimal,
    ) -> DbResult<bool> {
        let result = sqlx::query(
            "UPDATE campaigns
             SET current_amount = COALESCE(current_amount, 0) + $2, updated_at = NOW()
             WHERE id = $1",
        )
        .bind(campaign_id)
        .bind(amount)
        .execute(conn)
        .await
        .map_err(DatabaseError::from_sqlx)?;

        Ok(result.rows_affected() > 0)
    }
}
