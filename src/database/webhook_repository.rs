use crate::database::error::{DatabaseError, DbResult};
use sqlx::PgPool;
use uuid::Uuid;

/// Journal of authenticated gateway deliveries.
///
/// Every delivery gets its own row, redeliveries included, keyed by the
/// charge or transfer reference it carried so an operator can trace what
/// the gateway told us about a donation.
pub struct WebhookRepository {
    pool: PgPool,
}

impl WebhookRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn log_event(
        &self,
        event_type: &str,
        source: &str,
        payload: &serde_json::Value,
    ) -> DbResult<Uuid> {
        let reference = payload
            .pointer("/data/reference")
            .and_then(serde_json::Value::as_str);

        sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO webhook_events (id, event_type, source, reference, payload, processed, attempts, created_at)
             VALUES ($1, $2, $3, $4, $5, false, 0, NOW())
             RETURNING id",
        )
        .bind(Uuid::new_v4())
        .bind(event_type)
        .bind(source)
        .bind(reference)
        .bind(payload)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_sqlx(e).with_context("journal webhook"))
    }

    /// The delivery was applied; clears any error left by an earlier attempt
    pub async fn mark_processed(&self, event_id: Uuid) -> DbResult<()> {
        sqlx::query(
            "UPDATE webhook_events
             SET processed = true, processed_at = NOW(), attempts = attempts + 1, last_error = NULL
             WHERE id = $1",
        )
        .bind(event_id)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::from_sqlx)?;

        Ok(())
    }

    pub async fn record_failure(&self, event_id: Uuid, error: &str) -> DbResult<()> {
        sqlx::query(
            "UPDATE webhook_events
             SET processed = false, attempts = attempts + 1, last_error = $2
             WHERE id = $1",
        )
        .bind(event_id)
        .bind(error)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::from_sqlx)?;

        Ok(())
    }
}
