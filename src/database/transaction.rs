use crate::database::error::{DatabaseError, DatabaseErrorKind, DbResult};
use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use tracing::{debug, error as log_error};

/// A ledger unit of work, e.g. settling a donation and crediting its
/// campaign. Dropping it without `commit` rolls back.
pub struct LedgerTransaction {
    label: &'static str,
    inner: Option<Transaction<'static, Postgres>>,
}

impl LedgerTransaction {
    pub async fn begin(pool: &PgPool, label: &'static str) -> DbResult<Self> {
        let inner = pool.begin().await.map_err(|e| {
            log_error!(unit = label, error = %e, "Could not open ledger transaction");
            DatabaseError::from_sqlx(e).with_context(label)
        })?;
        debug!(unit = label, "Ledger transaction opened");

        Ok(Self {
            label,
            inner: Some(inner),
        })
    }

    pub async fn commit(mut self) -> DbResult<()> {
        let label = self.label;
        let tx = self.inner.take().ok_or_else(|| Self::already_finished(label))?;

        tx.commit().await.map_err(|e| {
            log_error!(unit = label, error = %e, "Ledger commit failed");
            DatabaseError::from_sqlx(e).with_context(label)
        })?;
        debug!(unit = label, "Ledger transaction committed");
        Ok(())
    }

    pub async fn rollback(mut self) -> DbResult<()> {
        let label = self.label;
        let tx = self.inner.take().ok_or_else(|| Self::already_finished(label))?;

        tx.rollback().await.map_err(|e| {
            log_error!(unit = label, error = %e, "Ledger rollback failed");
            DatabaseError::from_sqlx(e).with_context(label)
        })?;
        debug!(unit = label, "Ledger transaction rolled back");
        Ok(())
    }

    /// Connection that runs statements inside this unit of work
    pub fn conn(&mut self) -> DbResult<&mut PgConnection> {
        let label = self.label;
        self.inner
            .as_deref_mut()
            .ok_or_else(|| Self::already_finished(label))
    }

    fn already_finished(label: &'static str) -> DatabaseError {
        DatabaseError::new(DatabaseErrorKind::Transaction {
            message: "already committed or rolled back".to_string(),
        })
        .with_context(label)
    }
}
