use std::fmt;
use thiserror::Error;

/// What went wrong talking to the ledger store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DatabaseErrorKind {
    /// The store could not be reached (pool closed or exhausted, socket failure)
    #[error("ledger store unavailable: {message}")]
    Unavailable { message: String },

    #[error("{entity} '{id}' does not exist in the ledger")]
    NotFound { entity: String, id: String },

    /// A unique key was reused, e.g. a payment reference
    #[error("duplicate entry rejected by '{constraint}'")]
    Duplicate { constraint: String },

    /// A row points at something that does not exist, e.g. an unknown campaign
    #[error("dangling reference rejected by '{constraint}'")]
    DanglingReference { constraint: String },

    /// A CHECK constraint refused the row (negative amounts and the like)
    #[error("row rejected by check '{constraint}'")]
    CheckViolation { constraint: String },

    /// Serialization failure or deadlock; the statement can be replayed
    #[error("concurrent update conflict: {message}")]
    WriteConflict { message: String },

    /// A column held a value the domain types cannot represent
    #[error("unreadable ledger value: {message}")]
    Decode { message: String },

    #[error("ledger transaction failed: {message}")]
    Transaction { message: String },

    #[error("ledger query failed: {message}")]
    Query { message: String },
}

pub type DbResult<T> = Result<T, DatabaseError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseError {
    pub kind: DatabaseErrorKind,
    pub context: Option<String>,
}

impl fmt::Display for DatabaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.context {
            Some(context) => write!(f, "{} ({})", self.kind, context),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for DatabaseError {}

impl DatabaseError {
    pub fn new(kind: DatabaseErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        Self::new(DatabaseErrorKind::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        })
    }

    pub fn with_context<S: Into<String>>(mut self, context: S) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Whether replaying the same statement could succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind,
            DatabaseErrorKind::Unavailable { .. } | DatabaseErrorKind::WriteConflict { .. }
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, DatabaseErrorKind::NotFound { .. })
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self.kind, DatabaseErrorKind::Duplicate { .. })
    }

    pub fn from_sqlx(error: sqlx::Error) -> Self {
        let kind = match error {
            sqlx::Error::RowNotFound => {
                return Self::not_found("Row", "unknown");
            }
            sqlx::Error::PoolTimedOut => DatabaseErrorKind::Unavailable {
                message: "timed out waiting for a pooled connection".to_string(),
            },
            sqlx::Error::PoolClosed => DatabaseErrorKind::Unavailable {
                message: "connection pool is closed".to_string(),
            },
            sqlx::Error::Io(io) => DatabaseErrorKind::Unavailable {
                message: io.to_string(),
            },
            sqlx::Error::ColumnDecode { index, source } => DatabaseErrorKind::Decode {
                message: format!("column {}: {}", index, source),
            },
            sqlx::Error::Decode(source) => DatabaseErrorKind::Decode {
                message: source.to_string(),
            },
            sqlx::Error::Database(db) => {
                let constraint = db.constraint().unwrap_or("unnamed").to_string();
                match db.code().as_deref() {
                    Some("23505") => DatabaseErrorKind::Duplicate { constraint },
                    Some("23503") => DatabaseErrorKind::DanglingReference { constraint },
                    Some("23514") => DatabaseErrorKind::CheckViolation { constraint },
                    Some("40001") | Some("40P01") => DatabaseErrorKind::WriteConflict {
                        message: db.message().to_string(),
                    },
                    _ => DatabaseErrorKind::Query {
                        message: db.message().to_string(),
                    },
                }
            }
            other => DatabaseErrorKind::Query {
                message: other.to_string(),
            },
        };
        Self::new(kind)
    }
}

impl From<sqlx::Error> for DatabaseError {
    fn from(error: sqlx::Error) -> Self {
        Self::from_sqlx(error)
    }
}
