//! Application error types
//!
//! Every handler returns [`AppResult`]. Errors are grouped by where they come
//! from (domain rules, external services, our own infrastructure) and are
//! rendered as `{ "error": ..., "kind": ... }` at the HTTP boundary.

use crate::database::error::DatabaseError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

/// Violations of request or ledger rules
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("{message}")]
    Authentication { message: String },

    #[error("{message}")]
    Authorization { message: String },

    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    #[error("{entity} '{id}' not found")]
    NotFound { entity: String, id: String },

    #[error("{message}")]
    Conflict { message: String },

    #[error("Invalid webhook signature")]
    InvalidSignature,
}

/// Failures reported by, or while talking to, third-party services
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExternalError {
    #[error("{provider} error: {message}")]
    PaymentProvider {
        provider: String,
        message: String,
        is_retryable: bool,
    },

    #[error("{service} rate limit exceeded")]
    RateLimit {
        service: String,
        retry_after: Option<u64>,
    },

    /// The request may or may not have reached the provider.
    #[error("{service} did not confirm {operation}; outcome unknown")]
    Timeout { service: String, operation: String },

    #[error("Identity provider error: {message}")]
    Identity { message: String },
}

#[derive(Debug, Clone, Error)]
pub enum InfrastructureError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error(transparent)]
    Database(#[from] DatabaseError),

    /// Money moved at the gateway but the ledger could not record it.
    #[error("Transfer {transfer_code} succeeded but the ledger update failed: {message}")]
    Reconciliation {
        transfer_code: String,
        message: String,
    },
}

#[derive(Debug, Clone, Error)]
pub enum AppErrorKind {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    External(#[from] ExternalError),

    #[error(transparent)]
    Infrastructure(#[from] InfrastructureError),
}

#[derive(Debug, Clone)]
pub struct AppError {
    pub kind: AppErrorKind,
    pub context: Option<String>,
}

impl AppError {
    pub fn new(kind: AppErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    pub fn with_context<S: Into<String>>(mut self, context: S) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        DomainError::Authentication {
            message: message.into(),
        }
        .into()
    }

    pub fn authorization(message: impl Into<String>) -> Self {
        DomainError::Authorization {
            message: message.into(),
        }
        .into()
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        DomainError::Validation {
            field: field.into(),
            message: message.into(),
        }
        .into()
    }

    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DomainError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
        .into()
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        DomainError::Conflict {
            message: message.into(),
        }
        .into()
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        InfrastructureError::Configuration {
            message: message.into(),
        }
        .into()
    }

    /// Stable machine-readable code sent to clients
    pub fn code(&self) -> &'static str {
        match &self.kind {
            AppErrorKind::Domain(e) => match e {
                DomainError::Authentication { .. } => "authentication_error",
                DomainError::Authorization { .. } => "authorization_error",
                DomainError::Validation { .. } => "validation_error",
                DomainError::NotFound { .. } => "not_found_error",
                DomainError::Conflict { .. } => "conflict_error",
                DomainError::InvalidSignature => "signature_error",
            },
            AppErrorKind::External(e) => match e {
                ExternalError::PaymentProvider { .. } => "upstream_gateway_error",
                ExternalError::RateLimit { .. } => "rate_limited",
                ExternalError::Timeout { .. } => "outcome_unknown",
                ExternalError::Identity { .. } => "upstream_gateway_error",
            },
            AppErrorKind::Infrastructure(e) => match e {
                InfrastructureError::Configuration { .. } => "configuration_error",
                InfrastructureError::Database(_) => "database_error",
                InfrastructureError::Reconciliation { .. } => "reconciliation_required",
            },
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match &self.kind {
            AppErrorKind::Domain(e) => match e {
                DomainError::Authentication { .. } | DomainError::InvalidSignature => {
                    StatusCode::UNAUTHORIZED
                }
                DomainError::Authorization { .. } => StatusCode::FORBIDDEN,
                DomainError::Validation { .. } => StatusCode::BAD_REQUEST,
                DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
                DomainError::Conflict { .. } => StatusCode::CONFLICT,
            },
            AppErrorKind::External(e) => match e {
                ExternalError::PaymentProvider { .. } | ExternalError::Identity { .. } => {
                    StatusCode::BAD_GATEWAY
                }
                ExternalError::RateLimit { .. } => StatusCode::SERVICE_UNAVAILABLE,
                ExternalError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            },
            AppErrorKind::Infrastructure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(
            self.kind,
            AppErrorKind::External(ExternalError::Timeout { .. })
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self.kind,
            AppErrorKind::Domain(DomainError::NotFound { .. })
        )
    }

    /// Whether the caller can safely send the same request again.
    /// An unknown outcome is never retryable: money may have moved.
    pub fn is_retryable(&self) -> bool {
        match &self.kind {
            AppErrorKind::External(ExternalError::PaymentProvider { is_retryable, .. }) => {
                *is_retryable
            }
            AppErrorKind::External(ExternalError::RateLimit { .. }) => true,
            AppErrorKind::Infrastructure(InfrastructureError::Database(db)) => db.is_retryable(),
            _ => false,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.context {
            Some(context) => write!(f, "{} ({})", self.kind, context),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for AppError {}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        Self::new(AppErrorKind::Domain(err))
    }
}

impl From<ExternalError> for AppError {
    fn from(err: ExternalError) -> Self {
        Self::new(AppErrorKind::External(err))
    }
}

impl From<InfrastructureError> for AppError {
    fn from(err: InfrastructureError) -> Self {
        Self::new(AppErrorKind::Infrastructure(err))
    }
}

impl From<DatabaseError> for AppError {
    fn from(err: DatabaseError) -> Self {
        InfrastructureError::Database(err).into()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    kind: &'static str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(retryable = self.is_retryable(), "Request failed: {}", self);
        } else {
            tracing::warn!("Request rejected: {}", self);
        }

        let body = ErrorBody {
            error: self.to_string(),
            kind: self.code(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::error::DatabaseErrorKind;

    #[test]
    fn test_domain_errors_map_to_client_statuses() {
        assert_eq!(
            AppError::authentication("Missing authorization header").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::authorization("Only admins can process withdrawals").status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::validation("amount", "too low").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::not_found("Withdrawal", "w-1").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::conflict("Withdrawal already processed").status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::from(DomainError::InvalidSignature).code(),
            "signature_error"
        );
    }

    #[test]
    fn test_gateway_timeout_is_outcome_unknown() {
        let err: AppError = ExternalError::Timeout {
            service: "Paystack".to_string(),
            operation: "transfer".to_string(),
        }
        .into();
        assert!(err.is_timeout());
        assert_eq!(err.code(), "outcome_unknown");
        assert_eq!(err.status_code(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn test_database_error_is_internal() {
        let err: AppError = DatabaseError::new(DatabaseErrorKind::Query {
            message: "boom".to_string(),
        })
        .into();
        assert_eq!(err.code(), "database_error");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_retryable_follows_source() {
        let unavailable: AppError = DatabaseError::new(DatabaseErrorKind::Unavailable {
            message: "pool closed".to_string(),
        })
        .into();
        assert!(unavailable.is_retryable());

        let unknown: AppError = ExternalError::Timeout {
            service: "Paystack".to_string(),
            operation: "transfer".to_string(),
        }
        .into();
        assert!(!unknown.is_retryable());
        assert!(!AppError::not_found("Donation", "R1").is_retryable());
    }

    #[test]
    fn test_display_includes_context() {
        let err = AppError::not_found("Donation", "R1").with_context("charge.success");
        assert_eq!(err.to_string(), "Donation 'R1' not found (charge.success)");
    }
}
