//! HTTP surface
//!
//! Handlers extract the request, call into [`crate::services`] and let
//! [`AppError`]'s `IntoResponse` impl render failures.

pub mod admin;
pub mod health;
pub mod payments;
pub mod withdrawals;

use crate::config::Config;
use crate::database::repository::LedgerStore;
use crate::error::{AppError, AppResult};
use crate::identity::IdentityProvider;
use crate::payments::PaymentProvider;
use crate::services::{AdminService, PaymentService, WebhookService, WithdrawalService};
use axum::extract::rejection::JsonRejection;
use axum::routing::{get, post};
use axum::{Json, Router};
use http::{header, HeaderMap, HeaderName};
use std::sync::Arc;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub payments: Arc<PaymentService>,
    pub webhooks: Arc<WebhookService>,
    pub withdrawals: Arc<WithdrawalService>,
    pub admin: Arc<AdminService>,
    pub ledger: Arc<dyn LedgerStore>,
    pub environment: String,
}

impl AppState {
    pub fn new(
        config: &Config,
        ledger: Arc<dyn LedgerStore>,
        gateway: Arc<dyn PaymentProvider>,
        identity: Arc<dyn IdentityProvider>,
    ) -> AppResult<Self> {
        Ok(Self {
            payments: Arc::new(PaymentService::new(
                ledger.clone(),
                gateway.clone(),
                config.payments.clone(),
            )?),
            webhooks: Arc::new(WebhookService::new(ledger.clone(), gateway.clone())),
            withdrawals: Arc::new(WithdrawalService::new(
                ledger.clone(),
                gateway,
                identity.clone(),
                config.payments.clone(),
            )),
            admin: Arc::new(AdminService::new(ledger.clone(), identity)),
            ledger,
            environment: config.server.environment.clone(),
        })
    }
}

pub fn router(state: AppState) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/payments/initialize", post(payments::initialize_payment))
        .route("/payments/verify", post(payments::verify_payment))
        .route("/webhooks/paystack", post(payments::paystack_webhook))
        .route("/withdrawals/process", post(withdrawals::process_withdrawal))
        .route("/admin/withdrawals", get(admin::list_withdrawals))
        .route(
            "/admin/campaigns/:id/reconciliation",
            get(admin::campaign_reconciliation),
        )
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
        .with_state(state)
}

/// Turn a JSON extractor rejection into a validation error
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::validation("body", rejection.body_text()))
}

pub(crate) fn authorization(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
}
