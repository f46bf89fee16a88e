use crate::api::{json_body, AppState};
use crate::error::AppResult;
use crate::services::webhook::SIGNATURE_HEADER;
use crate::services::{InitializePayment, InitializedPayment, VerifiedPayment, WebhookAck};
use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct VerifyPaymentBody {
    pub reference: String,
}

/// `POST /payments/initialize`
pub async fn initialize_payment(
    State(state): State<AppState>,
    payload: Result<Json<InitializePayment>, JsonRejection>,
) -> AppResult<Json<InitializedPayment>> {
    let request = json_body(payload)?;
    Ok(Json(state.payments.initialize(request).await?))
}

/// `POST /payments/verify`
pub async fn verify_payment(
    State(state): State<AppState>,
    payload: Result<Json<VerifyPaymentBody>, JsonRejection>,
) -> AppResult<Json<VerifiedPayment>> {
    let body = json_body(payload)?;
    Ok(Json(state.payments.verify(&body.reference).await?))
}

/// `POST /webhooks/paystack`
///
/// Takes the body as raw bytes: the signature covers them exactly.
pub async fn paystack_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<WebhookAck>> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());
    Ok(Json(state.webhooks.handle(&body, signature).await?))
}
