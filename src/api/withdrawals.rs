use crate::api::{authorization, json_body, AppState};
use crate::error::AppResult;
use crate::services::{ProcessWithdrawal, WithdrawalOutcome};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;

/// `POST /withdrawals/process`
pub async fn process_withdrawal(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ProcessWithdrawal>, JsonRejection>,
) -> AppResult<Json<WithdrawalOutcome>> {
    let authorization = authorization(&headers);
    let request = match json_body(payload) {
        Ok(request) => request,
        Err(err) => {
            // Unauthenticated callers learn nothing about the body
            state.withdrawals.authorize(authorization).await?;
            return Err(err);
        }
    };

    Ok(Json(state.withdrawals.process(authorization, request).await?))
}
