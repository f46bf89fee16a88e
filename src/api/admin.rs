use crate::api::{authorization, AppState};
use crate::database::withdrawal_repository::Withdrawal;
use crate::error::AppResult;
use crate::services::CampaignReconciliation;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct WithdrawalFilter {
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WithdrawalsResponse {
    pub count: usize,
    pub withdrawals: Vec<Withdrawal>,
}

/// `GET /admin/withdrawals?status=`
pub async fn list_withdrawals(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(filter): Query<WithdrawalFilter>,
) -> AppResult<Json<WithdrawalsResponse>> {
    let withdrawals = state
        .admin
        .list_withdrawals(authorization(&headers), filter.status.as_deref())
        .await?;

    Ok(Json(WithdrawalsResponse {
        count: withdrawals.len(),
        withdrawals,
    }))
}

/// `GET /admin/campaigns/:id/reconciliation`
pub async fn campaign_reconciliation(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(campaign_id): Path<Uuid>,
) -> AppResult<Json<CampaignReconciliation>> {
    let report = state
        .admin
        .campaign_reconciliation(authorization(&headers), campaign_id)
        .await?;
    Ok(Json(report))
}
