use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::errors::AppError;
use crate::models::MembershipRequestRow;
use crate::services::membership_service::{
    self, ApprovalOutcome, ApproveRequest, NewMembershipRequest,
};

// Public endpoint: prospective members submit without an account.
pub async fn submit_request_handler(
    State(pool): State<SqlitePool>,
    Json(body): Json<NewMembershipRequest>,
) -> Result<(StatusCode, Json<MembershipRequestRow>), AppError> {
    let row = membership_service::submit_request(&pool, body).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

#[derive(Debug, Deserialize, Default)]
pub struct ListRequestsQuery {
    pub status: Option<String>,
}

pub async fn list_requests_handler(
    State(pool): State<SqlitePool>,
    Query(query): Query<ListRequestsQuery>,
) -> Result<Json<Vec<MembershipRequestRow>>, AppError> {
    membership_service::list_requests(&pool, query.status.as_deref())
        .await
        .map(Json)
}

pub async fn approve_request_handler(
    State(pool): State<SqlitePool>,
    Path(request_id): Path<String>,
    Json(body): Json<ApproveRequest>,
) -> Result<Json<ApprovalOutcome>, AppError> {
    membership_service::approve_request(&pool, &request_id, body)
        .await
        .map(Json)
}

pub async fn reject_request_handler(
    State(pool): State<SqlitePool>,
    Path(request_id): Path<String>,
) -> Result<Json<MembershipRequestRow>, AppError> {
    membership_service::reject_request(&pool, &request_id)
        .await
        .map(Json)
}
