use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::errors::AppError;
use crate::models::ActivityRow;
use crate::services::activity_service::{self, ActivityMembersView, NewActivity, UpdateActivity};
use crate::services::transport_service::{self, TransportPlanView};
use crate::web::middleware::auth::AuthenticatedUser;

pub async fn create_activity_handler(
    State(pool): State<SqlitePool>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Json(body): Json<NewActivity>,
) -> Result<(StatusCode, Json<ActivityRow>), AppError> {
    let row = activity_service::create_activity(&pool, Some(&auth_user.id), body).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

#[derive(Debug, Deserialize, Default)]
pub struct ListActivitiesQuery {
    pub upcoming: Option<bool>,
}

pub async fn list_activities_handler(
    State(pool): State<SqlitePool>,
    Query(query): Query<ListActivitiesQuery>,
) -> Result<Json<Vec<ActivityRow>>, AppError> {
    activity_service::list_activities(&pool, query.upcoming.unwrap_or(false))
        .await
        .map(Json)
}

pub async fn get_activity_handler(
    State(pool): State<SqlitePool>,
    Path(activity_id): Path<String>,
) -> Result<Json<ActivityRow>, AppError> {
    activity_service::get_activity(&pool, &activity_id)
        .await
        .map(Json)
}

pub async fn update_activity_handler(
    State(pool): State<SqlitePool>,
    Path(activity_id): Path<String>,
    Json(body): Json<UpdateActivity>,
) -> Result<Json<ActivityRow>, AppError> {
    activity_service::update_activity(&pool, &activity_id, body)
        .await
        .map(Json)
}

pub async fn delete_activity_handler(
    State(pool): State<SqlitePool>,
    Path(activity_id): Path<String>,
) -> Result<StatusCode, AppError> {
    activity_service::delete_activity(&pool, &activity_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct AddParticipantBody {
    pub user_id: String,
    #[serde(default)]
    pub needs_transport: bool,
}

pub async fn add_participant_handler(
    State(pool): State<SqlitePool>,
    Path(activity_id): Path<String>,
    Json(body): Json<AddParticipantBody>,
) -> Result<StatusCode, AppError> {
    activity_service::add_participant(&pool, &activity_id, &body.user_id, body.needs_transport)
        .await?;
    Ok(StatusCode::CREATED)
}

pub async fn remove_participant_handler(
    State(pool): State<SqlitePool>,
    Path((activity_id, user_id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    activity_service::remove_participant(&pool, &activity_id, &user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct AddAccompagnateurBody {
    pub user_id: String,
}

pub async fn add_accompagnateur_handler(
    State(pool): State<SqlitePool>,
    Path(activity_id): Path<String>,
    Json(body): Json<AddAccompagnateurBody>,
) -> Result<StatusCode, AppError> {
    activity_service::add_accompagnateur(&pool, &activity_id, &body.user_id).await?;
    Ok(StatusCode::CREATED)
}

pub async fn remove_accompagnateur_handler(
    State(pool): State<SqlitePool>,
    Path((activity_id, user_id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    activity_service::remove_accompagnateur(&pool, &activity_id, &user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_members_handler(
    State(pool): State<SqlitePool>,
    Path(activity_id): Path<String>,
) -> Result<Json<ActivityMembersView>, AppError> {
    activity_service::list_members(&pool, &activity_id)
        .await
        .map(Json)
}

pub async fn transport_plan_handler(
    State(pool): State<SqlitePool>,
    Path(activity_id): Path<String>,
) -> Result<Json<TransportPlanView>, AppError> {
    transport_service::plan_transport(&pool, &activity_id)
        .await
        .map(Json)
}

pub async fn start_activity_handler(
    State(pool): State<SqlitePool>,
    Path(activity_id): Path<String>,
) -> Result<Json<ActivityRow>, AppError> {
    activity_service::start_activity(&pool, &activity_id)
        .await
        .map(Json)
}

pub async fn complete_activity_handler(
    State(pool): State<SqlitePool>,
    Path(activity_id): Path<String>,
) -> Result<Json<ActivityRow>, AppError> {
    activity_service::complete_activity(&pool, &activity_id)
        .await
        .map(Json)
}

#[derive(Debug, Deserialize)]
pub struct PresenceBody {
    pub user_id: String,
    pub present: bool,
}

pub async fn presence_handler(
    State(pool): State<SqlitePool>,
    Path(activity_id): Path<String>,
    Json(body): Json<PresenceBody>,
) -> Result<StatusCode, AppError> {
    activity_service::set_presence(&pool, &activity_id, &body.user_id, body.present).await?;
    Ok(StatusCode::NO_CONTENT)
}
