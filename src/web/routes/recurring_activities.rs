use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::errors::AppError;
use crate::web::middleware::auth::AuthenticatedUser;
use crate::models::{ActivityRow, RecurringActivityRow};
use crate::services::instance_service::{self, GenerationReport};
use crate::services::recurring_service::{self, NewRecurringActivity, UpdateRecurringActivity};
use crate::database::activity_repo;

#[derive(Serialize)]
pub struct RuleWithReport {
    pub rule: RecurringActivityRow,
    pub report: Option<GenerationReport>,
}

pub async fn create_rule_handler(
    State(pool): State<SqlitePool>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Json(body): Json<NewRecurringActivity>,
) -> Result<(StatusCode, Json<RuleWithReport>), AppError> {
    let (rule, report) = recurring_service::create_rule(&pool, Some(&auth_user.id), body).await?;
    Ok((
        StatusCode::CREATED,
        Json(RuleWithReport {
            rule,
            report: Some(report),
        }),
    ))
}

pub async fn list_rules_handler(
    State(pool): State<SqlitePool>,
) -> Result<Json<Vec<RecurringActivityRow>>, AppError> {
    recurring_service::list_rules(&pool).await.map(Json)
}

pub async fn get_rule_handler(
    State(pool): State<SqlitePool>,
    Path(recurring_activity_id): Path<String>,
) -> Result<Json<RecurringActivityRow>, AppError> {
    recurring_service::get_rule(&pool, &recurring_activity_id)
        .await
        .map(Json)
}

pub async fn list_instances_handler(
    State(pool): State<SqlitePool>,
    Path(recurring_activity_id): Path<String>,
) -> Result<Json<Vec<ActivityRow>>, AppError> {
    recurring_service::get_rule(&pool, &recurring_activity_id).await?;
    let instances = activity_repo::list_instances(&pool, &recurring_activity_id).await?;
    Ok(Json(instances))
}

pub async fn update_rule_handler(
    State(pool): State<SqlitePool>,
    Path(recurring_activity_id): Path<String>,
    Json(body): Json<UpdateRecurringActivity>,
) -> Result<Json<RuleWithReport>, AppError> {
    let (rule, report) =
        recurring_service::update_rule(&pool, &recurring_activity_id, body).await?;
    Ok(Json(RuleWithReport { rule, report }))
}

#[derive(Debug, Deserialize, Default)]
pub struct DeleteRuleQuery {
    pub keep_past_instances: Option<bool>,
}

pub async fn delete_rule_handler(
    State(pool): State<SqlitePool>,
    Path(recurring_activity_id): Path<String>,
    Query(query): Query<DeleteRuleQuery>,
) -> Result<StatusCode, AppError> {
    recurring_service::delete_rule(
        &pool,
        &recurring_activity_id,
        query.keep_past_instances.unwrap_or(true),
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize, Default)]
pub struct RegenerateBody {
    pub up_to_date: Option<NaiveDate>,
}

pub async fn regenerate_handler(
    State(pool): State<SqlitePool>,
    Path(recurring_activity_id): Path<String>,
    Json(body): Json<RegenerateBody>,
) -> Result<Json<GenerationReport>, AppError> {
    instance_service::generate_instances(&pool, &recurring_activity_id, body.up_to_date)
        .await
        .map(Json)
}
