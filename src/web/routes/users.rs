use axum::{extract::State, http::StatusCode, Json};
use sqlx::SqlitePool;

use crate::errors::AppError;
use crate::models::UserRow;
use crate::services::user_service::{self, NewUser};

pub async fn list_users_handler(
    State(pool): State<SqlitePool>,
) -> Result<Json<Vec<UserRow>>, AppError> {
    user_service::list_users(&pool).await.map(Json)
}

pub async fn create_user_handler(
    State(pool): State<SqlitePool>,
    Json(body): Json<NewUser>,
) -> Result<(StatusCode, Json<UserRow>), AppError> {
    let row = user_service::create_user(&pool, body).await?;
    Ok((StatusCode::CREATED, Json(row)))
}
