use chrono::Utc;
use serde::Deserialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::user_repo;
use crate::errors::AppError;
use crate::models::UserRow;
use crate::services::crypto;

const ROLES: [&str; 4] = ["admin", "accompagnateur", "adherent", "benevole"];

#[derive(Debug, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    #[serde(default)]
    pub is_vehiculed: bool,
}

pub async fn create_user(pool: &SqlitePool, input: NewUser) -> Result<UserRow, AppError> {
    if !input.email.contains('@') {
        return Err(AppError::Validation("invalid email".into()));
    }
    if !ROLES.contains(&input.role.as_str()) {
        return Err(AppError::Validation(format!(
            "unknown role '{}'",
            input.role
        )));
    }
    if user_repo::load_user_by_email(pool, &input.email)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(
            "a user with this email already exists".into(),
        ));
    }

    let row = UserRow {
        user_id: Uuid::new_v4().to_string(),
        email: input.email,
        password_hash: crypto::hash_password(&input.password),
        first_name: input.first_name,
        last_name: input.last_name,
        role: input.role,
        is_vehiculed: input.is_vehiculed as i64,
        created_at: Utc::now().naive_utc(),
    };
    user_repo::insert_user(pool, &row).await?;
    Ok(row)
}

pub async fn list_users(pool: &SqlitePool) -> Result<Vec<UserRow>, AppError> {
    Ok(user_repo::list_users(pool).await?)
}
