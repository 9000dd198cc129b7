use sqlx::{SqliteExecutor, SqlitePool};

use crate::models::UserRow;

const USER_COLUMNS: &str = r#"
  user_id,
  email,
  password_hash,
  first_name,
  last_name,
  role,
  is_vehiculed,
  created_at
"#;

const SQL_INSERT_USER: &str = r#"
INSERT INTO users (
  user_id,
  email,
  password_hash,
  first_name,
  last_name,
  role,
  is_vehiculed,
  created_at
) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
"#;

pub async fn insert_user<'e>(db: impl SqliteExecutor<'e>, row: &UserRow) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_INSERT_USER)
        .bind(&row.user_id)
        .bind(&row.email)
        .bind(&row.password_hash)
        .bind(&row.first_name)
        .bind(&row.last_name)
        .bind(&row.role)
        .bind(row.is_vehiculed)
        .bind(row.created_at)
        .execute(db)
        .await?;
    Ok(res.rows_affected())
}

pub async fn load_user<'e>(
    db: impl SqliteExecutor<'e>,
    user_id: &str,
) -> sqlx::Result<Option<UserRow>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = ? LIMIT 1");
    sqlx::query_as::<_, UserRow>(&sql)
        .bind(user_id)
        .fetch_optional(db)
        .await
}

pub async fn load_user_by_email<'e>(
    db: impl SqliteExecutor<'e>,
    email: &str,
) -> sqlx::Result<Option<UserRow>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = ? LIMIT 1");
    sqlx::query_as::<_, UserRow>(&sql)
        .bind(email)
        .fetch_optional(db)
        .await
}

pub async fn list_users(pool: &SqlitePool) -> sqlx::Result<Vec<UserRow>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY last_name ASC, first_name ASC");
    sqlx::query_as::<_, UserRow>(&sql).fetch_all(pool).await
}
