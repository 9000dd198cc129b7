use chrono::NaiveDateTime;
use sqlx::{SqliteExecutor, SqlitePool};

use crate::models::MembershipRequestRow;

const REQUEST_COLUMNS: &str = r#"
  request_id,
  email,
  first_name,
  last_name,
  phone,
  est_benevole,
  formule_id,
  status,
  created_at,
  processed_at
"#;

const SQL_INSERT_REQUEST: &str = r#"
INSERT INTO membership_requests (
  request_id,
  email,
  first_name,
  last_name,
  phone,
  est_benevole,
  formule_id,
  status,
  created_at,
  processed_at
) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
"#;

pub async fn insert_request(pool: &SqlitePool, row: &MembershipRequestRow) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_INSERT_REQUEST)
        .bind(&row.request_id)
        .bind(&row.email)
        .bind(&row.first_name)
        .bind(&row.last_name)
        .bind(&row.phone)
        .bind(row.est_benevole)
        .bind(&row.formule_id)
        .bind(&row.status)
        .bind(row.created_at)
        .bind(row.processed_at)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

pub async fn load_request<'e>(
    db: impl SqliteExecutor<'e>,
    request_id: &str,
) -> sqlx::Result<Option<MembershipRequestRow>> {
    let sql =
        format!("SELECT {REQUEST_COLUMNS} FROM membership_requests WHERE request_id = ? LIMIT 1");
    sqlx::query_as::<_, MembershipRequestRow>(&sql)
        .bind(request_id)
        .fetch_optional(db)
        .await
}

pub async fn list_requests(
    pool: &SqlitePool,
    status: Option<&str>,
) -> sqlx::Result<Vec<MembershipRequestRow>> {
    match status {
        Some(status) => {
            let sql = format!(
                "SELECT {REQUEST_COLUMNS} FROM membership_requests WHERE status = ? ORDER BY created_at ASC"
            );
            sqlx::query_as::<_, MembershipRequestRow>(&sql)
                .bind(status)
                .fetch_all(pool)
                .await
        }
        None => {
            let sql =
                format!("SELECT {REQUEST_COLUMNS} FROM membership_requests ORDER BY created_at ASC");
            sqlx::query_as::<_, MembershipRequestRow>(&sql)
                .fetch_all(pool)
                .await
        }
    }
}

const SQL_UPDATE_STATUS: &str = r#"
UPDATE membership_requests
SET status = ?, processed_at = ?
WHERE request_id = ?
"#;

// Status-agnostic on purpose; the pending-only guard lives in the workflow
// service, the only caller that approves or rejects.
pub async fn update_status<'e>(
    db: impl SqliteExecutor<'e>,
    request_id: &str,
    status: &str,
    processed_at: NaiveDateTime,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_UPDATE_STATUS)
        .bind(status)
        .bind(processed_at)
        .bind(request_id)
        .execute(db)
        .await?;
    Ok(res.rows_affected())
}
