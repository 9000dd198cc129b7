use chrono::NaiveDateTime;
use sqlx::{SqliteExecutor, SqlitePool};

use crate::models::ActivityRow;

const ACTIVITY_COLUMNS: &str = r#"
  activity_id,
  title,
  description,
  start_date,
  end_date,
  location,
  activity_type,
  max_participants,
  has_transport,
  transport_capacity,
  is_paid,
  price,
  recurring_activity_id,
  created_by,
  status,
  started_at,
  completed_at
"#;

const SQL_INSERT_ACTIVITY: &str = r#"
INSERT INTO activities (
  activity_id,
  title,
  description,
  start_date,
  end_date,
  location,
  activity_type,
  max_participants,
  has_transport,
  transport_capacity,
  is_paid,
  price,
  recurring_activity_id,
  created_by,
  status,
  started_at,
  completed_at
) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
"#;

pub async fn insert_activity<'e>(
    db: impl SqliteExecutor<'e>,
    row: &ActivityRow,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_INSERT_ACTIVITY)
        .bind(&row.activity_id)
        .bind(&row.title)
        .bind(&row.description)
        .bind(row.start_date)
        .bind(row.end_date)
        .bind(&row.location)
        .bind(&row.activity_type)
        .bind(row.max_participants)
        .bind(row.has_transport)
        .bind(row.transport_capacity)
        .bind(row.is_paid)
        .bind(row.price)
        .bind(&row.recurring_activity_id)
        .bind(&row.created_by)
        .bind(&row.status)
        .bind(row.started_at)
        .bind(row.completed_at)
        .execute(db)
        .await?;
    Ok(res.rows_affected())
}

pub async fn load_activity<'e>(
    db: impl SqliteExecutor<'e>,
    activity_id: &str,
) -> sqlx::Result<Option<ActivityRow>> {
    let sql = format!("SELECT {ACTIVITY_COLUMNS} FROM activities WHERE activity_id = ? LIMIT 1");
    sqlx::query_as::<_, ActivityRow>(&sql)
        .bind(activity_id)
        .fetch_optional(db)
        .await
}

pub async fn list_activities(pool: &SqlitePool) -> sqlx::Result<Vec<ActivityRow>> {
    let sql = format!("SELECT {ACTIVITY_COLUMNS} FROM activities ORDER BY start_date ASC");
    sqlx::query_as::<_, ActivityRow>(&sql).fetch_all(pool).await
}

pub async fn list_activities_from(
    pool: &SqlitePool,
    after: NaiveDateTime,
) -> sqlx::Result<Vec<ActivityRow>> {
    let sql = format!(
        "SELECT {ACTIVITY_COLUMNS} FROM activities WHERE start_date >= ? ORDER BY start_date ASC"
    );
    sqlx::query_as::<_, ActivityRow>(&sql)
        .bind(after)
        .fetch_all(pool)
        .await
}

pub async fn list_instances(
    pool: &SqlitePool,
    recurring_activity_id: &str,
) -> sqlx::Result<Vec<ActivityRow>> {
    let sql = format!(
        "SELECT {ACTIVITY_COLUMNS} FROM activities WHERE recurring_activity_id = ? ORDER BY start_date ASC"
    );
    sqlx::query_as::<_, ActivityRow>(&sql)
        .bind(recurring_activity_id)
        .fetch_all(pool)
        .await
}

const SQL_INSTANCE_EXISTS_AT: &str = r#"
SELECT 1
FROM activities
WHERE recurring_activity_id = ?
  AND start_date = ?
LIMIT 1
"#;

// Exact-timestamp match, deliberately not date-only; see DESIGN.md.
pub async fn instance_exists_at<'e>(
    db: impl SqliteExecutor<'e>,
    recurring_activity_id: &str,
    start_date: NaiveDateTime,
) -> sqlx::Result<bool> {
    let found = sqlx::query_scalar::<_, i64>(SQL_INSTANCE_EXISTS_AT)
        .bind(recurring_activity_id)
        .bind(start_date)
        .fetch_optional(db)
        .await?;
    Ok(found.is_some())
}

const SQL_UPDATE_ACTIVITY: &str = r#"
UPDATE activities
SET title = ?,
    description = ?,
    start_date = ?,
    end_date = ?,
    location = ?,
    activity_type = ?,
    max_participants = ?,
    has_transport = ?,
    transport_capacity = ?,
    is_paid = ?,
    price = ?
WHERE activity_id = ?
"#;

pub async fn update_activity(pool: &SqlitePool, row: &ActivityRow) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_UPDATE_ACTIVITY)
        .bind(&row.title)
        .bind(&row.description)
        .bind(row.start_date)
        .bind(row.end_date)
        .bind(&row.location)
        .bind(&row.activity_type)
        .bind(row.max_participants)
        .bind(row.has_transport)
        .bind(row.transport_capacity)
        .bind(row.is_paid)
        .bind(row.price)
        .bind(&row.activity_id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

pub async fn delete_activity(pool: &SqlitePool, activity_id: &str) -> sqlx::Result<u64> {
    let res = sqlx::query("DELETE FROM activities WHERE activity_id = ?")
        .bind(activity_id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

const SQL_DELETE_FUTURE_INSTANCES: &str = r#"
DELETE FROM activities
WHERE recurring_activity_id = ?
  AND start_date > ?
"#;

pub async fn delete_future_instances<'e>(
    db: impl SqliteExecutor<'e>,
    recurring_activity_id: &str,
    after: NaiveDateTime,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_DELETE_FUTURE_INSTANCES)
        .bind(recurring_activity_id)
        .bind(after)
        .execute(db)
        .await?;
    Ok(res.rows_affected())
}

const SQL_DETACH_INSTANCES: &str = r#"
UPDATE activities
SET recurring_activity_id = NULL
WHERE recurring_activity_id = ?
"#;

pub async fn detach_instances<'e>(
    db: impl SqliteExecutor<'e>,
    recurring_activity_id: &str,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_DETACH_INSTANCES)
        .bind(recurring_activity_id)
        .execute(db)
        .await?;
    Ok(res.rows_affected())
}

const SQL_MARK_STARTED: &str = r#"
UPDATE activities
SET status = 'started', started_at = ?
WHERE activity_id = ?
  AND status = 'pending'
"#;

pub async fn mark_started(
    pool: &SqlitePool,
    activity_id: &str,
    at: NaiveDateTime,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_MARK_STARTED)
        .bind(at)
        .bind(activity_id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

const SQL_MARK_COMPLETED: &str = r#"
UPDATE activities
SET status = 'completed', completed_at = ?
WHERE activity_id = ?
  AND status = 'started'
"#;

pub async fn mark_completed(
    pool: &SqlitePool,
    activity_id: &str,
    at: NaiveDateTime,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_MARK_COMPLETED)
        .bind(at)
        .bind(activity_id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}
