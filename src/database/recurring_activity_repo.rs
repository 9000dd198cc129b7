use sqlx::{SqliteExecutor, SqlitePool};

use crate::models::{RecurringAccompagnateurRow, RecurringActivityRow, RecurringParticipantRow};

const RULE_COLUMNS: &str = r#"
  recurring_activity_id,
  title,
  description,
  location,
  day_of_week,
  start_time,
  end_time,
  recurrence_type,
  start_date,
  end_date,
  activity_type,
  max_participants,
  has_transport,
  transport_capacity,
  is_paid,
  price,
  created_by
"#;

const SQL_INSERT_RULE: &str = r#"
INSERT INTO recurring_activities (
  recurring_activity_id,
  title,
  description,
  location,
  day_of_week,
  start_time,
  end_time,
  recurrence_type,
  start_date,
  end_date,
  activity_type,
  max_participants,
  has_transport,
  transport_capacity,
  is_paid,
  price,
  created_by
) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
"#;

pub async fn insert_rule(pool: &SqlitePool, row: &RecurringActivityRow) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_INSERT_RULE)
        .bind(&row.recurring_activity_id)
        .bind(&row.title)
        .bind(&row.description)
        .bind(&row.location)
        .bind(row.day_of_week)
        .bind(row.start_time)
        .bind(row.end_time)
        .bind(&row.recurrence_type)
        .bind(row.start_date)
        .bind(row.end_date)
        .bind(&row.activity_type)
        .bind(row.max_participants)
        .bind(row.has_transport)
        .bind(row.transport_capacity)
        .bind(row.is_paid)
        .bind(row.price)
        .bind(&row.created_by)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

pub async fn load_rule<'e>(
    db: impl SqliteExecutor<'e>,
    recurring_activity_id: &str,
) -> sqlx::Result<Option<RecurringActivityRow>> {
    let sql = format!(
        "SELECT {RULE_COLUMNS} FROM recurring_activities WHERE recurring_activity_id = ? LIMIT 1"
    );
    sqlx::query_as::<_, RecurringActivityRow>(&sql)
        .bind(recurring_activity_id)
        .fetch_optional(db)
        .await
}

pub async fn list_rules(pool: &SqlitePool) -> sqlx::Result<Vec<RecurringActivityRow>> {
    let sql = format!("SELECT {RULE_COLUMNS} FROM recurring_activities ORDER BY start_date ASC");
    sqlx::query_as::<_, RecurringActivityRow>(&sql)
        .fetch_all(pool)
        .await
}

const SQL_UPDATE_RULE: &str = r#"
UPDATE recurring_activities
SET title = ?,
    description = ?,
    location = ?,
    day_of_week = ?,
    start_time = ?,
    end_time = ?,
    recurrence_type = ?,
    start_date = ?,
    end_date = ?,
    activity_type = ?,
    max_participants = ?,
    has_transport = ?,
    transport_capacity = ?,
    is_paid = ?,
    price = ?
WHERE recurring_activity_id = ?
"#;

pub async fn update_rule(pool: &SqlitePool, row: &RecurringActivityRow) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_UPDATE_RULE)
        .bind(&row.title)
        .bind(&row.description)
        .bind(&row.location)
        .bind(row.day_of_week)
        .bind(row.start_time)
        .bind(row.end_time)
        .bind(&row.recurrence_type)
        .bind(row.start_date)
        .bind(row.end_date)
        .bind(&row.activity_type)
        .bind(row.max_participants)
        .bind(row.has_transport)
        .bind(row.transport_capacity)
        .bind(row.is_paid)
        .bind(row.price)
        .bind(&row.recurring_activity_id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

// Template member rows go with it via ON DELETE CASCADE.
pub async fn delete_rule<'e>(
    db: impl SqliteExecutor<'e>,
    recurring_activity_id: &str,
) -> sqlx::Result<u64> {
    let res = sqlx::query("DELETE FROM recurring_activities WHERE recurring_activity_id = ?")
        .bind(recurring_activity_id)
        .execute(db)
        .await?;
    Ok(res.rows_affected())
}

const SQL_INSERT_DEFAULT_PARTICIPANT: &str = r#"
INSERT INTO recurring_activity_participants (
  recurring_activity_id,
  user_id,
  needs_transport
) VALUES (?, ?, ?)
"#;

pub async fn insert_default_participant(
    pool: &SqlitePool,
    recurring_activity_id: &str,
    user_id: &str,
    needs_transport: i64,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_INSERT_DEFAULT_PARTICIPANT)
        .bind(recurring_activity_id)
        .bind(user_id)
        .bind(needs_transport)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

const SQL_LIST_DEFAULT_PARTICIPANTS: &str = r#"
SELECT
  recurring_activity_id,
  user_id,
  needs_transport
FROM recurring_activity_participants
WHERE recurring_activity_id = ?
"#;

pub async fn list_default_participants<'e>(
    db: impl SqliteExecutor<'e>,
    recurring_activity_id: &str,
) -> sqlx::Result<Vec<RecurringParticipantRow>> {
    sqlx::query_as::<_, RecurringParticipantRow>(SQL_LIST_DEFAULT_PARTICIPANTS)
        .bind(recurring_activity_id)
        .fetch_all(db)
        .await
}

const SQL_INSERT_DEFAULT_ACCOMPAGNATEUR: &str = r#"
INSERT INTO recurring_activity_accompagnateurs (
  recurring_activity_id,
  user_id
) VALUES (?, ?)
"#;

pub async fn insert_default_accompagnateur(
    pool: &SqlitePool,
    recurring_activity_id: &str,
    user_id: &str,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_INSERT_DEFAULT_ACCOMPAGNATEUR)
        .bind(recurring_activity_id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

const SQL_LIST_DEFAULT_ACCOMPAGNATEURS: &str = r#"
SELECT
  recurring_activity_id,
  user_id
FROM recurring_activity_accompagnateurs
WHERE recurring_activity_id = ?
"#;

pub async fn list_default_accompagnateurs<'e>(
    db: impl SqliteExecutor<'e>,
    recurring_activity_id: &str,
) -> sqlx::Result<Vec<RecurringAccompagnateurRow>> {
    sqlx::query_as::<_, RecurringAccompagnateurRow>(SQL_LIST_DEFAULT_ACCOMPAGNATEURS)
        .bind(recurring_activity_id)
        .fetch_all(db)
        .await
}
