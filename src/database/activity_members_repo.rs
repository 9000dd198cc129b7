use sqlx::{SqliteExecutor, SqlitePool};

use crate::models::{ActivityAccompagnateurRow, ActivityParticipantRow, UserRow};

const SQL_INSERT_PARTICIPANT: &str = r#"
INSERT INTO activity_participants (
  activity_id,
  user_id,
  needs_transport,
  is_present
) VALUES (?, ?, ?, 0)
"#;

pub async fn insert_participant<'e>(
    db: impl SqliteExecutor<'e>,
    activity_id: &str,
    user_id: &str,
    needs_transport: i64,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_INSERT_PARTICIPANT)
        .bind(activity_id)
        .bind(user_id)
        .bind(needs_transport)
        .execute(db)
        .await?;
    Ok(res.rows_affected())
}

pub async fn delete_participant(
    pool: &SqlitePool,
    activity_id: &str,
    user_id: &str,
) -> sqlx::Result<u64> {
    let res = sqlx::query("DELETE FROM activity_participants WHERE activity_id = ? AND user_id = ?")
        .bind(activity_id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

const SQL_LIST_PARTICIPANTS: &str = r#"
SELECT
  activity_id,
  user_id,
  needs_transport,
  is_present
FROM activity_participants
WHERE activity_id = ?
"#;

pub async fn list_participants(
    pool: &SqlitePool,
    activity_id: &str,
) -> sqlx::Result<Vec<ActivityParticipantRow>> {
    sqlx::query_as::<_, ActivityParticipantRow>(SQL_LIST_PARTICIPANTS)
        .bind(activity_id)
        .fetch_all(pool)
        .await
}

pub async fn count_participants<'e>(
    db: impl SqliteExecutor<'e>,
    activity_id: &str,
) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM activity_participants WHERE activity_id = ?")
        .bind(activity_id)
        .fetch_one(db)
        .await
}

pub async fn participant_exists<'e>(
    db: impl SqliteExecutor<'e>,
    activity_id: &str,
    user_id: &str,
) -> sqlx::Result<bool> {
    let found = sqlx::query_scalar::<_, i64>(
        "SELECT 1 FROM activity_participants WHERE activity_id = ? AND user_id = ? LIMIT 1",
    )
    .bind(activity_id)
    .bind(user_id)
    .fetch_optional(db)
    .await?;
    Ok(found.is_some())
}

const SQL_SET_PRESENCE: &str = r#"
UPDATE activity_participants
SET is_present = ?
WHERE activity_id = ?
  AND user_id = ?
"#;

pub async fn set_presence(
    pool: &SqlitePool,
    activity_id: &str,
    user_id: &str,
    present: i64,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_SET_PRESENCE)
        .bind(present)
        .bind(activity_id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

const SQL_INSERT_ACCOMPAGNATEUR: &str = r#"
INSERT INTO activity_accompagnateurs (
  activity_id,
  user_id
) VALUES (?, ?)
"#;

pub async fn insert_accompagnateur<'e>(
    db: impl SqliteExecutor<'e>,
    activity_id: &str,
    user_id: &str,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_INSERT_ACCOMPAGNATEUR)
        .bind(activity_id)
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(res.rows_affected())
}

pub async fn delete_accompagnateur(
    pool: &SqlitePool,
    activity_id: &str,
    user_id: &str,
) -> sqlx::Result<u64> {
    let res =
        sqlx::query("DELETE FROM activity_accompagnateurs WHERE activity_id = ? AND user_id = ?")
            .bind(activity_id)
            .bind(user_id)
            .execute(pool)
            .await?;
    Ok(res.rows_affected())
}

const SQL_LIST_ACCOMPAGNATEURS: &str = r#"
SELECT
  activity_id,
  user_id
FROM activity_accompagnateurs
WHERE activity_id = ?
"#;

pub async fn list_accompagnateurs(
    pool: &SqlitePool,
    activity_id: &str,
) -> sqlx::Result<Vec<ActivityAccompagnateurRow>> {
    sqlx::query_as::<_, ActivityAccompagnateurRow>(SQL_LIST_ACCOMPAGNATEURS)
        .bind(activity_id)
        .fetch_all(pool)
        .await
}

pub async fn accompagnateur_exists<'e>(
    db: impl SqliteExecutor<'e>,
    activity_id: &str,
    user_id: &str,
) -> sqlx::Result<bool> {
    let found = sqlx::query_scalar::<_, i64>(
        "SELECT 1 FROM activity_accompagnateurs WHERE activity_id = ? AND user_id = ? LIMIT 1",
    )
    .bind(activity_id)
    .bind(user_id)
    .fetch_optional(db)
    .await?;
    Ok(found.is_some())
}

const SQL_LIST_TRANSPORT_PARTICIPANT_USERS: &str = r#"
SELECT
  u.user_id,
  u.email,
  u.password_hash,
  u.first_name,
  u.last_name,
  u.role,
  u.is_vehiculed,
  u.created_at
FROM activity_participants ap
JOIN users u ON u.user_id = ap.user_id
WHERE ap.activity_id = ?
  AND ap.needs_transport = 1
"#;

// Row order is insertion/query order, no business-key sort; the transport
// planner depends on that being stable within one read.
pub async fn list_transport_participant_users(
    pool: &SqlitePool,
    activity_id: &str,
) -> sqlx::Result<Vec<UserRow>> {
    sqlx::query_as::<_, UserRow>(SQL_LIST_TRANSPORT_PARTICIPANT_USERS)
        .bind(activity_id)
        .fetch_all(pool)
        .await
}

const SQL_LIST_VEHICULED_ACCOMPAGNATEUR_USERS: &str = r#"
SELECT
  u.user_id,
  u.email,
  u.password_hash,
  u.first_name,
  u.last_name,
  u.role,
  u.is_vehiculed,
  u.created_at
FROM activity_accompagnateurs aa
JOIN users u ON u.user_id = aa.user_id
WHERE aa.activity_id = ?
  AND u.is_vehiculed = 1
"#;

pub async fn list_vehiculed_accompagnateur_users(
    pool: &SqlitePool,
    activity_id: &str,
) -> sqlx::Result<Vec<UserRow>> {
    sqlx::query_as::<_, UserRow>(SQL_LIST_VEHICULED_ACCOMPAGNATEUR_USERS)
        .bind(activity_id)
        .fetch_all(pool)
        .await
}
