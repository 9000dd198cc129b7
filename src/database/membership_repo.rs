use sqlx::{SqliteExecutor, SqlitePool};

use crate::models::{FormuleRow, MembershipRow};

const SQL_INSERT_MEMBERSHIP: &str = r#"
INSERT INTO memberships (
  membership_id,
  adherent_id,
  formule_id,
  start_date,
  end_date,
  payment_frequency,
  payment_status
) VALUES (?, ?, ?, ?, ?, ?, ?)
"#;

pub async fn insert_membership<'e>(
    db: impl SqliteExecutor<'e>,
    row: &MembershipRow,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_INSERT_MEMBERSHIP)
        .bind(&row.membership_id)
        .bind(&row.adherent_id)
        .bind(&row.formule_id)
        .bind(row.start_date)
        .bind(row.end_date)
        .bind(&row.payment_frequency)
        .bind(&row.payment_status)
        .execute(db)
        .await?;
    Ok(res.rows_affected())
}

pub async fn list_memberships_for_adherent(
    pool: &SqlitePool,
    adherent_id: &str,
) -> sqlx::Result<Vec<MembershipRow>> {
    sqlx::query_as::<_, MembershipRow>(
        r#"
SELECT
  membership_id,
  adherent_id,
  formule_id,
  start_date,
  end_date,
  payment_frequency,
  payment_status
FROM memberships
WHERE adherent_id = ?
ORDER BY start_date DESC
"#,
    )
    .bind(adherent_id)
    .fetch_all(pool)
    .await
}

pub async fn insert_formule(pool: &SqlitePool, row: &FormuleRow) -> sqlx::Result<u64> {
    let res = sqlx::query("INSERT INTO formules (formule_id, name, price) VALUES (?, ?, ?)")
        .bind(&row.formule_id)
        .bind(&row.name)
        .bind(row.price)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

pub async fn load_formule<'e>(
    db: impl SqliteExecutor<'e>,
    formule_id: &str,
) -> sqlx::Result<Option<FormuleRow>> {
    sqlx::query_as::<_, FormuleRow>(
        "SELECT formule_id, name, price FROM formules WHERE formule_id = ? LIMIT 1",
    )
    .bind(formule_id)
    .fetch_optional(db)
    .await
}
