use sqlx::SqliteExecutor;

use crate::models::AdherentRow;

const ADHERENT_COLUMNS: &str = r#"
  adherent_id,
  email,
  first_name,
  last_name,
  phone,
  created_at
"#;

const SQL_INSERT_ADHERENT: &str = r#"
INSERT INTO adherents (
  adherent_id,
  email,
  first_name,
  last_name,
  phone,
  created_at
) VALUES (?, ?, ?, ?, ?, ?)
"#;

pub async fn insert_adherent<'e>(
    db: impl SqliteExecutor<'e>,
    row: &AdherentRow,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_INSERT_ADHERENT)
        .bind(&row.adherent_id)
        .bind(&row.email)
        .bind(&row.first_name)
        .bind(&row.last_name)
        .bind(&row.phone)
        .bind(row.created_at)
        .execute(db)
        .await?;
    Ok(res.rows_affected())
}

pub async fn find_by_email<'e>(
    db: impl SqliteExecutor<'e>,
    email: &str,
) -> sqlx::Result<Option<AdherentRow>> {
    let sql = format!("SELECT {ADHERENT_COLUMNS} FROM adherents WHERE email = ? LIMIT 1");
    sqlx::query_as::<_, AdherentRow>(&sql)
        .bind(email)
        .fetch_optional(db)
        .await
}
