use chrono::NaiveDateTime;
use serde::Serialize;

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct MembershipRequestRow {
    pub request_id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub est_benevole: i64,
    pub formule_id: Option<String>,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub processed_at: Option<NaiveDateTime>,
}
