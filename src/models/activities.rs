use chrono::NaiveDateTime;
use serde::Serialize;

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct ActivityRow {
    pub activity_id: String,
    pub title: String,
    pub description: Option<String>,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub location: Option<String>,
    pub activity_type: String,
    pub max_participants: Option<i64>,
    pub has_transport: i64,
    pub transport_capacity: i64,
    pub is_paid: i64,
    pub price: f64,
    pub recurring_activity_id: Option<String>,
    pub created_by: Option<String>,
    pub status: String,
    pub started_at: Option<NaiveDateTime>,
    pub completed_at: Option<NaiveDateTime>,
}
