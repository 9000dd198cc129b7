use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

// The generating rule; never schedulable itself, only its instances are.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct RecurringActivityRow {
    pub recurring_activity_id: String,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub day_of_week: i64,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub recurrence_type: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub activity_type: String,
    pub max_participants: Option<i64>,
    pub has_transport: i64,
    pub transport_capacity: i64,
    pub is_paid: i64,
    pub price: f64,
    pub created_by: Option<String>,
}
