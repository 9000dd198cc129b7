use serde::Serialize;

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct ActivityParticipantRow {
    pub activity_id: String,
    pub user_id: String,
    pub needs_transport: i64,
    pub is_present: i64,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct ActivityAccompagnateurRow {
    pub activity_id: String,
    pub user_id: String,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct RecurringParticipantRow {
    pub recurring_activity_id: String,
    pub user_id: String,
    pub needs_transport: i64,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct RecurringAccompagnateurRow {
    pub recurring_activity_id: String,
    pub user_id: String,
}
