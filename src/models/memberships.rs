use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct MembershipRow {
    pub membership_id: String,
    pub adherent_id: String,
    pub formule_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub payment_frequency: String,
    pub payment_status: String,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct FormuleRow {
    pub formule_id: String,
    pub name: String,
    pub price: f64,
}
