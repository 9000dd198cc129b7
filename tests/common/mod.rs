#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use uuid::Uuid;

use association_backend::database::{membership_repo, user_repo};
use association_backend::models::{FormuleRow, UserRow};

// One connection so every query hits the same in-memory database.
pub async fn setup_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory pool");
    sqlx::migrate!().run(&pool).await.expect("migrations");
    pool
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

pub fn datetime(y: i32, m: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
    date(y, m, d).and_time(time(h, mi))
}

pub async fn insert_user(pool: &SqlitePool, role: &str, is_vehiculed: bool) -> String {
    let user_id = Uuid::new_v4().to_string();
    let row = UserRow {
        user_id: user_id.clone(),
        email: format!("{user_id}@example.org"),
        password_hash: "test-hash".to_string(),
        first_name: "Test".to_string(),
        last_name: role.to_string(),
        role: role.to_string(),
        is_vehiculed: is_vehiculed as i64,
        created_at: Utc::now().naive_utc(),
    };
    user_repo::insert_user(pool, &row).await.unwrap();
    user_id
}

pub async fn insert_formule(pool: &SqlitePool, name: &str, price: f64) -> String {
    let formule_id = Uuid::new_v4().to_string();
    let row = FormuleRow {
        formule_id: formule_id.clone(),
        name: name.to_string(),
        price,
    };
    membership_repo::insert_formule(pool, &row).await.unwrap();
    formule_id
}
