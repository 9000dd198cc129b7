use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::{activity_members_repo, activity_repo, user_repo};
use crate::errors::AppError;
use crate::models::{ActivityAccompagnateurRow, ActivityParticipantRow, ActivityRow};

const ACTIVITY_TYPES: [&str; 3] = ["with_adherents", "without_adherents", "br"];

#[derive(Debug, Deserialize)]
pub struct NewActivity {
    pub title: String,
    pub description: Option<String>,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub location: Option<String>,
    pub activity_type: Option<String>,
    pub max_participants: Option<i64>,
    #[serde(default)]
    pub has_transport: bool,
    #[serde(default)]
    pub transport_capacity: i64,
    #[serde(default)]
    pub is_paid: bool,
    #[serde(default)]
    pub price: f64,
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateActivity {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
    pub location: Option<String>,
    pub activity_type: Option<String>,
    pub max_participants: Option<i64>,
    pub has_transport: Option<bool>,
    pub transport_capacity: Option<i64>,
    pub is_paid: Option<bool>,
    pub price: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct ActivityMembersView {
    pub participants: Vec<ActivityParticipantRow>,
    pub accompagnateurs: Vec<ActivityAccompagnateurRow>,
}

fn validate_activity(row: &ActivityRow) -> Result<(), AppError> {
    if row.end_date <= row.start_date {
        return Err(AppError::Validation(
            "end_date must be after start_date".into(),
        ));
    }
    if !ACTIVITY_TYPES.contains(&row.activity_type.as_str()) {
        return Err(AppError::Validation(format!(
            "unknown activity_type '{}'",
            row.activity_type
        )));
    }
    if matches!(row.max_participants, Some(n) if n < 0) {
        return Err(AppError::Validation(
            "max_participants must not be negative".into(),
        ));
    }
    Ok(())
}

pub async fn create_activity(
    pool: &SqlitePool,
    created_by: Option<&str>,
    input: NewActivity,
) -> Result<ActivityRow, AppError> {
    let row = ActivityRow {
        activity_id: Uuid::new_v4().to_string(),
        title: input.title,
        description: input.description,
        start_date: input.start_date,
        end_date: input.end_date,
        location: input.location,
        activity_type: input
            .activity_type
            .unwrap_or_else(|| "with_adherents".to_string()),
        max_participants: input.max_participants,
        has_transport: input.has_transport as i64,
        transport_capacity: input.transport_capacity,
        is_paid: input.is_paid as i64,
        price: input.price,
        recurring_activity_id: None,
        created_by: created_by.map(str::to_string),
        status: "pending".to_string(),
        started_at: None,
        completed_at: None,
    };
    validate_activity(&row)?;
    activity_repo::insert_activity(pool, &row).await?;
    Ok(row)
}

pub async fn get_activity(pool: &SqlitePool, activity_id: &str) -> Result<ActivityRow, AppError> {
    activity_repo::load_activity(pool, activity_id)
        .await?
        .ok_or(AppError::NotFound("activity"))
}

pub async fn list_activities(
    pool: &SqlitePool,
    upcoming_only: bool,
) -> Result<Vec<ActivityRow>, AppError> {
    if upcoming_only {
        Ok(activity_repo::list_activities_from(pool, Utc::now().naive_utc()).await?)
    } else {
        Ok(activity_repo::list_activities(pool).await?)
    }
}

pub async fn update_activity(
    pool: &SqlitePool,
    activity_id: &str,
    patch: UpdateActivity,
) -> Result<ActivityRow, AppError> {
    let mut row = get_activity(pool, activity_id).await?;

    if let Some(v) = patch.title {
        row.title = v;
    }
    if let Some(v) = patch.description {
        row.description = Some(v);
    }
    if let Some(v) = patch.start_date {
        row.start_date = v;
    }
    if let Some(v) = patch.end_date {
        row.end_date = v;
    }
    if let Some(v) = patch.location {
        row.location = Some(v);
    }
    if let Some(v) = patch.activity_type {
        row.activity_type = v;
    }
    if let Some(v) = patch.max_participants {
        row.max_participants = Some(v);
    }
    if let Some(v) = patch.has_transport {
        row.has_transport = v as i64;
    }
    if let Some(v) = patch.transport_capacity {
        row.transport_capacity = v;
    }
    if let Some(v) = patch.is_paid {
        row.is_paid = v as i64;
    }
    if let Some(v) = patch.price {
        row.price = v;
    }
    validate_activity(&row)?;

    activity_repo::update_activity(pool, &row).await?;
    Ok(row)
}

pub async fn delete_activity(pool: &SqlitePool, activity_id: &str) -> Result<(), AppError> {
    let deleted = activity_repo::delete_activity(pool, activity_id).await?;
    if deleted == 0 {
        return Err(AppError::NotFound("activity"));
    }
    Ok(())
}

pub async fn add_participant(
    pool: &SqlitePool,
    activity_id: &str,
    user_id: &str,
    needs_transport: bool,
) -> Result<(), AppError> {
    let activity = get_activity(pool, activity_id).await?;
    if user_repo::load_user(pool, user_id).await?.is_none() {
        return Err(AppError::NotFound("user"));
    }
    if activity_members_repo::participant_exists(pool, activity_id, user_id).await? {
        return Err(AppError::Conflict("participant already attached".into()));
    }
    if let Some(max) = activity.max_participants {
        let count = activity_members_repo::count_participants(pool, activity_id).await?;
        if count >= max {
            return Err(AppError::Conflict("activity is full".into()));
        }
    }
    activity_members_repo::insert_participant(pool, activity_id, user_id, needs_transport as i64)
        .await?;
    Ok(())
}

pub async fn remove_participant(
    pool: &SqlitePool,
    activity_id: &str,
    user_id: &str,
) -> Result<(), AppError> {
    let removed = activity_members_repo::delete_participant(pool, activity_id, user_id).await?;
    if removed == 0 {
        return Err(AppError::NotFound("participant"));
    }
    Ok(())
}

pub async fn add_accompagnateur(
    pool: &SqlitePool,
    activity_id: &str,
    user_id: &str,
) -> Result<(), AppError> {
    get_activity(pool, activity_id).await?;
    if user_repo::load_user(pool, user_id).await?.is_none() {
        return Err(AppError::NotFound("user"));
    }
    if activity_members_repo::accompagnateur_exists(pool, activity_id, user_id).await? {
        return Err(AppError::Conflict("accompagnateur already attached".into()));
    }
    activity_members_repo::insert_accompagnateur(pool, activity_id, user_id).await?;
    Ok(())
}

pub async fn remove_accompagnateur(
    pool: &SqlitePool,
    activity_id: &str,
    user_id: &str,
) -> Result<(), AppError> {
    let removed = activity_members_repo::delete_accompagnateur(pool, activity_id, user_id).await?;
    if removed == 0 {
        return Err(AppError::NotFound("accompagnateur"));
    }
    Ok(())
}

pub async fn list_members(
    pool: &SqlitePool,
    activity_id: &str,
) -> Result<ActivityMembersView, AppError> {
    get_activity(pool, activity_id).await?;
    let participants = activity_members_repo::list_participants(pool, activity_id).await?;
    let accompagnateurs = activity_members_repo::list_accompagnateurs(pool, activity_id).await?;
    Ok(ActivityMembersView {
        participants,
        accompagnateurs,
    })
}

pub async fn start_activity(pool: &SqlitePool, activity_id: &str) -> Result<ActivityRow, AppError> {
    get_activity(pool, activity_id).await?;
    let updated = activity_repo::mark_started(pool, activity_id, Utc::now().naive_utc()).await?;
    if updated == 0 {
        return Err(AppError::Conflict("activity is not pending".into()));
    }
    get_activity(pool, activity_id).await
}

pub async fn complete_activity(
    pool: &SqlitePool,
    activity_id: &str,
) -> Result<ActivityRow, AppError> {
    get_activity(pool, activity_id).await?;
    let updated = activity_repo::mark_completed(pool, activity_id, Utc::now().naive_utc()).await?;
    if updated == 0 {
        return Err(AppError::Conflict("activity is not started".into()));
    }
    get_activity(pool, activity_id).await
}

pub async fn set_presence(
    pool: &SqlitePool,
    activity_id: &str,
    user_id: &str,
    present: bool,
) -> Result<(), AppError> {
    let activity = get_activity(pool, activity_id).await?;
    if activity.status != "started" {
        return Err(AppError::Conflict("activity is not started".into()));
    }
    let updated =
        activity_members_repo::set_presence(pool, activity_id, user_id, present as i64).await?;
    if updated == 0 {
        return Err(AppError::NotFound("participant"));
    }
    Ok(())
}
