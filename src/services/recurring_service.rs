use chrono::{NaiveDate, NaiveTime, Utc};
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use crate::database::{activity_repo, recurring_activity_repo};
use crate::errors::AppError;
use crate::models::RecurringActivityRow;
use crate::services::instance_service::{self, GenerationReport};
use crate::services::occurrence::Recurrence;

const ACTIVITY_TYPES: [&str; 3] = ["with_adherents", "without_adherents", "br"];

#[derive(Debug, Deserialize)]
pub struct DefaultParticipant {
    pub user_id: String,
    #[serde(default)]
    pub needs_transport: bool,
}

#[derive(Debug, Deserialize)]
pub struct NewRecurringActivity {
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub day_of_week: i64,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub recurrence_type: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
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
    #[serde(default)]
    pub participants: Vec<DefaultParticipant>,
    #[serde(default)]
    pub accompagnateurs: Vec<String>,
    // Generation horizon for the initial materialization; defaults to
    // three months out.
    pub generate_up_to: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateRecurringActivity {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub day_of_week: Option<i64>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub recurrence_type: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub activity_type: Option<String>,
    pub max_participants: Option<i64>,
    pub has_transport: Option<bool>,
    pub transport_capacity: Option<i64>,
    pub is_paid: Option<bool>,
    pub price: Option<f64>,
    pub regenerate_instances: Option<bool>,
    pub generate_up_to: Option<NaiveDate>,
}

fn validate_rule(rule: &RecurringActivityRow) -> Result<(), AppError> {
    if !(0..=6).contains(&rule.day_of_week) {
        return Err(AppError::Validation(format!(
            "day_of_week must be 0-6, got {}",
            rule.day_of_week
        )));
    }
    if Recurrence::parse(&rule.recurrence_type).is_none() {
        return Err(AppError::Validation(format!(
            "unknown recurrence_type '{}'",
            rule.recurrence_type
        )));
    }
    if !ACTIVITY_TYPES.contains(&rule.activity_type.as_str()) {
        return Err(AppError::Validation(format!(
            "unknown activity_type '{}'",
            rule.activity_type
        )));
    }
    if rule.end_time <= rule.start_time {
        return Err(AppError::Validation(
            "end_time must be after start_time".into(),
        ));
    }
    if let Some(end) = rule.end_date {
        if end < rule.start_date {
            return Err(AppError::Validation(
                "end_date must not precede start_date".into(),
            ));
        }
    }
    if matches!(rule.max_participants, Some(n) if n < 0) {
        return Err(AppError::Validation(
            "max_participants must not be negative".into(),
        ));
    }
    Ok(())
}

pub async fn get_rule(
    pool: &SqlitePool,
    recurring_activity_id: &str,
) -> Result<RecurringActivityRow, AppError> {
    recurring_activity_repo::load_rule(pool, recurring_activity_id)
        .await?
        .ok_or(AppError::NotFound("recurring activity"))
}

pub async fn list_rules(pool: &SqlitePool) -> Result<Vec<RecurringActivityRow>, AppError> {
    Ok(recurring_activity_repo::list_rules(pool).await?)
}

/// Persists the rule plus its default-membership template, then runs the
/// generator once for the initial materialization.
pub async fn create_rule(
    pool: &SqlitePool,
    created_by: Option<&str>,
    input: NewRecurringActivity,
) -> Result<(RecurringActivityRow, GenerationReport), AppError> {
    let rule = RecurringActivityRow {
        recurring_activity_id: Uuid::new_v4().to_string(),
        title: input.title,
        description: input.description,
        location: input.location,
        day_of_week: input.day_of_week,
        start_time: input.start_time,
        end_time: input.end_time,
        recurrence_type: input.recurrence_type,
        start_date: input.start_date,
        end_date: input.end_date,
        activity_type: input
            .activity_type
            .unwrap_or_else(|| "with_adherents".to_string()),
        max_participants: input.max_participants,
        has_transport: input.has_transport as i64,
        transport_capacity: input.transport_capacity,
        is_paid: input.is_paid as i64,
        price: input.price,
        created_by: created_by.map(str::to_string),
    };
    validate_rule(&rule)?;

    recurring_activity_repo::insert_rule(pool, &rule).await?;
    for p in &input.participants {
        recurring_activity_repo::insert_default_participant(
            pool,
            &rule.recurring_activity_id,
            &p.user_id,
            p.needs_transport as i64,
        )
        .await?;
    }
    for user_id in &input.accompagnateurs {
        recurring_activity_repo::insert_default_accompagnateur(
            pool,
            &rule.recurring_activity_id,
            user_id,
        )
        .await?;
    }

    let report =
        instance_service::generate_instances(pool, &rule.recurring_activity_id, input.generate_up_to)
            .await?;
    Ok((rule, report))
}

/// Patches the rule; unless `regenerate_instances` is false, future
/// instances are deleted and regenerated. Past instances stay untouched.
pub async fn update_rule(
    pool: &SqlitePool,
    recurring_activity_id: &str,
    patch: UpdateRecurringActivity,
) -> Result<(RecurringActivityRow, Option<GenerationReport>), AppError> {
    let mut rule = get_rule(pool, recurring_activity_id).await?;

    if let Some(v) = patch.title {
        rule.title = v;
    }
    if let Some(v) = patch.description {
        rule.description = Some(v);
    }
    if let Some(v) = patch.location {
        rule.location = Some(v);
    }
    if let Some(v) = patch.day_of_week {
        rule.day_of_week = v;
    }
    if let Some(v) = patch.start_time {
        rule.start_time = v;
    }
    if let Some(v) = patch.end_time {
        rule.end_time = v;
    }
    if let Some(v) = patch.recurrence_type {
        rule.recurrence_type = v;
    }
    if let Some(v) = patch.start_date {
        rule.start_date = v;
    }
    if let Some(v) = patch.end_date {
        rule.end_date = Some(v);
    }
    if let Some(v) = patch.activity_type {
        rule.activity_type = v;
    }
    if let Some(v) = patch.max_participants {
        rule.max_participants = Some(v);
    }
    if let Some(v) = patch.has_transport {
        rule.has_transport = v as i64;
    }
    if let Some(v) = patch.transport_capacity {
        rule.transport_capacity = v;
    }
    if let Some(v) = patch.is_paid {
        rule.is_paid = v as i64;
    }
    if let Some(v) = patch.price {
        rule.price = v;
    }
    validate_rule(&rule)?;

    recurring_activity_repo::update_rule(pool, &rule).await?;

    if patch.regenerate_instances.unwrap_or(true) {
        let deleted = activity_repo::delete_future_instances(
            pool,
            recurring_activity_id,
            Utc::now().naive_utc(),
        )
        .await?;
        info!(
            recurring_activity_id,
            deleted, "deleted future instances before regeneration"
        );
        let report =
            instance_service::generate_instances(pool, recurring_activity_id, patch.generate_up_to)
                .await?;
        Ok((rule, Some(report)))
    } else {
        Ok((rule, None))
    }
}

/// Removes the rule. With `keep_past_instances` only future instances are
/// deleted; otherwise every instance is detached (orphaned as a standalone
/// activity) instead of deleted. The template rows go with the rule via
/// cascade.
pub async fn delete_rule(
    pool: &SqlitePool,
    recurring_activity_id: &str,
    keep_past_instances: bool,
) -> Result<(), AppError> {
    // Existence check up front so a missing rule is a 404, not a no-op.
    get_rule(pool, recurring_activity_id).await?;

    let mut tx = pool.begin().await?;
    if keep_past_instances {
        activity_repo::delete_future_instances(
            &mut *tx,
            recurring_activity_id,
            Utc::now().naive_utc(),
        )
        .await?;
    } else {
        activity_repo::detach_instances(&mut *tx, recurring_activity_id).await?;
    }
    recurring_activity_repo::delete_rule(&mut *tx, recurring_activity_id).await?;
    tx.commit().await?;
    Ok(())
}
