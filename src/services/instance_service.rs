use chrono::{Months, NaiveDate, Utc};
use serde::Serialize;
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{info, warn};
use uuid::Uuid;

use crate::database::{activity_members_repo, activity_repo, recurring_activity_repo};
use crate::errors::AppError;
use crate::models::{ActivityRow, RecurringActivityRow};
use crate::services::occurrence::{occurrences, Recurrence};

pub const DEFAULT_HORIZON_MONTHS: u32 = 3;

#[derive(Debug, Serialize)]
pub struct AttachmentFailure {
    pub activity_id: String,
    pub user_id: String,
    pub kind: &'static str,
    pub reason: String,
}

#[derive(Debug, Serialize)]
pub struct GenerationReport {
    pub created: Vec<ActivityRow>,
    pub attachment_failures: Vec<AttachmentFailure>,
}

/// Materializes the Activity rows a rule implies between its start date and
/// min(rule end date, horizon). Dates that already have an instance with the
/// exact same start timestamp are skipped, so re-running extends coverage
/// without duplicating. Default participant/accompanist attachment failures
/// are collected in the report and never abort the batch.
pub async fn generate_instances(
    pool: &SqlitePool,
    recurring_activity_id: &str,
    up_to: Option<NaiveDate>,
) -> Result<GenerationReport, AppError> {
    let rule = recurring_activity_repo::load_rule(pool, recurring_activity_id)
        .await?
        .ok_or(AppError::NotFound("recurring activity"))?;
    let recurrence = Recurrence::parse(&rule.recurrence_type).ok_or_else(|| {
        AppError::Validation(format!(
            "unknown recurrence_type '{}'",
            rule.recurrence_type
        ))
    })?;

    let mut horizon =
        up_to.unwrap_or_else(|| Utc::now().date_naive() + Months::new(DEFAULT_HORIZON_MONTHS));
    if let Some(end) = rule.end_date {
        if end < horizon {
            horizon = end;
        }
    }

    let default_participants =
        recurring_activity_repo::list_default_participants(pool, recurring_activity_id).await?;
    let default_accompagnateurs =
        recurring_activity_repo::list_default_accompagnateurs(pool, recurring_activity_id).await?;

    let mut report = GenerationReport {
        created: Vec::new(),
        attachment_failures: Vec::new(),
    };

    let mut tx = pool.begin().await?;

    for date in occurrences(rule.start_date, rule.day_of_week, recurrence) {
        if date > horizon {
            break;
        }

        let start = date.and_time(rule.start_time);
        if activity_repo::instance_exists_at(&mut *tx, recurring_activity_id, start).await? {
            continue;
        }

        let instance = instance_row(&rule, date);
        activity_repo::insert_activity(&mut *tx, &instance).await?;

        for p in &default_participants {
            if let Err(e) =
                attach_participant(&mut tx, &instance, &p.user_id, p.needs_transport).await
            {
                warn!(
                    activity_id = %instance.activity_id,
                    user_id = %p.user_id,
                    "default participant attachment failed: {}",
                    e
                );
                report.attachment_failures.push(AttachmentFailure {
                    activity_id: instance.activity_id.clone(),
                    user_id: p.user_id.clone(),
                    kind: "participant",
                    reason: e.to_string(),
                });
            }
        }

        for a in &default_accompagnateurs {
            if let Err(e) = attach_accompagnateur(&mut tx, &instance, &a.user_id).await {
                warn!(
                    activity_id = %instance.activity_id,
                    user_id = %a.user_id,
                    "default accompagnateur attachment failed: {}",
                    e
                );
                report.attachment_failures.push(AttachmentFailure {
                    activity_id: instance.activity_id.clone(),
                    user_id: a.user_id.clone(),
                    kind: "accompagnateur",
                    reason: e.to_string(),
                });
            }
        }

        report.created.push(instance);
    }

    tx.commit().await?;

    info!(
        recurring_activity_id,
        created = report.created.len(),
        attachment_failures = report.attachment_failures.len(),
        "instance generation finished"
    );

    Ok(report)
}

fn instance_row(rule: &RecurringActivityRow, date: NaiveDate) -> ActivityRow {
    ActivityRow {
        activity_id: Uuid::new_v4().to_string(),
        title: rule.title.clone(),
        description: rule.description.clone(),
        start_date: date.and_time(rule.start_time),
        end_date: date.and_time(rule.end_time),
        location: rule.location.clone(),
        activity_type: rule.activity_type.clone(),
        max_participants: rule.max_participants,
        has_transport: rule.has_transport,
        transport_capacity: rule.transport_capacity,
        is_paid: rule.is_paid,
        price: rule.price,
        recurring_activity_id: Some(rule.recurring_activity_id.clone()),
        created_by: rule.created_by.clone(),
        status: "pending".to_string(),
        started_at: None,
        completed_at: None,
    }
}

async fn attach_participant(
    tx: &mut Transaction<'_, Sqlite>,
    activity: &ActivityRow,
    user_id: &str,
    needs_transport: i64,
) -> Result<(), AppError> {
    if activity_members_repo::participant_exists(&mut **tx, &activity.activity_id, user_id).await? {
        return Err(AppError::Conflict("participant already attached".into()));
    }
    if let Some(max) = activity.max_participants {
        let count =
            activity_members_repo::count_participants(&mut **tx, &activity.activity_id).await?;
        if count >= max {
            return Err(AppError::Conflict("activity is full".into()));
        }
    }
    activity_members_repo::insert_participant(
        &mut **tx,
        &activity.activity_id,
        user_id,
        needs_transport,
    )
    .await?;
    Ok(())
}

async fn attach_accompagnateur(
    tx: &mut Transaction<'_, Sqlite>,
    activity: &ActivityRow,
    user_id: &str,
) -> Result<(), AppError> {
    if activity_members_repo::accompagnateur_exists(&mut **tx, &activity.activity_id, user_id)
        .await?
    {
        return Err(AppError::Conflict("accompagnateur already attached".into()));
    }
    activity_members_repo::insert_accompagnateur(&mut **tx, &activity.activity_id, user_id).await?;
    Ok(())
}
