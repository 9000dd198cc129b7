use chrono::{Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use crate::database::{adherent_repo, membership_repo, membership_request_repo, user_repo};
use crate::errors::AppError;
use crate::models::{AdherentRow, MembershipRequestRow, MembershipRow, UserRow};
use crate::services::crypto;

#[derive(Debug, Deserialize)]
pub struct NewMembershipRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    #[serde(default)]
    pub est_benevole: bool,
    pub formule_id: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ApproveRequest {
    // Overrides the formule picked on the request, when the admin chooses a
    // different one at approval time.
    pub formule_id: Option<String>,
    pub payment_frequency: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ApprovalOutcome {
    pub request: MembershipRequestRow,
    pub user: UserRow,
    pub adherent: AdherentRow,
    pub membership: Option<MembershipRow>,
    // One-time password for the freshly provisioned account; the admin
    // relays it to the new member.
    pub generated_password: String,
}

fn membership_end_date(start: NaiveDate, payment_frequency: &str) -> Result<NaiveDate, AppError> {
    let months = match payment_frequency {
        "monthly" => 1,
        "quarterly" => 3,
        "yearly" => 12,
        other => {
            return Err(AppError::Validation(format!(
                "unknown payment_frequency '{other}'"
            )))
        }
    };
    Ok(start + Months::new(months))
}

pub async fn submit_request(
    pool: &SqlitePool,
    input: NewMembershipRequest,
) -> Result<MembershipRequestRow, AppError> {
    if !input.email.contains('@') {
        return Err(AppError::Validation("invalid email".into()));
    }
    if input.first_name.trim().is_empty() || input.last_name.trim().is_empty() {
        return Err(AppError::Validation("name must not be empty".into()));
    }

    let row = MembershipRequestRow {
        request_id: Uuid::new_v4().to_string(),
        email: input.email,
        first_name: input.first_name,
        last_name: input.last_name,
        phone: input.phone,
        est_benevole: input.est_benevole as i64,
        formule_id: input.formule_id,
        status: "pending".to_string(),
        created_at: Utc::now().naive_utc(),
        processed_at: None,
    };
    membership_request_repo::insert_request(pool, &row).await?;
    Ok(row)
}

pub async fn list_requests(
    pool: &SqlitePool,
    status: Option<&str>,
) -> Result<Vec<MembershipRequestRow>, AppError> {
    if let Some(s) = status {
        if !["pending", "approved", "rejected"].contains(&s) {
            return Err(AppError::Validation(format!("unknown status '{s}'")));
        }
    }
    Ok(membership_request_repo::list_requests(pool, status).await?)
}

/// Approves a pending request: provisions the user account, upserts the
/// adherent record by email and, for non-volunteers with a formule, opens a
/// membership billing row. One transaction; any failure rolls back all of it.
pub async fn approve_request(
    pool: &SqlitePool,
    request_id: &str,
    input: ApproveRequest,
) -> Result<ApprovalOutcome, AppError> {
    let now = Utc::now().naive_utc();
    let today = now.date();

    let mut tx = pool.begin().await?;

    let mut request = membership_request_repo::load_request(&mut *tx, request_id)
        .await?
        .ok_or(AppError::NotFound("membership request"))?;
    if request.status != "pending" {
        return Err(AppError::Conflict(format!(
            "request already {}",
            request.status
        )));
    }

    if user_repo::load_user_by_email(&mut *tx, &request.email)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(
            "a user with this email already exists".into(),
        ));
    }

    let generated_password = Uuid::new_v4().simple().to_string();
    let role = if request.est_benevole != 0 {
        "benevole"
    } else {
        "adherent"
    };
    let user = UserRow {
        user_id: Uuid::new_v4().to_string(),
        email: request.email.clone(),
        password_hash: crypto::hash_password(&generated_password),
        first_name: request.first_name.clone(),
        last_name: request.last_name.clone(),
        role: role.to_string(),
        is_vehiculed: 0,
        created_at: now,
    };
    user_repo::insert_user(&mut *tx, &user).await?;

    let adherent = match adherent_repo::find_by_email(&mut *tx, &request.email).await? {
        Some(existing) => existing,
        None => {
            let fresh = AdherentRow {
                adherent_id: Uuid::new_v4().to_string(),
                email: request.email.clone(),
                first_name: request.first_name.clone(),
                last_name: request.last_name.clone(),
                phone: request.phone.clone(),
                created_at: now,
            };
            adherent_repo::insert_adherent(&mut *tx, &fresh).await?;
            fresh
        }
    };

    let formule_id = input.formule_id.or_else(|| request.formule_id.clone());
    let membership = if request.est_benevole == 0 {
        match formule_id {
            Some(formule_id) => {
                if membership_repo::load_formule(&mut *tx, &formule_id)
                    .await?
                    .is_none()
                {
                    return Err(AppError::NotFound("formule"));
                }
                let frequency = input
                    .payment_frequency
                    .ok_or_else(|| AppError::Validation("payment_frequency is required".into()))?;
                let row = MembershipRow {
                    membership_id: Uuid::new_v4().to_string(),
                    adherent_id: adherent.adherent_id.clone(),
                    formule_id,
                    start_date: today,
                    end_date: membership_end_date(today, &frequency)?,
                    payment_frequency: frequency,
                    payment_status: "pending".to_string(),
                };
                membership_repo::insert_membership(&mut *tx, &row).await?;
                Some(row)
            }
            None => None,
        }
    } else {
        None
    };

    membership_request_repo::update_status(&mut *tx, request_id, "approved", now).await?;
    request.status = "approved".to_string();
    request.processed_at = Some(now);

    tx.commit().await?;

    info!(request_id, user_id = %user.user_id, role, "membership request approved");

    Ok(ApprovalOutcome {
        request,
        user,
        adherent,
        membership,
        generated_password,
    })
}

pub async fn reject_request(
    pool: &SqlitePool,
    request_id: &str,
) -> Result<MembershipRequestRow, AppError> {
    let now = Utc::now().naive_utc();

    let mut request = membership_request_repo::load_request(pool, request_id)
        .await?
        .ok_or(AppError::NotFound("membership request"))?;
    if request.status != "pending" {
        return Err(AppError::Conflict(format!(
            "request already {}",
            request.status
        )));
    }

    membership_request_repo::update_status(pool, request_id, "rejected", now).await?;
    request.status = "rejected".to_string();
    request.processed_at = Some(now);
    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn end_date_follows_payment_frequency() {
        let start = date(2024, 1, 15);
        assert_eq!(
            membership_end_date(start, "monthly").unwrap(),
            date(2024, 2, 15)
        );
        assert_eq!(
            membership_end_date(start, "quarterly").unwrap(),
            date(2024, 4, 15)
        );
        assert_eq!(
            membership_end_date(start, "yearly").unwrap(),
            date(2025, 1, 15)
        );
    }

    #[test]
    fn unknown_frequency_is_rejected() {
        assert!(membership_end_date(date(2024, 1, 1), "weekly").is_err());
    }
}
