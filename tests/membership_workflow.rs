mod common;

use chrono::{Months, Utc};

use association_backend::database::{membership_repo, user_repo};
use association_backend::errors::AppError;
use association_backend::services::membership_service::{
    self, ApproveRequest, NewMembershipRequest,
};

use common::{insert_formule, insert_user, setup_pool};

fn request(email: &str, est_benevole: bool, formule_id: Option<String>) -> NewMembershipRequest {
    NewMembershipRequest {
        email: email.to_string(),
        first_name: "Claire".to_string(),
        last_name: "Martin".to_string(),
        phone: Some("0600000000".to_string()),
        est_benevole,
        formule_id,
    }
}

#[tokio::test]
async fn approval_provisions_account_adherent_and_membership() {
    let pool = setup_pool().await;
    let formule_id = insert_formule(&pool, "Annuelle", 120.0).await;

    let submitted = membership_service::submit_request(
        &pool,
        request("claire@example.org", false, Some(formule_id.clone())),
    )
    .await
    .unwrap();
    assert_eq!(submitted.status, "pending");

    let outcome = membership_service::approve_request(
        &pool,
        &submitted.request_id,
        ApproveRequest {
            formule_id: None,
            payment_frequency: Some("monthly".to_string()),
        },
    )
    .await
    .unwrap();

    assert_eq!(outcome.request.status, "approved");
    assert!(outcome.request.processed_at.is_some());
    assert_eq!(outcome.user.role, "adherent");
    assert_eq!(outcome.user.email, "claire@example.org");
    assert!(!outcome.generated_password.is_empty());

    let membership = outcome.membership.expect("formule picked, so a membership opens");
    assert_eq!(membership.formule_id, formule_id);
    assert_eq!(membership.payment_status, "pending");
    let today = Utc::now().date_naive();
    assert_eq!(membership.start_date, today);
    assert_eq!(membership.end_date, today + Months::new(1));

    // Everything actually landed in the database.
    let user = user_repo::load_user_by_email(&pool, "claire@example.org")
        .await
        .unwrap()
        .expect("user row");
    assert_ne!(user.password_hash, outcome.generated_password);

    let memberships =
        membership_repo::list_memberships_for_adherent(&pool, &outcome.adherent.adherent_id)
            .await
            .unwrap();
    assert_eq!(memberships.len(), 1);
}

#[tokio::test]
async fn volunteers_get_an_account_but_no_membership() {
    let pool = setup_pool().await;

    let submitted =
        membership_service::submit_request(&pool, request("benevole@example.org", true, None))
            .await
            .unwrap();

    let outcome =
        membership_service::approve_request(&pool, &submitted.request_id, ApproveRequest::default())
            .await
            .unwrap();

    assert_eq!(outcome.user.role, "benevole");
    assert!(outcome.membership.is_none());
}

#[tokio::test]
async fn approving_twice_is_a_conflict() {
    let pool = setup_pool().await;

    let submitted =
        membership_service::submit_request(&pool, request("twice@example.org", true, None))
            .await
            .unwrap();

    membership_service::approve_request(&pool, &submitted.request_id, ApproveRequest::default())
        .await
        .unwrap();
    assert!(matches!(
        membership_service::approve_request(&pool, &submitted.request_id, ApproveRequest::default())
            .await,
        Err(AppError::Conflict(_))
    ));
}

#[tokio::test]
async fn approving_conflicts_when_the_email_is_taken() {
    let pool = setup_pool().await;
    let user_id = insert_user(&pool, "adherent", false).await;
    let taken_email = format!("{user_id}@example.org");

    let submitted = membership_service::submit_request(&pool, request(&taken_email, true, None))
        .await
        .unwrap();

    assert!(matches!(
        membership_service::approve_request(&pool, &submitted.request_id, ApproveRequest::default())
            .await,
        Err(AppError::Conflict(_))
    ));

    // Rolled back: still pending, no account created beyond the original.
    let requests = membership_service::list_requests(&pool, Some("pending"))
        .await
        .unwrap();
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn membership_requires_payment_frequency() {
    let pool = setup_pool().await;
    let formule_id = insert_formule(&pool, "Trimestrielle", 45.0).await;

    let submitted = membership_service::submit_request(
        &pool,
        request("freq@example.org", false, Some(formule_id)),
    )
    .await
    .unwrap();

    assert!(matches!(
        membership_service::approve_request(&pool, &submitted.request_id, ApproveRequest::default())
            .await,
        Err(AppError::Validation(_))
    ));
}

#[tokio::test]
async fn rejecting_marks_the_request_processed() {
    let pool = setup_pool().await;

    let submitted =
        membership_service::submit_request(&pool, request("reject@example.org", false, None))
            .await
            .unwrap();

    let rejected = membership_service::reject_request(&pool, &submitted.request_id)
        .await
        .unwrap();
    assert_eq!(rejected.status, "rejected");
    assert!(rejected.processed_at.is_some());

    assert!(matches!(
        membership_service::reject_request(&pool, &submitted.request_id).await,
        Err(AppError::Conflict(_))
    ));
}

#[tokio::test]
async fn unknown_requests_are_not_found() {
    let pool = setup_pool().await;
    assert!(matches!(
        membership_service::approve_request(&pool, "missing", ApproveRequest::default()).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        membership_service::reject_request(&pool, "missing").await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn submissions_are_validated() {
    let pool = setup_pool().await;
    assert!(matches!(
        membership_service::submit_request(&pool, request("not-an-email", false, None)).await,
        Err(AppError::Validation(_))
    ));
}
