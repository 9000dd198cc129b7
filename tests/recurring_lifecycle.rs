mod common;

use chrono::NaiveDate;

use association_backend::database::activity_repo;
use association_backend::errors::AppError;
use association_backend::services::recurring_service::{
    self, NewRecurringActivity, UpdateRecurringActivity,
};

use common::{date, setup_pool, time};

fn weekly_rule(start: NaiveDate, up_to: NaiveDate) -> NewRecurringActivity {
    NewRecurringActivity {
        title: "Sortie piscine".to_string(),
        description: None,
        location: None,
        day_of_week: 1,
        start_time: time(14, 0),
        end_time: time(16, 0),
        recurrence_type: "weekly".to_string(),
        start_date: start,
        end_date: None,
        activity_type: None,
        max_participants: None,
        has_transport: false,
        transport_capacity: 0,
        is_paid: false,
        price: 0.0,
        participants: Vec::new(),
        accompagnateurs: Vec::new(),
        generate_up_to: Some(up_to),
    }
}

#[tokio::test]
async fn updating_the_rule_replaces_future_instances() {
    let pool = setup_pool().await;

    // 2030-01-07 is a Monday; every instance is in the future.
    let (rule, report) =
        recurring_service::create_rule(&pool, None, weekly_rule(date(2030, 1, 7), date(2030, 1, 28)))
            .await
            .unwrap();
    assert_eq!(report.created.len(), 4);

    let patch = UpdateRecurringActivity {
        day_of_week: Some(2),
        generate_up_to: Some(date(2030, 1, 28)),
        ..Default::default()
    };
    let (updated, report) = recurring_service::update_rule(&pool, &rule.recurring_activity_id, patch)
        .await
        .unwrap();
    assert_eq!(updated.day_of_week, 2);

    let report = report.expect("regeneration runs by default");
    assert_eq!(report.created.len(), 3);

    let instances = activity_repo::list_instances(&pool, &rule.recurring_activity_id)
        .await
        .unwrap();
    let days: Vec<_> = instances.iter().map(|a| a.start_date.date()).collect();
    assert_eq!(
        days,
        vec![date(2030, 1, 8), date(2030, 1, 15), date(2030, 1, 22)]
    );
}

#[tokio::test]
async fn updating_the_rule_never_touches_past_instances() {
    let pool = setup_pool().await;

    let (rule, report) =
        recurring_service::create_rule(&pool, None, weekly_rule(date(2024, 1, 1), date(2024, 1, 22)))
            .await
            .unwrap();
    assert_eq!(report.created.len(), 4);

    let patch = UpdateRecurringActivity {
        title: Some("Sortie mer".to_string()),
        generate_up_to: Some(date(2024, 1, 22)),
        ..Default::default()
    };
    let (_, report) = recurring_service::update_rule(&pool, &rule.recurring_activity_id, patch)
        .await
        .unwrap();
    assert!(report.unwrap().created.is_empty());

    let instances = activity_repo::list_instances(&pool, &rule.recurring_activity_id)
        .await
        .unwrap();
    assert_eq!(instances.len(), 4);
    for instance in &instances {
        assert_eq!(instance.title, "Sortie piscine");
    }
}

#[tokio::test]
async fn opting_out_of_regeneration_leaves_instances_alone() {
    let pool = setup_pool().await;

    let (rule, _) =
        recurring_service::create_rule(&pool, None, weekly_rule(date(2030, 1, 7), date(2030, 1, 28)))
            .await
            .unwrap();

    let patch = UpdateRecurringActivity {
        title: Some("Sortie lac".to_string()),
        regenerate_instances: Some(false),
        ..Default::default()
    };
    let (_, report) = recurring_service::update_rule(&pool, &rule.recurring_activity_id, patch)
        .await
        .unwrap();
    assert!(report.is_none());

    let instances = activity_repo::list_instances(&pool, &rule.recurring_activity_id)
        .await
        .unwrap();
    assert_eq!(instances.len(), 4);
    for instance in &instances {
        assert_eq!(instance.title, "Sortie piscine");
    }
}

#[tokio::test]
async fn deleting_a_rule_keeping_past_removes_future_instances() {
    let pool = setup_pool().await;

    let (rule, _) =
        recurring_service::create_rule(&pool, None, weekly_rule(date(2030, 1, 7), date(2030, 1, 28)))
            .await
            .unwrap();

    recurring_service::delete_rule(&pool, &rule.recurring_activity_id, true)
        .await
        .unwrap();

    assert!(matches!(
        recurring_service::get_rule(&pool, &rule.recurring_activity_id).await,
        Err(AppError::NotFound(_))
    ));
    let remaining = activity_repo::list_activities(&pool).await.unwrap();
    assert!(remaining.is_empty());
}

#[tokio::test]
async fn deleting_a_rule_keeping_past_detaches_past_instances() {
    let pool = setup_pool().await;

    let (rule, _) =
        recurring_service::create_rule(&pool, None, weekly_rule(date(2024, 1, 1), date(2024, 1, 22)))
            .await
            .unwrap();

    recurring_service::delete_rule(&pool, &rule.recurring_activity_id, true)
        .await
        .unwrap();

    let remaining = activity_repo::list_activities(&pool).await.unwrap();
    assert_eq!(remaining.len(), 4);
    for activity in &remaining {
        assert!(activity.recurring_activity_id.is_none());
    }
}

#[tokio::test]
async fn deleting_a_rule_without_keeping_past_orphans_all_instances() {
    let pool = setup_pool().await;

    let (rule, _) =
        recurring_service::create_rule(&pool, None, weekly_rule(date(2030, 1, 7), date(2030, 1, 28)))
            .await
            .unwrap();

    recurring_service::delete_rule(&pool, &rule.recurring_activity_id, false)
        .await
        .unwrap();

    let remaining = activity_repo::list_activities(&pool).await.unwrap();
    assert_eq!(remaining.len(), 4);
    for activity in &remaining {
        assert!(activity.recurring_activity_id.is_none());
    }
}

#[tokio::test]
async fn deleting_an_unknown_rule_is_not_found() {
    let pool = setup_pool().await;
    assert!(matches!(
        recurring_service::delete_rule(&pool, "nope", true).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn invalid_rules_are_rejected() {
    let pool = setup_pool().await;

    let mut input = weekly_rule(date(2024, 1, 1), date(2024, 1, 8));
    input.day_of_week = 7;
    assert!(matches!(
        recurring_service::create_rule(&pool, None, input).await,
        Err(AppError::Validation(_))
    ));

    let mut input = weekly_rule(date(2024, 1, 1), date(2024, 1, 8));
    input.end_time = time(13, 0);
    assert!(matches!(
        recurring_service::create_rule(&pool, None, input).await,
        Err(AppError::Validation(_))
    ));

    let mut input = weekly_rule(date(2024, 1, 1), date(2024, 1, 8));
    input.recurrence_type = "daily".to_string();
    assert!(matches!(
        recurring_service::create_rule(&pool, None, input).await,
        Err(AppError::Validation(_))
    ));
}
