mod common;

use association_backend::errors::AppError;
use association_backend::services::activity_service::{self, NewActivity};
use association_backend::services::transport_service;

use common::{datetime, insert_user, setup_pool};

fn transported_outing(capacity: i64) -> NewActivity {
    NewActivity {
        title: "Sortie accrobranche".to_string(),
        description: None,
        start_date: datetime(2030, 6, 15, 9, 0),
        end_date: datetime(2030, 6, 15, 18, 0),
        location: Some("Foret de Sille".to_string()),
        activity_type: None,
        max_participants: None,
        has_transport: true,
        transport_capacity: capacity,
        is_paid: false,
        price: 0.0,
    }
}

#[tokio::test]
async fn plan_fills_association_vehicle_then_driver_vehicles() {
    let pool = setup_pool().await;
    let p1 = insert_user(&pool, "adherent", false).await;
    let p2 = insert_user(&pool, "adherent", false).await;
    let p3 = insert_user(&pool, "adherent", false).await;
    let walker = insert_user(&pool, "adherent", false).await;
    let driver = insert_user(&pool, "accompagnateur", true).await;
    let on_foot_guide = insert_user(&pool, "accompagnateur", false).await;

    let activity = activity_service::create_activity(&pool, None, transported_outing(2))
        .await
        .unwrap();
    for user in [&p1, &p2, &p3] {
        activity_service::add_participant(&pool, &activity.activity_id, user, true)
            .await
            .unwrap();
    }
    activity_service::add_participant(&pool, &activity.activity_id, &walker, false)
        .await
        .unwrap();
    activity_service::add_accompagnateur(&pool, &activity.activity_id, &driver)
        .await
        .unwrap();
    activity_service::add_accompagnateur(&pool, &activity.activity_id, &on_foot_guide)
        .await
        .unwrap();

    let plan = transport_service::plan_transport(&pool, &activity.activity_id)
        .await
        .unwrap();

    assert_eq!(plan.transport_demand, 3);
    assert_eq!(
        plan.available_seats,
        2 + transport_service::SEATS_PER_ACCOMPAGNATEUR_VEHICLE
    );

    // Only the vehiculed accompagnateur contributes a vehicle.
    assert_eq!(plan.vehicles.len(), 2);
    assert_eq!(plan.vehicles[0].vehicle, "association");
    assert_eq!(plan.vehicles[0].passenger_user_ids, vec![p1.clone(), p2.clone()]);
    assert_eq!(plan.vehicles[1].vehicle, driver);
    assert_eq!(plan.vehicles[1].passenger_user_ids, vec![p3.clone()]);
    assert!(plan.unassigned_participants.is_empty());
}

#[tokio::test]
async fn overflow_demand_is_listed_unassigned() {
    let pool = setup_pool().await;
    let p1 = insert_user(&pool, "adherent", false).await;
    let p2 = insert_user(&pool, "adherent", false).await;
    let p3 = insert_user(&pool, "adherent", false).await;

    let activity = activity_service::create_activity(&pool, None, transported_outing(2))
        .await
        .unwrap();
    for user in [&p1, &p2, &p3] {
        activity_service::add_participant(&pool, &activity.activity_id, user, true)
            .await
            .unwrap();
    }

    let plan = transport_service::plan_transport(&pool, &activity.activity_id)
        .await
        .unwrap();

    assert_eq!(plan.available_seats, 2);
    assert_eq!(plan.transport_demand, 3);
    assert_eq!(plan.vehicles.len(), 1);
    assert_eq!(plan.unassigned_participants, vec![p3]);
}

#[tokio::test]
async fn plan_for_unknown_activity_is_not_found() {
    let pool = setup_pool().await;
    assert!(matches!(
        transport_service::plan_transport(&pool, "missing").await,
        Err(AppError::NotFound(_))
    ));
}
