use serde::Serialize;
use sqlx::SqlitePool;

use crate::database::activity_members_repo;
use crate::errors::AppError;
use crate::services::activity_service;

// Policy constant: every accompagnateur vehicle is assumed to seat four
// passengers, regardless of the actual car.
pub const SEATS_PER_ACCOMPAGNATEUR_VEHICLE: i64 = 4;

#[derive(Debug, Serialize)]
pub struct VehicleAssignment {
    // "association" for the association's own transport capacity, or the
    // driving accompagnateur's user id.
    pub vehicle: String,
    pub capacity: i64,
    pub passenger_user_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct TransportPlanView {
    pub activity_id: String,
    pub available_seats: i64,
    pub transport_demand: i64,
    pub vehicles: Vec<VehicleAssignment>,
    pub unassigned_participants: Vec<String>,
}

/// Read-time aggregation of seat supply versus demand for one activity.
/// Nothing is persisted; the plan is recomputed on every call, and seats are
/// filled greedily in row order.
pub async fn plan_transport(
    pool: &SqlitePool,
    activity_id: &str,
) -> Result<TransportPlanView, AppError> {
    let activity = activity_service::get_activity(pool, activity_id).await?;

    let demand_users =
        activity_members_repo::list_transport_participant_users(pool, activity_id).await?;
    let drivers =
        activity_members_repo::list_vehiculed_accompagnateur_users(pool, activity_id).await?;

    let demand: Vec<String> = demand_users.into_iter().map(|u| u.user_id).collect();
    let driver_ids: Vec<String> = drivers.into_iter().map(|u| u.user_id).collect();

    let available_seats = activity.transport_capacity
        + SEATS_PER_ACCOMPAGNATEUR_VEHICLE * driver_ids.len() as i64;

    let (vehicles, unassigned_participants) =
        assign_seats(activity.transport_capacity, &driver_ids, &demand);

    Ok(TransportPlanView {
        activity_id: activity.activity_id,
        available_seats,
        transport_demand: demand.len() as i64,
        vehicles,
        unassigned_participants,
    })
}

// Greedy fill: the association vehicle first, then each accompagnateur
// vehicle, in list order. Overflow stays unassigned.
fn assign_seats(
    association_capacity: i64,
    driver_ids: &[String],
    demand: &[String],
) -> (Vec<VehicleAssignment>, Vec<String>) {
    let mut vehicles = Vec::with_capacity(1 + driver_ids.len());
    let mut remaining = demand.iter();

    if association_capacity > 0 {
        let passengers: Vec<String> = remaining
            .by_ref()
            .take(association_capacity as usize)
            .cloned()
            .collect();
        vehicles.push(VehicleAssignment {
            vehicle: "association".to_string(),
            capacity: association_capacity,
            passenger_user_ids: passengers,
        });
    }

    for driver in driver_ids {
        let passengers: Vec<String> = remaining
            .by_ref()
            .take(SEATS_PER_ACCOMPAGNATEUR_VEHICLE as usize)
            .cloned()
            .collect();
        vehicles.push(VehicleAssignment {
            vehicle: driver.clone(),
            capacity: SEATS_PER_ACCOMPAGNATEUR_VEHICLE,
            passenger_user_ids: passengers,
        });
    }

    (vehicles, remaining.cloned().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn fills_association_vehicle_before_accompagnateur_vehicles() {
        let demand = ids(&["p1", "p2", "p3", "p4", "p5", "p6"]);
        let drivers = ids(&["d1"]);
        let (vehicles, unassigned) = assign_seats(3, &drivers, &demand);

        assert_eq!(vehicles.len(), 2);
        assert_eq!(vehicles[0].vehicle, "association");
        assert_eq!(vehicles[0].passenger_user_ids, ids(&["p1", "p2", "p3"]));
        assert_eq!(vehicles[1].vehicle, "d1");
        assert_eq!(vehicles[1].passenger_user_ids, ids(&["p4", "p5", "p6"]));
        assert!(unassigned.is_empty());
    }

    #[test]
    fn overflow_stays_unassigned() {
        let demand = ids(&["p1", "p2", "p3", "p4", "p5", "p6"]);
        let (vehicles, unassigned) = assign_seats(2, &ids(&["d1"]), &demand);

        let assigned: usize = vehicles.iter().map(|v| v.passenger_user_ids.len()).sum();
        assert_eq!(assigned, 6 - unassigned.len());
        assert_eq!(unassigned, ids(&["p6"]));
    }

    #[test]
    fn assigned_plus_unassigned_equals_demand() {
        let demand = ids(&["a", "b", "c", "d", "e", "f", "g"]);
        for capacity in 0..4 {
            for driver_count in 0..3 {
                let drivers: Vec<String> =
                    (0..driver_count).map(|i| format!("d{i}")).collect();
                let (vehicles, unassigned) = assign_seats(capacity, &drivers, &demand);
                let assigned: usize =
                    vehicles.iter().map(|v| v.passenger_user_ids.len()).sum();
                assert_eq!(assigned + unassigned.len(), demand.len());
            }
        }
    }

    #[test]
    fn zero_capacity_association_vehicle_is_omitted() {
        let (vehicles, unassigned) = assign_seats(0, &ids(&["d1"]), &ids(&["p1"]));
        assert_eq!(vehicles.len(), 1);
        assert_eq!(vehicles[0].vehicle, "d1");
        assert!(unassigned.is_empty());
    }
}
