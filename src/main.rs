use axum::{
    handler::Handler,
    middleware,
    routing::{get, post},
    Router,
};
use dotenvy::dotenv;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::net::SocketAddr;
use std::str::FromStr;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use association_backend::config::Config;
use association_backend::web::middleware::auth as auth_middleware;
use association_backend::web::routes::{
    activities, membership_requests, recurring_activities, users,
};

#[tokio::main]
async fn main() {
    dotenv().ok();

    tracing_subscriber::fmt::init();

    let config = Config::load();

    let options = SqliteConnectOptions::from_str(&config.database_url)
        .expect("invalid DATABASE_URL")
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .connect_with(options)
        .await
        .expect("cannot connect to database");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("database migration failed");

    // Admin-only management surface.
    let admin_routes = Router::new()
        .route(
            "/api/recurring-activities",
            post(recurring_activities::create_rule_handler)
                .get(recurring_activities::list_rules_handler),
        )
        .route(
            "/api/recurring-activities/:recurring_activity_id",
            get(recurring_activities::get_rule_handler)
                .patch(recurring_activities::update_rule_handler)
                .delete(recurring_activities::delete_rule_handler),
        )
        .route(
            "/api/recurring-activities/:recurring_activity_id/instances",
            get(recurring_activities::list_instances_handler),
        )
        .route(
            "/api/recurring-activities/:recurring_activity_id/regenerate",
            post(recurring_activities::regenerate_handler),
        )
        .route(
            "/api/membership-requests/:request_id/approve",
            post(membership_requests::approve_request_handler),
        )
        .route(
            "/api/membership-requests/:request_id/reject",
            post(membership_requests::reject_request_handler),
        )
        .route(
            "/api/users",
            get(users::list_users_handler).post(users::create_user_handler),
        )
        .layer(middleware::from_fn(auth_middleware::require_admin));

    // Day-to-day surface for logged-in members and accompagnateurs.
    let member_routes = Router::new()
        .route(
            "/api/activities",
            post(activities::create_activity_handler).get(activities::list_activities_handler),
        )
        .route(
            "/api/activities/:activity_id",
            get(activities::get_activity_handler)
                .patch(activities::update_activity_handler)
                .delete(activities::delete_activity_handler),
        )
        .route(
            "/api/activities/:activity_id/participants",
            post(activities::add_participant_handler),
        )
        .route(
            "/api/activities/:activity_id/participants/:user_id",
            axum::routing::delete(activities::remove_participant_handler),
        )
        .route(
            "/api/activities/:activity_id/accompagnateurs",
            post(activities::add_accompagnateur_handler),
        )
        .route(
            "/api/activities/:activity_id/accompagnateurs/:user_id",
            axum::routing::delete(activities::remove_accompagnateur_handler),
        )
        .route(
            "/api/activities/:activity_id/members",
            get(activities::list_members_handler),
        )
        .route(
            "/api/activities/:activity_id/transport-plan",
            get(activities::transport_plan_handler),
        )
        .route(
            "/api/activities/:activity_id/start",
            post(activities::start_activity_handler),
        )
        .route(
            "/api/activities/:activity_id/complete",
            post(activities::complete_activity_handler),
        )
        .route(
            "/api/activities/:activity_id/presence",
            post(activities::presence_handler),
        )
        .layer(middleware::from_fn(auth_middleware::require_auth));

    let app = Router::new()
        // Public: prospective members submit a request without an account.
        .route(
            "/api/membership-requests",
            post(membership_requests::submit_request_handler).get(
                membership_requests::list_requests_handler
                    .layer(middleware::from_fn(auth_middleware::require_admin)),
            ),
        )
        .merge(admin_routes)
        .merge(member_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::new())
        .with_state(pool);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("invalid HOST/PORT");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("cannot bind address");
    tracing::info!("listening on http://{}", addr);

    axum::serve(listener, app).await.unwrap();
}
