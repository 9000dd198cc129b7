pub mod activity_members_repo;
pub mod activity_repo;
pub mod adherent_repo;
pub mod membership_repo;
pub mod membership_request_repo;
pub mod recurring_activity_repo;
pub mod user_repo;
