pub mod activities;
pub mod membership_requests;
pub mod recurring_activities;
pub mod users;
