pub mod activity_service;
pub mod crypto;
pub mod instance_service;
pub mod membership_service;
pub mod occurrence;
pub mod recurring_service;
pub mod transport_service;
pub mod user_service;
