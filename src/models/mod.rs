pub mod activities;
pub mod activity_members;
pub mod adherents;
pub mod membership_requests;
pub mod memberships;
pub mod recurring_activities;
pub mod users;

pub use activities::ActivityRow;
pub use activity_members::{
    ActivityAccompagnateurRow, ActivityParticipantRow, RecurringAccompagnateurRow,
    RecurringParticipantRow,
};
pub use adherents::AdherentRow;
pub use membership_requests::MembershipRequestRow;
pub use memberships::{FormuleRow, MembershipRow};
pub use recurring_activities::RecurringActivityRow;
pub use users::UserRow;
