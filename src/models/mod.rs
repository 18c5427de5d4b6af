pub mod activities;
pub mod activity_types;
pub mod notifications;
pub mod users;
pub mod venues;

pub use activities::ActivityRow;
pub use activity_types::ActivityTypeRow;
pub use notifications::NotificationRow;
pub use users::{Role, UserRow};
pub use venues::VenueRow;
