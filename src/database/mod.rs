pub mod activities_repo;
pub mod activity_types_repo;
pub mod comments_repo;
pub mod likes_repo;
pub mod notifications_repo;
pub mod participations_repo;
pub mod sessions_repo;
pub mod users_repo;
pub mod venues_repo;
