pub mod activities_service;
pub mod activity_detail_service;
pub mod activity_editor_service;
pub mod admin_service;
pub mod auth_service;
pub mod engagement_service;
pub mod export_service;
pub mod participation_service;
pub mod profile_service;
pub mod ranking_service;
pub mod recommendation_service;
pub mod review_service;
pub mod schedule_service;
