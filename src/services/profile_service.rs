use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::database::{activities_repo, activity_types_repo, notifications_repo, venues_repo};
use crate::error::ServiceResult;
use crate::models::{ActivityTypeRow, UserRow, VenueRow};
use crate::services::activities_service::{
    self, ActivityCardView, AppliedFilters, IndexQuery,
};
use crate::services::schedule_service;

const NOTIFICATION_LIMIT: i64 = 20;

#[derive(Debug, Clone)]
pub struct NotificationView {
    pub body: String,
    pub time_label: String,
    pub unread: bool,
}

pub struct ProfileView {
    pub username: String,
    pub email: String,
    pub department: String,
    pub interests: String,
    pub role_label: String,
    pub created_label: String,
    pub organized: Vec<ActivityCardView>,
    pub participated: Vec<ActivityCardView>,
    pub notifications: Vec<NotificationView>,
}

/// The profile page: account info, both activity lists unfiltered, and
/// recent notifications. Viewing the page marks the notifications read.
pub async fn load_profile(
    pool: &SqlitePool,
    user: &UserRow,
    now: DateTime<Utc>,
) -> ServiceResult<ProfileView> {
    let query = IndexQuery::default();
    let (_, filters, _) = activities_service::resolve_filters(&query, now);

    let organized = activities_repo::list_organized_cards(pool, &user.id, &filters)
        .await?
        .into_iter()
        .map(|row| activities_service::card_from_row(row, now))
        .collect();
    let participated = activities_repo::list_participated_cards(pool, &user.id, &filters)
        .await?
        .into_iter()
        .map(|row| activities_service::card_from_row(row, now))
        .collect();

    let notification_rows =
        notifications_repo::list_for_user(pool, &user.id, NOTIFICATION_LIMIT).await?;
    let notifications = notification_rows
        .into_iter()
        .map(|n| NotificationView {
            body: n.body,
            time_label: schedule_service::display_datetime(n.created_at),
            unread: n.read_at.is_none(),
        })
        .collect();
    notifications_repo::mark_all_read(pool, &user.id, now).await?;

    Ok(ProfileView {
        username: user.username.clone(),
        email: user.email.clone(),
        department: user.department.clone().unwrap_or_default(),
        interests: user.interests.clone().unwrap_or_default(),
        role_label: user.role.as_str().to_string(),
        created_label: schedule_service::display_datetime(user.created_at),
        organized,
        participated,
        notifications,
    })
}

pub struct MyActivitiesPage {
    pub organized: Vec<ActivityCardView>,
    pub participated: Vec<ActivityCardView>,
    pub filters: AppliedFilters,
    pub venues: Vec<VenueRow>,
    pub types: Vec<ActivityTypeRow>,
}

/// The "my activities" page: everything the user organized (any
/// moderation state) plus joined activities that are still running or
/// ended within the last week, with the shared filter set applied.
pub async fn load_my_activities(
    pool: &SqlitePool,
    user_id: &str,
    query: &IndexQuery,
    now: DateTime<Utc>,
) -> ServiceResult<MyActivitiesPage> {
    let (applied, filters, _) = activities_service::resolve_filters(query, now);

    let organized = activities_repo::list_organized_cards(pool, user_id, &filters)
        .await?
        .into_iter()
        .map(|row| activities_service::card_from_row(row, now))
        .collect();
    let participated = activities_repo::list_participated_cards(pool, user_id, &filters)
        .await?
        .into_iter()
        .map(|row| activities_service::card_from_row(row, now))
        .collect();

    let venues = venues_repo::list_all(pool).await?;
    let types = activity_types_repo::list_all(pool).await?;

    Ok(MyActivitiesPage {
        organized,
        participated,
        filters: applied,
        venues,
        types,
    })
}
