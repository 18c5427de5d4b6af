use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::activities_repo::{self, ReviewDecision, ReviewQueueRow};
use crate::database::notifications_repo;
use crate::error::{Rejection, ServiceError, ServiceResult};
use crate::services::activities_service::split_tags;
use crate::services::schedule_service;

#[derive(Debug, Clone)]
pub struct ReviewItemView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub organizer_name: String,
    pub venue_name: String,
    pub type_name: String,
    pub start_label: String,
    pub end_label: String,
    pub created_label: String,
    pub max_participants: i64,
    pub tags: Vec<String>,
    pub review_status: String,
    pub review_comment: String,
    pub review_time_label: String,
}

pub async fn pending_queue(pool: &SqlitePool) -> ServiceResult<Vec<ReviewItemView>> {
    let rows = activities_repo::list_pending_review(pool).await?;
    Ok(rows.into_iter().map(item_view).collect())
}

pub async fn history(pool: &SqlitePool, reviewer_id: &str) -> ServiceResult<Vec<ReviewItemView>> {
    let rows = activities_repo::list_reviewed_by(pool, reviewer_id).await?;
    Ok(rows.into_iter().map(item_view).collect())
}

pub async fn load_item(pool: &SqlitePool, activity_id: &str) -> ServiceResult<ReviewItemView> {
    let rows = activities_repo::list_pending_review(pool).await?;
    rows.into_iter()
        .find(|r| r.id == activity_id)
        .map(item_view)
        .ok_or(ServiceError::NotFound)
}

/// Applies a one-shot review decision and notifies the organizer. An
/// approval activates the activity; anything else rejects it. Re-reviewing
/// a decided activity is turned away.
pub async fn decide(
    pool: &SqlitePool,
    reviewer_id: &str,
    activity_id: &str,
    decision: &str,
    comment: &str,
    now: DateTime<Utc>,
) -> ServiceResult<()> {
    let activity = activities_repo::find_by_id(pool, activity_id)
        .await?
        .ok_or(ServiceError::NotFound)?;
    if activity.review_status != "pending" {
        return Err(Rejection::ReviewDecided.into());
    }

    let approved = match decision {
        "approved" => true,
        "rejected" => false,
        _ => return Err(Rejection::BadDecision.into()),
    };
    let comment = comment.trim();

    let mut tx = pool.begin().await?;
    activities_repo::apply_review(
        &mut *tx,
        ReviewDecision {
            activity_id,
            review_status: if approved { "approved" } else { "rejected" },
            status: if approved { "active" } else { "rejected" },
            is_approved: approved,
            review_comment: (!comment.is_empty()).then_some(comment),
            review_time: now,
            reviewer_id,
        },
    )
    .await?;

    let body = notification_body(&activity.title, approved, comment);
    let id = Uuid::new_v4().to_string();
    notifications_repo::insert_notification(
        &mut *tx,
        &id,
        &activity.organizer_id,
        Some(activity_id),
        &body,
        now,
    )
    .await?;
    tx.commit().await?;
    Ok(())
}

fn notification_body(title: &str, approved: bool, comment: &str) -> String {
    let outcome = if approved { "approved" } else { "rejected" };
    if comment.is_empty() {
        format!("Your activity \"{title}\" was {outcome}.")
    } else {
        format!("Your activity \"{title}\" was {outcome}. Reviewer note: {comment}")
    }
}

fn item_view(row: ReviewQueueRow) -> ReviewItemView {
    ReviewItemView {
        description: row.description.unwrap_or_default(),
        venue_name: row.venue_name.unwrap_or_default(),
        type_name: row.type_name.unwrap_or_default(),
        start_label: schedule_service::display_datetime(row.start_time),
        end_label: schedule_service::display_datetime(row.end_time),
        created_label: schedule_service::display_datetime(row.created_at),
        tags: split_tags(row.tags.as_deref()),
        review_comment: row.review_comment.unwrap_or_default(),
        review_time_label: row
            .review_time
            .map(schedule_service::display_datetime)
            .unwrap_or_default(),
        id: row.id,
        title: row.title,
        organizer_name: row.organizer_name,
        max_participants: row.max_participants,
        review_status: row.review_status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approval_notification_names_the_activity() {
        let body = notification_body("Chess night", true, "");
        assert_eq!(body, "Your activity \"Chess night\" was approved.");
    }

    #[test]
    fn rejection_notification_carries_the_reviewer_note() {
        let body = notification_body("Chess night", false, "Venue too small");
        assert!(body.contains("rejected"));
        assert!(body.contains("Venue too small"));
    }
}
