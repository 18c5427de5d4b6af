use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::{activities_repo, comments_repo, likes_repo};
use crate::error::{Rejection, ServiceError, ServiceResult};

#[derive(Debug, Clone, Copy)]
pub struct LikeOutcome {
    pub likes: i64,
    pub liked: bool,
}

/// Toggles the viewer's like: a second like takes the first one back.
/// Row and counter move together in one transaction.
pub async fn toggle_like(
    pool: &SqlitePool,
    user_id: &str,
    activity_id: &str,
    now: DateTime<Utc>,
) -> ServiceResult<LikeOutcome> {
    let mut tx = pool.begin().await?;

    activities_repo::find_by_id(&mut *tx, activity_id)
        .await?
        .ok_or(ServiceError::NotFound)?;

    let removed = likes_repo::delete_like(&mut *tx, user_id, activity_id).await?;
    let liked = if removed > 0 {
        activities_repo::adjust_likes(&mut *tx, activity_id, -1).await?;
        false
    } else {
        let id = Uuid::new_v4().to_string();
        likes_repo::insert_like(&mut *tx, &id, user_id, activity_id, now).await?;
        activities_repo::adjust_likes(&mut *tx, activity_id, 1).await?;
        true
    };
    let likes = activities_repo::current_likes(&mut *tx, activity_id).await?;

    tx.commit().await?;
    Ok(LikeOutcome { likes, liked })
}

pub async fn add_comment(
    pool: &SqlitePool,
    user_id: &str,
    activity_id: &str,
    content: &str,
    now: DateTime<Utc>,
) -> ServiceResult<()> {
    let content = content.trim();
    if content.is_empty() {
        return Err(Rejection::EmptyComment.into());
    }
    activities_repo::find_by_id(pool, activity_id)
        .await?
        .ok_or(ServiceError::NotFound)?;

    let id = Uuid::new_v4().to_string();
    comments_repo::insert_comment(pool, &id, content, user_id, activity_id, now).await?;
    Ok(())
}
