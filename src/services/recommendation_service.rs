use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::database::activities_repo::{self, UpcomingActivityRow};
use crate::error::ServiceResult;
use crate::models::ActivityRow;
use crate::services::ranking_service;

/// At most this many personalized picks; the hot fallback uses the panel
/// size instead.
const RECOMMENDATION_BUDGET: usize = 5;

/// Picks activities for the signed-in user from their participation
/// history: same-type first, then tag matches, newest-created first.
/// Anonymous viewers and users with no history get the hot ranking over
/// the same future/approved candidate set.
pub async fn recommend(
    pool: &SqlitePool,
    viewer_id: Option<&str>,
    now: DateTime<Utc>,
) -> ServiceResult<Vec<UpcomingActivityRow>> {
    let Some(user_id) = viewer_id else {
        return cold_start(pool, now, "").await;
    };

    let history = activities_repo::list_joined_activities(pool, user_id).await?;
    if history.is_empty() {
        return cold_start(pool, now, user_id).await;
    }

    let type_ids = harvest_type_ids(&history);
    let tags = harvest_tags(&history);
    // Candidates arrive newest-created first and never include anything
    // the user already joined.
    let candidates = activities_repo::list_upcoming_not_joined(pool, now, user_id).await?;
    Ok(pick(candidates, &type_ids, &tags, RECOMMENDATION_BUDGET))
}

async fn cold_start(
    pool: &SqlitePool,
    now: DateTime<Utc>,
    viewer_id: &str,
) -> ServiceResult<Vec<UpcomingActivityRow>> {
    let candidates = activities_repo::list_upcoming_approved(pool, now, viewer_id).await?;
    Ok(ranking_service::rank_hot(candidates, ranking_service::HOT_PANEL_SIZE)
        .into_iter()
        .map(|s| s.activity)
        .collect())
}

fn harvest_type_ids(history: &[ActivityRow]) -> Vec<String> {
    let mut ids = Vec::new();
    for activity in history {
        if let Some(type_id) = &activity.activity_type_id {
            if !ids.contains(type_id) {
                ids.push(type_id.clone());
            }
        }
    }
    ids
}

fn harvest_tags(history: &[ActivityRow]) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    for activity in history {
        let Some(tags) = &activity.tags else { continue };
        for raw in tags.split(',') {
            let token = raw.trim();
            if token.is_empty() {
                continue;
            }
            if !tokens.iter().any(|t| t.eq_ignore_ascii_case(token)) {
                tokens.push(token.to_string());
            }
        }
    }
    tokens
}

fn tag_matches(candidate_tags: Option<&str>, tokens: &[String]) -> bool {
    let Some(tags) = candidate_tags else {
        return false;
    };
    let haystack = tags.to_lowercase();
    tokens.iter().any(|t| haystack.contains(&t.to_lowercase()))
}

fn pick(
    candidates: Vec<UpcomingActivityRow>,
    type_ids: &[String],
    tags: &[String],
    budget: usize,
) -> Vec<UpcomingActivityRow> {
    let mut picked = Vec::new();
    let mut other_type = Vec::new();

    for candidate in candidates {
        let same_type = candidate
            .activity_type_id
            .as_ref()
            .is_some_and(|id| type_ids.contains(id));
        if same_type {
            if picked.len() < budget {
                picked.push(candidate);
            }
        } else {
            other_type.push(candidate);
        }
    }

    if picked.len() < budget && !tags.is_empty() {
        for candidate in other_type {
            if picked.len() == budget {
                break;
            }
            if tag_matches(candidate.tags.as_deref(), tags) {
                picked.push(candidate);
            }
        }
    }

    picked
}
