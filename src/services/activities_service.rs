use chrono::{DateTime, Days, Utc};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::database::activities_repo::{
    self, ActivityCardRow, ActivityFilters, UpcomingActivityRow,
};
use crate::database::{activity_types_repo, venues_repo};
use crate::error::ServiceResult;
use crate::models::{ActivityTypeRow, VenueRow};
use crate::services::ranking_service::{self, ScoredActivity};
use crate::services::recommendation_service;
use crate::services::schedule_service;

pub const PER_PAGE: i64 = 9;

#[derive(Debug, Deserialize, Default)]
pub struct IndexQuery {
    pub page: Option<i64>,
    pub search: Option<String>,
    pub type_id: Option<String>,
    pub venue_id: Option<String>,
    pub status: Option<String>,
    pub hot: Option<String>,
    pub recommend: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub notice: Option<String>,
}

/// One listing card, fully formatted for the template.
#[derive(Debug, Clone)]
pub struct ActivityCardView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub start_label: String,
    pub end_label: String,
    pub venue_name: String,
    pub type_name: String,
    pub organizer_name: String,
    pub tags: Vec<String>,
    pub temporal_label: String,
    pub status: String,
    pub review_status: String,
    pub max_participants: i64,
    pub current_participants: i64,
    pub likes_count: i64,
    pub comment_count: i64,
    pub is_joined: bool,
    pub is_liked: bool,
    pub poster_url: String,
}

#[derive(Debug, Clone)]
pub struct HotPanelEntry {
    pub id: String,
    pub title: String,
    pub start_label: String,
    pub venue_name: String,
    pub score_label: String,
    pub likes: i64,
    pub comments: i64,
    pub ratio_pct: i64,
}

/// Echo of the applied filters so the form can re-render its state.
#[derive(Debug, Clone, Default)]
pub struct AppliedFilters {
    pub search: String,
    pub type_id: String,
    pub venue_id: String,
    pub status: String,
    pub start_date: String,
    pub end_date: String,
    pub hot: bool,
}

#[derive(Debug, Clone)]
pub struct Pagination {
    pub page: i64,
    pub total_pages: i64,
    pub has_prev: bool,
    pub has_next: bool,
    pub prev: i64,
    pub next: i64,
}

pub struct IndexPageData {
    pub cards: Vec<ActivityCardView>,
    pub hot_panel: Vec<HotPanelEntry>,
    pub filters: AppliedFilters,
    pub venues: Vec<VenueRow>,
    pub types: Vec<ActivityTypeRow>,
    pub pagination: Pagination,
    pub recommend_mode: bool,
}

pub async fn build_index_page(
    pool: &SqlitePool,
    viewer_id: Option<&str>,
    query: &IndexQuery,
    now: DateTime<Utc>,
) -> ServiceResult<IndexPageData> {
    let viewer = viewer_id.unwrap_or("");
    let (applied, repo_filters, hot_order) = resolve_filters(query, now);
    let recommend_mode = query.recommend.as_deref() == Some("1");

    let (cards, pagination) = if recommend_mode {
        let picks = recommendation_service::recommend(pool, viewer_id, now).await?;
        let cards = picks
            .into_iter()
            .map(|row| card_from_upcoming(row, now))
            .collect();
        (cards, paginate(0, 1))
    } else {
        let total = activities_repo::count_public(pool, &repo_filters).await?;
        let pagination = paginate(total, query.page.unwrap_or(1));
        let offset = (pagination.page - 1) * PER_PAGE;
        let rows = activities_repo::list_public_cards(
            pool,
            viewer,
            &repo_filters,
            hot_order,
            PER_PAGE,
            offset,
        )
        .await?;
        let cards = rows.into_iter().map(|row| card_from_row(row, now)).collect();
        (cards, pagination)
    };

    let hot_candidates = activities_repo::list_upcoming_approved(pool, now, viewer).await?;
    let hot_panel = ranking_service::rank_hot(hot_candidates, ranking_service::HOT_PANEL_SIZE)
        .into_iter()
        .map(hot_panel_entry)
        .collect();

    let venues = venues_repo::list_all(pool).await?;
    let types = activity_types_repo::list_all(pool).await?;

    Ok(IndexPageData {
        cards,
        hot_panel,
        filters: applied,
        venues,
        types,
        pagination,
        recommend_mode,
    })
}

/// Normalizes the raw query into repo filters. A title search resets the
/// type and temporal filters; hot ordering only applies on an otherwise
/// unfiltered listing.
pub(crate) fn resolve_filters(
    query: &IndexQuery,
    now: DateTime<Utc>,
) -> (AppliedFilters, ActivityFilters, bool) {
    let search = query.search.as_deref().unwrap_or("").trim().to_string();
    let mut type_id = query.type_id.clone().unwrap_or_default();
    let venue_id = query.venue_id.clone().unwrap_or_default();
    let mut status = query.status.clone().unwrap_or_default();
    if !search.is_empty() {
        type_id.clear();
        status.clear();
    }
    if !matches!(status.as_str(), "upcoming" | "ongoing" | "ended") {
        status.clear();
    }

    let hot = query.hot.as_deref() == Some("1");
    let hot_order = hot && search.is_empty() && type_id.is_empty() && status.is_empty();

    let start_date = query.start_date.clone().unwrap_or_default();
    let end_date = query.end_date.clone().unwrap_or_default();
    let date_from = schedule_service::parse_form_date(&start_date)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default();
    // Exclusive upper bound one day past the chosen end date, so the whole
    // day is included.
    let date_to = schedule_service::parse_form_date(&end_date)
        .and_then(|d| d.checked_add_days(Days::new(1)))
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default();

    let applied = AppliedFilters {
        search: search.clone(),
        type_id: type_id.clone(),
        venue_id: venue_id.clone(),
        status: status.clone(),
        start_date,
        end_date,
        hot,
    };
    let repo_filters = ActivityFilters {
        search_like: format!("%{}%", search.to_lowercase()),
        search,
        type_id,
        venue_id,
        date_from,
        date_to,
        phase: status,
        now: schedule_service::sql_datetime(now),
    };
    (applied, repo_filters, hot_order)
}

fn paginate(total: i64, requested_page: i64) -> Pagination {
    let total_pages = ((total + PER_PAGE - 1) / PER_PAGE).max(1);
    let page = requested_page.clamp(1, total_pages);
    Pagination {
        page,
        total_pages,
        has_prev: page > 1,
        has_next: page < total_pages,
        prev: page - 1,
        next: page + 1,
    }
}

pub fn split_tags(tags: Option<&str>) -> Vec<String> {
    tags.unwrap_or("")
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn card_from_row(row: ActivityCardRow, now: DateTime<Utc>) -> ActivityCardView {
    let temporal = schedule_service::temporal_status(now, row.start_time, row.end_time);
    ActivityCardView {
        id: row.id,
        title: row.title,
        description: row.description.unwrap_or_default(),
        start_label: schedule_service::display_datetime(row.start_time),
        end_label: schedule_service::display_datetime(row.end_time),
        venue_name: row.venue_name.unwrap_or_default(),
        type_name: row.type_name.unwrap_or_default(),
        organizer_name: row.organizer_name,
        tags: split_tags(row.tags.as_deref()),
        temporal_label: temporal.label().to_string(),
        status: row.status,
        review_status: row.review_status,
        max_participants: row.max_participants,
        current_participants: row.current_participants,
        likes_count: row.likes_count,
        comment_count: row.comment_count,
        is_joined: row.is_joined != 0,
        is_liked: row.is_liked != 0,
        poster_url: row.poster_url.unwrap_or_default(),
    }
}

pub fn card_from_upcoming(row: UpcomingActivityRow, now: DateTime<Utc>) -> ActivityCardView {
    let temporal = schedule_service::temporal_status(now, row.start_time, row.end_time);
    ActivityCardView {
        id: row.id,
        title: row.title,
        description: row.description.unwrap_or_default(),
        start_label: schedule_service::display_datetime(row.start_time),
        end_label: schedule_service::display_datetime(row.end_time),
        venue_name: row.venue_name.unwrap_or_default(),
        type_name: row.type_name.unwrap_or_default(),
        organizer_name: row.organizer_name,
        tags: split_tags(row.tags.as_deref()),
        temporal_label: temporal.label().to_string(),
        status: "active".to_string(),
        review_status: "approved".to_string(),
        max_participants: row.max_participants,
        current_participants: row.current_participants,
        likes_count: row.likes_count,
        comment_count: row.comment_count,
        is_joined: row.is_joined != 0,
        is_liked: row.is_liked != 0,
        poster_url: row.poster_url.unwrap_or_default(),
    }
}

fn hot_panel_entry(scored: ScoredActivity) -> HotPanelEntry {
    HotPanelEntry {
        start_label: schedule_service::display_datetime(scored.activity.start_time),
        venue_name: scored.activity.venue_name.clone().unwrap_or_default(),
        score_label: format!("{:.1}", scored.score),
        likes: scored.likes,
        comments: scored.comments,
        ratio_pct: (scored.ratio * 100.0).round() as i64,
        id: scored.activity.id,
        title: scored.activity.title,
    }
}
