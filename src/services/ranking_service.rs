use crate::database::activities_repo::UpcomingActivityRow;

const LIKE_WEIGHT: f64 = 2.0;
const COMMENT_WEIGHT: f64 = 1.5;
const PARTICIPATION_WEIGHT: f64 = 10.0;

/// Size of the site-wide hot panel, and of the cold-start recommendation.
pub const HOT_PANEL_SIZE: usize = 8;

pub fn participation_ratio(current: i64, max: i64) -> f64 {
    if max <= 0 {
        0.0
    } else {
        current as f64 / max as f64
    }
}

pub fn hot_score(likes: i64, comments: i64, ratio: f64) -> f64 {
    likes as f64 * LIKE_WEIGHT + comments as f64 * COMMENT_WEIGHT + ratio * PARTICIPATION_WEIGHT
}

#[derive(Debug, Clone)]
pub struct ScoredActivity {
    pub activity: UpcomingActivityRow,
    pub likes: i64,
    pub comments: i64,
    pub ratio: f64,
    pub score: f64,
}

/// Scores and ranks hot-panel candidates. The sort is stable, so equal
/// scores keep the order the candidates arrived in.
pub fn rank_hot(candidates: Vec<UpcomingActivityRow>, limit: usize) -> Vec<ScoredActivity> {
    let mut scored: Vec<ScoredActivity> = candidates
        .into_iter()
        .map(|a| {
            let ratio = participation_ratio(a.current_participants, a.max_participants);
            let score = hot_score(a.likes_count, a.comment_count, ratio);
            ScoredActivity {
                likes: a.likes_count,
                comments: a.comment_count,
                ratio,
                score,
                activity: a,
            }
        })
        .collect();
    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    scored.truncate(limit);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn candidate(
        id: &str,
        likes: i64,
        comments: i64,
        current: i64,
        max: i64,
    ) -> UpcomingActivityRow {
        UpcomingActivityRow {
            id: id.to_string(),
            title: id.to_string(),
            description: None,
            start_time: Utc::now(),
            end_time: Utc::now(),
            venue_name: None,
            type_name: None,
            activity_type_id: None,
            tags: None,
            poster_url: None,
            likes_count: likes,
            current_participants: current,
            max_participants: max,
            organizer_name: "org".to_string(),
            is_joined: 0,
            is_liked: 0,
            comment_count: comments,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn score_matches_weighted_sum() {
        // 10 likes, 3 comments, 40/100 full: 20 + 4.5 + 4 = 28.5
        let ratio = participation_ratio(40, 100);
        assert_eq!(hot_score(10, 3, ratio), 28.5);
    }

    #[test]
    fn ratio_is_zero_for_non_positive_capacity() {
        assert_eq!(participation_ratio(5, 0), 0.0);
        assert_eq!(participation_ratio(5, -1), 0.0);
    }

    #[test]
    fn ratio_stays_in_unit_range() {
        assert_eq!(participation_ratio(0, 100), 0.0);
        assert_eq!(participation_ratio(100, 100), 1.0);
        assert!(participation_ratio(37, 100) > 0.0);
        assert!(participation_ratio(37, 100) < 1.0);
    }

    #[test]
    fn score_is_monotonic_in_each_input() {
        let base = hot_score(10, 3, 0.4);
        assert!(hot_score(11, 3, 0.4) > base);
        assert!(hot_score(10, 4, 0.4) > base);
        assert!(hot_score(10, 3, 0.5) > base);
    }

    #[test]
    fn ranking_orders_by_score_descending() {
        let ranked = rank_hot(
            vec![
                candidate("low", 1, 0, 0, 10),
                candidate("high", 50, 10, 10, 10),
                candidate("mid", 10, 3, 40, 100),
            ],
            HOT_PANEL_SIZE,
        );
        let ids: Vec<&str> = ranked.iter().map(|s| s.activity.id.as_str()).collect();
        assert_eq!(ids, vec!["high", "mid", "low"]);
    }

    #[test]
    fn ranking_truncates_to_limit() {
        let candidates = (0..12).map(|i| candidate(&format!("a{i}"), i, 0, 0, 10)).collect();
        assert_eq!(rank_hot(candidates, HOT_PANEL_SIZE).len(), HOT_PANEL_SIZE);
    }

    #[test]
    fn ties_keep_arrival_order() {
        let ranked = rank_hot(
            vec![
                candidate("first", 2, 0, 0, 10),
                candidate("second", 2, 0, 0, 10),
            ],
            2,
        );
        assert_eq!(ranked[0].activity.id, "first");
        assert_eq!(ranked[1].activity.id, "second");
    }

    #[test]
    fn full_activity_without_engagement_scores_ten() {
        let ranked = rank_hot(vec![candidate("full", 0, 0, 25, 25)], 1);
        assert_eq!(ranked[0].score, 10.0);
        assert_eq!(ranked[0].ratio, 1.0);
    }
}
