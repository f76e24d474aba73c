//! Activity ranking
//!
//! Combines a user-type-preference bonus, log-dampened mention count,
//! verification confidence, and relevance into one ordering key. The sort
//! is stable, so ties keep input order.

use crate::domain::{ActivityKind, VerifiedActivity};

/// Weight of matching a preferred activity kind
const TYPE_BONUS: f64 = 0.25;

/// Compute the ordering key for one activity
fn ranking_score(activity: &VerifiedActivity, preferred: &[ActivityKind]) -> f64 {
    let type_bonus = if preferred.contains(&activity.kind) { TYPE_BONUS } else { 0.0 };
    let mention_score = 0.05 * (1.0 + activity.reddit_mentions as f64).ln();
    type_bonus + mention_score + 0.4 * activity.confidence_score + 0.25 * activity.relevance_score
}

/// Rank activities in place, best first
pub fn rank_activities(activities: &mut [VerifiedActivity], preferred: &[ActivityKind]) {
    // sort_by is stable: equal keys preserve input order
    activities.sort_by(|a, b| {
        let sa = ranking_score(a, preferred);
        let sb = ranking_score(b, preferred);
        sb.partial_cmp(&sa).unwrap_or(std::cmp::Ordering::Equal)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Verification;

    fn activity(name: &str, kind: ActivityKind, mentions: u32, confidence: f64) -> VerifiedActivity {
        VerifiedActivity {
            id: format!("act-{}", name.to_lowercase().replace(' ', "-")),
            name: name.to_string(),
            kind,
            location: None,
            verification: Verification::default(),
            effort_points: 3,
            duration_hours: 2.0,
            reddit_mentions: mentions,
            reddit_evidence: vec![],
            seasonal_availability: None,
            relevance_score: 0.5,
            confidence_score: confidence,
        }
    }

    #[test]
    fn test_preferred_kind_ranks_higher() {
        let mut activities = vec![
            activity("Museum Walk", ActivityKind::Culture, 5, 0.5),
            activity("Cerritos Surf", ActivityKind::Surf, 5, 0.5),
        ];
        rank_activities(&mut activities, &[ActivityKind::Surf]);
        assert_eq!(activities[0].name, "Cerritos Surf");
    }

    #[test]
    fn test_mentions_are_log_dampened() {
        let few = ranking_score(&activity("A", ActivityKind::Other, 5, 0.5), &[]);
        let many = ranking_score(&activity("B", ActivityKind::Other, 500, 0.5), &[]);
        // 100x the mentions gives well under 100x the score contribution
        assert!(many > few);
        assert!(many - few < 0.5);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let mut activities = vec![
            activity("First", ActivityKind::Other, 10, 0.5),
            activity("Second", ActivityKind::Other, 10, 0.5),
            activity("Third", ActivityKind::Other, 10, 0.5),
        ];
        rank_activities(&mut activities, &[]);
        let names: Vec<&str> = activities.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_confidence_outweighs_mentions() {
        let mut activities = vec![
            activity("Popular But Unsure", ActivityKind::Other, 200, 0.2),
            activity("Verified Place", ActivityKind::Other, 10, 0.9),
        ];
        rank_activities(&mut activities, &[]);
        assert_eq!(activities[0].name, "Verified Place");
    }
}
