//! Verified activities and their evidence
//!
//! A `VerifiedActivity` is created once per discovery run by the
//! verification pipeline and is immutable afterwards except for re-ranking.

use serde::{Deserialize, Serialize};

use super::preferences::ActivityKind;

/// One social-evidence source backing an activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceSource {
    /// Link to the discussion
    pub url: String,
    /// Source community/forum name
    pub source: String,
    /// Upvote/score count on the post
    pub score: u32,
}

/// Trust signals an activity has earned
///
/// Zero or more of: a mapping-service place id, an operator URL, a list of
/// social-evidence sources. Any one satisfied tier admits the candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Verification {
    pub place_id: Option<String>,
    pub operator_url: Option<String>,
    pub evidence_sources: Vec<EvidenceSource>,
}

impl Verification {
    pub fn has_place_match(&self) -> bool {
        self.place_id.is_some()
    }

    pub fn has_operator(&self) -> bool {
        self.operator_url.is_some()
    }
}

/// A month-window in which an activity is available
///
/// Windows may wrap the year end (e.g. whale season Nov-Mar).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonalWindow {
    /// 1..=12
    pub start_month: u32,
    /// 1..=12, inclusive
    pub end_month: u32,
}

impl SeasonalWindow {
    /// Whether a given month falls inside the window
    pub fn contains_month(&self, month: u32) -> bool {
        if self.start_month <= self.end_month {
            month >= self.start_month && month <= self.end_month
        } else {
            // Year-wrapping window, e.g. Nov (11) .. Mar (3)
            month >= self.start_month || month <= self.end_month
        }
    }

    /// Whether any month in `[from, to]` (a trip's month span, possibly
    /// wrapping the year itself) overlaps the window
    pub fn overlaps_months(&self, from: u32, to: u32) -> bool {
        let span: Vec<u32> = if from <= to {
            (from..=to).collect()
        } else {
            (from..=12).chain(1..=to).collect()
        };
        span.into_iter().any(|m| self.contains_month(m))
    }
}

/// An activity that passed the verification pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifiedActivity {
    pub id: String,
    pub name: String,
    pub kind: ActivityKind,

    /// Area id the activity belongs to, when known
    #[serde(default)]
    pub location: Option<String>,

    pub verification: Verification,

    /// Effort points this activity consumes from a day's budget
    pub effort_points: u32,

    /// Typical duration in hours
    pub duration_hours: f32,

    /// Distinct social-discussion mentions observed
    pub reddit_mentions: u32,

    #[serde(default)]
    pub reddit_evidence: Vec<EvidenceSource>,

    #[serde(default)]
    pub seasonal_availability: Option<SeasonalWindow>,

    /// How relevant the activity is to the stated intents (0.0..=1.0)
    pub relevance_score: f64,

    /// Pipeline confidence in the activity being real and current (0.0..=1.0)
    pub confidence_score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_simple() {
        let w = SeasonalWindow {
            start_month: 5,
            end_month: 9,
        };
        assert!(w.contains_month(5));
        assert!(w.contains_month(7));
        assert!(w.contains_month(9));
        assert!(!w.contains_month(4));
        assert!(!w.contains_month(10));
    }

    #[test]
    fn test_window_year_wrap() {
        // Whale season: November through March
        let w = SeasonalWindow {
            start_month: 11,
            end_month: 3,
        };
        assert!(w.contains_month(11));
        assert!(w.contains_month(12));
        assert!(w.contains_month(1));
        assert!(w.contains_month(3));
        assert!(!w.contains_month(4));
        assert!(!w.contains_month(10));
    }

    #[test]
    fn test_overlap_trip_span() {
        let whales = SeasonalWindow {
            start_month: 11,
            end_month: 3,
        };
        // June trip does not overlap
        assert!(!whales.overlaps_months(6, 6));
        // Trip spanning Oct-Nov overlaps at November
        assert!(whales.overlaps_months(10, 11));
        // Trip itself wrapping Dec-Jan overlaps
        assert!(whales.overlaps_months(12, 1));
    }
}
