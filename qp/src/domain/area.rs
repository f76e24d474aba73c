//! Area candidates and the itinerary split
//!
//! Areas are produced by an external discovery collaborator and consumed
//! read-only. The split is the ordered list of stops covering the trip.

use serde::{Deserialize, Serialize};

/// A candidate region/neighborhood for the trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaCandidate {
    pub id: String,
    pub name: String,

    /// How well the area matches the requested activities (0.0..=1.0)
    pub activity_fit: f64,

    /// How well the area matches the requested vibe (0.0..=1.0)
    pub vibe_fit: f64,

    /// How well the area matches the lodging budget (0.0..=1.0)
    pub budget_fit: f64,

    /// Evidence snippets supporting the fit scores
    #[serde(default)]
    pub evidence: Vec<String>,

    /// Suggested night count for this area
    #[serde(default)]
    pub suggested_nights: Option<u32>,
}

impl AreaCandidate {
    /// Combined fit score used to rank areas
    pub fn combined_fit(&self) -> f64 {
        (self.activity_fit + self.vibe_fit + self.budget_fit) / 3.0
    }
}

/// One entry in a user-selected split
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitStop {
    pub area_id: String,
    pub nights: u32,
}

/// An ordered list of `{area, nights}` stops chosen by the user or
/// auto-generated.
///
/// Invariant: `sum(nights) == trip_nights` and every `nights >= 1`. Editing
/// surfaces enforce this at the edit boundary; the builder only checks it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ItinerarySplit {
    pub stops: Vec<SplitStop>,
}

impl ItinerarySplit {
    pub fn new(stops: Vec<SplitStop>) -> Self {
        Self { stops }
    }

    pub fn total_nights(&self) -> u32 {
        self.stops.iter().map(|s| s.nights).sum()
    }

    /// Check the split invariant against a trip length
    pub fn validate(&self, trip_nights: u32) -> Result<(), String> {
        if self.stops.is_empty() {
            return Err("split has no stops".to_string());
        }
        if let Some(stop) = self.stops.iter().find(|s| s.nights == 0) {
            return Err(format!("stop {} has zero nights", stop.area_id));
        }
        let total = self.total_nights();
        if total != trip_nights {
            return Err(format!("split covers {} nights, trip is {} nights", total, trip_nights));
        }
        Ok(())
    }
}
