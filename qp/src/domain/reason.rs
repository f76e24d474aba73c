//! Dissatisfaction reasons
//!
//! Closed set of tags describing why a generated itinerary did not satisfy
//! the traveler. Every tag maps to exactly one regeneration handler; the
//! dispatch match is exhaustive with no wildcard arm, so adding a variant
//! here fails to compile until a handler exists.

use serde::{Deserialize, Serialize};

/// Why the traveler rejected the itinerary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DissatisfactionReason {
    WrongAreas,
    WrongVibe,
    TooPacked,
    TooChill,
    SurfDaysWrong,
    DiningWrong,
    TooTouristy,
    MissingActivity,
    HotelWrong,
    BudgetExceeded,
    Other,
}

impl DissatisfactionReason {
    pub const ALL: [DissatisfactionReason; 11] = [
        Self::WrongAreas,
        Self::WrongVibe,
        Self::TooPacked,
        Self::TooChill,
        Self::SurfDaysWrong,
        Self::DiningWrong,
        Self::TooTouristy,
        Self::MissingActivity,
        Self::HotelWrong,
        Self::BudgetExceeded,
        Self::Other,
    ];
}

impl std::fmt::Display for DissatisfactionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::WrongAreas => "wrong_areas",
            Self::WrongVibe => "wrong_vibe",
            Self::TooPacked => "too_packed",
            Self::TooChill => "too_chill",
            Self::SurfDaysWrong => "surf_days_wrong",
            Self::DiningWrong => "dining_wrong",
            Self::TooTouristy => "too_touristy",
            Self::MissingActivity => "missing_activity",
            Self::HotelWrong => "hotel_wrong",
            Self::BudgetExceeded => "budget_exceeded",
            Self::Other => "other",
        };
        write!(f, "{}", s)
    }
}
