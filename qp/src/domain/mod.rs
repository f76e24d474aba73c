//! Domain types for trip planning
//!
//! The data model for the itinerary engine: traveler preferences, area and
//! lodging candidates, verified activities, and the generated itinerary.

mod activity;
mod area;
mod candidates;
mod id;
mod itinerary;
mod preferences;
mod reason;

pub use activity::{EvidenceSource, SeasonalWindow, VerifiedActivity, Verification};
pub use area::{AreaCandidate, ItinerarySplit, SplitStop};
pub use candidates::{HotelCandidate, RestaurantCandidate};
pub use id::generate_id;
pub use itinerary::{
    BlockKind, ConfidenceSummary, DayBlock, DiningPlan, QuickPlanDay, QuickPlanItinerary, Stop, TimeSlot,
};
pub use preferences::{
    ActivityIntent, ActivityKind, BudgetRange, ConfidenceLevel, DiningMode, Pace, PartyComposition, SkillLevel,
    TravelFlags, TripPreferences,
};
pub use reason::DissatisfactionReason;
