//! Generated itinerary types
//!
//! The output of the builder: an ordered stop list partitioning the trip's
//! day range, plus a schedule of day blocks with recomputed effort points.

use serde::{Deserialize, Serialize};

use super::candidates::HotelCandidate;
use super::preferences::{ConfidenceLevel, DiningMode};

/// A contiguous block of nights assigned to one area
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub id: String,
    pub area_id: String,
    pub area_name: String,
    pub nights: u32,

    /// First day at this stop (1-indexed day numbers)
    pub arrival_day: u32,

    /// Day the traveler departs this stop; equals the next stop's arrival
    /// day. The last stop's departure day is the end of the trip.
    pub departure_day: u32,

    pub is_arrival_city: bool,
    pub is_departure_city: bool,

    /// Lodging attached to this stop, when a candidate matched
    #[serde(default)]
    pub hotel: Option<HotelCandidate>,
}

impl Stop {
    /// Whether this stop owns the given day number
    ///
    /// A stop owns `[arrival_day, departure_day)`; the final stop also owns
    /// its departure day (trip end, no onward transfer).
    pub fn owns_day(&self, day: u32, is_last_stop: bool) -> bool {
        if is_last_stop {
            day >= self.arrival_day && day <= self.departure_day
        } else {
            day >= self.arrival_day && day < self.departure_day
        }
    }
}

/// Kind of a scheduled block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Activity,
    Meal,
    Free,
    Transfer,
}

/// Time-of-day slot a block occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeSlot {
    Morning,
    Afternoon,
    Evening,
}

impl TimeSlot {
    pub const ALL: [TimeSlot; 3] = [TimeSlot::Morning, TimeSlot::Afternoon, TimeSlot::Evening];

    /// Nominal start time for display
    pub fn start_time(&self) -> &'static str {
        match self {
            Self::Morning => "09:00",
            Self::Afternoon => "13:00",
            Self::Evening => "18:00",
        }
    }

    /// Nominal end time for display
    pub fn end_time(&self) -> &'static str {
        match self {
            Self::Morning => "12:00",
            Self::Afternoon => "17:00",
            Self::Evening => "21:00",
        }
    }
}

/// One scheduled slot in a day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayBlock {
    pub kind: BlockKind,
    pub title: String,
    pub start_time: String,
    pub end_time: String,
    pub duration_hours: f32,
    pub effort_cost: u32,
}

impl DayBlock {
    pub fn new(kind: BlockKind, title: impl Into<String>, slot: TimeSlot, duration_hours: f32, effort_cost: u32) -> Self {
        Self {
            kind,
            title: title.into(),
            start_time: slot.start_time().to_string(),
            end_time: slot.end_time().to_string(),
            duration_hours,
            effort_cost,
        }
    }
}

/// One day of the generated schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickPlanDay {
    /// 1-indexed day number within the trip
    pub day_number: u32,

    #[serde(default)]
    pub date: Option<chrono::NaiveDate>,

    /// Id of the owning stop
    pub stop_id: String,

    pub morning: Option<DayBlock>,
    pub afternoon: Option<DayBlock>,
    pub evening: Option<DayBlock>,

    pub is_transit_day: bool,

    /// Always recomputed as the sum of present block costs
    pub effort_points: u32,

    #[serde(default)]
    pub notes: Vec<String>,
}

impl QuickPlanDay {
    /// Blocks present on this day, in slot order
    pub fn blocks(&self) -> impl Iterator<Item = &DayBlock> {
        [self.morning.as_ref(), self.afternoon.as_ref(), self.evening.as_ref()]
            .into_iter()
            .flatten()
    }

    /// Recompute effort points from the present blocks
    pub fn recompute_effort(&mut self) {
        self.effort_points = self.blocks().map(|b| b.effort_cost).sum();
    }

    pub fn slot(&self, slot: TimeSlot) -> Option<&DayBlock> {
        match slot {
            TimeSlot::Morning => self.morning.as_ref(),
            TimeSlot::Afternoon => self.afternoon.as_ref(),
            TimeSlot::Evening => self.evening.as_ref(),
        }
    }

    pub fn slot_mut(&mut self, slot: TimeSlot) -> &mut Option<DayBlock> {
        match slot {
            TimeSlot::Morning => &mut self.morning,
            TimeSlot::Afternoon => &mut self.afternoon,
            TimeSlot::Evening => &mut self.evening,
        }
    }
}

/// How dining is handled across the trip
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiningPlan {
    pub mode: DiningMode,
    /// Human-readable summary for presentation surfaces
    pub summary: String,
}

/// Per-field confidence snapshot carried on the itinerary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ConfidenceSummary {
    pub fields_ready: usize,
    pub fields_total: usize,
    pub overall: ConfidenceLevel,
}

/// The generated trip schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickPlanItinerary {
    pub id: String,

    /// Ordered stops partitioning `[1, total_nights]` contiguously
    pub stops: Vec<Stop>,

    pub days: Vec<QuickPlanDay>,

    pub dining_plan: DiningPlan,

    pub confidence_summary: ConfidenceSummary,

    pub quality_check_passed: bool,

    #[serde(default)]
    pub unmet_constraints: Vec<String>,
}

impl QuickPlanItinerary {
    pub fn total_nights(&self) -> u32 {
        self.stops.iter().map(|s| s.nights).sum()
    }

    /// Day numbers on which the traveler moves between stops
    pub fn transfer_days(&self) -> Vec<u32> {
        self.stops.iter().skip(1).map(|s| s.arrival_day).collect()
    }

    pub fn day_mut(&mut self, day_number: u32) -> Option<&mut QuickPlanDay> {
        self.days.iter_mut().find(|d| d.day_number == day_number)
    }

    /// Check that stops partition the day range with no gaps or overlaps
    pub fn stops_are_contiguous(&self) -> bool {
        if self.stops.is_empty() {
            return false;
        }
        if self.stops[0].arrival_day != 1 {
            return false;
        }
        for pair in self.stops.windows(2) {
            if pair[0].departure_day != pair[1].arrival_day {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop(area: &str, nights: u32, arrival: u32) -> Stop {
        Stop {
            id: format!("stop-{}", area),
            area_id: area.to_string(),
            area_name: area.to_uppercase(),
            nights,
            arrival_day: arrival,
            departure_day: arrival + nights,
            is_arrival_city: arrival == 1,
            is_departure_city: false,
            hotel: None,
        }
    }

    #[test]
    fn test_owns_day() {
        let s = stop("a", 4, 1);
        assert!(s.owns_day(1, false));
        assert!(s.owns_day(4, false));
        assert!(!s.owns_day(5, false));
        // Last stop also owns its departure day
        assert!(s.owns_day(5, true));
    }

    #[test]
    fn test_recompute_effort() {
        let mut day = QuickPlanDay {
            day_number: 1,
            date: None,
            stop_id: "s".to_string(),
            morning: Some(DayBlock::new(BlockKind::Activity, "Surf", TimeSlot::Morning, 2.0, 4)),
            afternoon: None,
            evening: Some(DayBlock::new(BlockKind::Meal, "Dinner", TimeSlot::Evening, 1.5, 0)),
            is_transit_day: false,
            effort_points: 99,
            notes: vec![],
        };
        day.recompute_effort();
        assert_eq!(day.effort_points, 4);
    }

    #[test]
    fn test_transfer_days_and_contiguity() {
        let itinerary = QuickPlanItinerary {
            id: "i".to_string(),
            stops: vec![stop("a", 4, 1), stop("b", 3, 5)],
            days: vec![],
            dining_plan: DiningPlan {
                mode: DiningMode::Flexible,
                summary: String::new(),
            },
            confidence_summary: ConfidenceSummary::default(),
            quality_check_passed: true,
            unmet_constraints: vec![],
        };
        assert_eq!(itinerary.transfer_days(), vec![5]);
        assert!(itinerary.stops_are_contiguous());
        assert_eq!(itinerary.total_nights(), 7);
    }
}
