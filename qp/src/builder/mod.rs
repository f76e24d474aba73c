//! Itinerary builder
//!
//! Turns confirmed preferences plus externally gathered candidates into a
//! complete day-by-day schedule. The builder is synchronous and pure: all
//! network-derived inputs (areas, hotels, restaurants, verified activities)
//! arrive as arguments.

use std::collections::HashMap;

use chrono::Days;
use tracing::{debug, info};

use crate::config::ScheduleConfig;
use crate::domain::{
    AreaCandidate, ConfidenceSummary, DiningMode, DiningPlan, HotelCandidate, QuickPlanItinerary,
    RestaurantCandidate, TripPreferences, VerifiedActivity, generate_id,
};
use crate::error::EngineError;

mod distribute;
mod schedule;
mod skeleton;

pub use distribute::distribute_activities;
pub use schedule::{FREE_TIME_EFFORT_COST, TRANSFER_EFFORT_COST, build_day};
pub use skeleton::{build_skeleton, owning_stop, transfer_days};

/// Candidate inputs gathered ahead of the build
pub struct ItineraryInputs<'a> {
    pub preferences: &'a TripPreferences,
    pub areas: &'a [AreaCandidate],
    /// Best lodging candidate per area id
    pub hotels: &'a HashMap<String, HotelCandidate>,
    /// Dining candidates per area id
    pub restaurants: &'a HashMap<String, Vec<RestaurantCandidate>>,
    /// Ranked verified activities, best first
    pub activities: &'a [VerifiedActivity],
}

/// Build a complete itinerary from confirmed preferences
///
/// Fails only on caller contract violations (missing trip length, invalid
/// split). Missing candidates degrade into fallback stops, flexible meal
/// placeholders, and `unmet_constraints` entries.
pub fn generate_itinerary(inputs: &ItineraryInputs, config: &ScheduleConfig) -> Result<QuickPlanItinerary, EngineError> {
    let prefs = inputs.preferences;
    let trip_nights = prefs
        .trip_nights
        .ok_or_else(|| EngineError::Validation("trip_nights is required".to_string()))?;
    if trip_nights < 1 {
        return Err(EngineError::Validation("trip_nights must be >= 1".to_string()));
    }
    let destination = prefs
        .destination
        .as_deref()
        .ok_or_else(|| EngineError::Validation("destination is required".to_string()))?;

    if let Some(split) = &prefs.split {
        split.validate(trip_nights).map_err(EngineError::Validation)?;
    }

    let mut unmet_constraints = Vec::new();
    let mut stops = build_skeleton(destination, trip_nights, prefs.split.as_ref(), inputs.areas);
    for stop in &mut stops {
        match inputs.hotels.get(&stop.area_id) {
            Some(hotel) => {
                if let Some(budget) = &prefs.budget_per_night
                    && !budget.contains(hotel.nightly_rate)
                {
                    unmet_constraints.push(format!(
                        "{}: nightly rate {} is outside the {}-{} budget",
                        hotel.name, hotel.nightly_rate, budget.min, budget.max
                    ));
                }
                if prefs.flags.traveling_with_pet && !hotel.pet_friendly {
                    unmet_constraints.push(format!("{}: not pet-friendly", hotel.name));
                }
                if prefs.flags.needs_accessibility && !hotel.accessible {
                    unmet_constraints.push(format!("{}: no accessibility information", hotel.name));
                }
                stop.hotel = Some(hotel.clone());
            }
            None => {
                unmet_constraints.push(format!("no lodging candidate for {}", stop.area_name));
            }
        }
    }

    let transfers = transfer_days(&stops);
    let assigned = distribute_activities(inputs.activities, trip_nights, &transfers);

    let pace = prefs.pace.unwrap_or_default();
    let dining_mode = prefs.dining_mode.unwrap_or_default();
    let empty: Vec<RestaurantCandidate> = Vec::new();

    let mut days = Vec::with_capacity(trip_nights as usize);
    for day_number in 1..=trip_nights {
        // Skeleton always yields at least one stop, so every day resolves
        let stop = owning_stop(&stops, day_number)
            .ok_or_else(|| EngineError::Validation(format!("day {} has no owning stop", day_number)))?;
        let date = prefs
            .start_date
            .and_then(|start| start.checked_add_days(Days::new(u64::from(day_number - 1))));
        let is_transfer = transfers.contains(&day_number);
        let day_activities = assigned.get(&day_number).map(Vec::as_slice).unwrap_or(&[]);
        let restaurants = inputs.restaurants.get(&stop.area_id).unwrap_or(&empty);

        debug!(day_number, stop = %stop.area_name, is_transfer, "building day");
        days.push(build_day(
            day_number,
            date,
            stop,
            is_transfer,
            pace,
            dining_mode,
            day_activities,
            restaurants,
            config,
        ));
    }

    let confidence_summary = summarize_confidence(prefs);
    let itinerary = QuickPlanItinerary {
        id: generate_id("plan", destination),
        stops,
        days,
        dining_plan: dining_plan(dining_mode),
        confidence_summary,
        quality_check_passed: false,
        unmet_constraints,
    };
    let quality_check_passed = quality_check(&itinerary, pace, trip_nights);
    info!(
        id = %itinerary.id,
        stops = itinerary.stops.len(),
        days = itinerary.days.len(),
        quality_check_passed,
        "itinerary generated"
    );
    Ok(QuickPlanItinerary {
        quality_check_passed,
        ..itinerary
    })
}

/// Structural quality gate over the finished schedule
fn quality_check(itinerary: &QuickPlanItinerary, pace: crate::domain::Pace, trip_nights: u32) -> bool {
    if !itinerary.stops_are_contiguous() {
        return false;
    }
    if itinerary.days.len() != trip_nights as usize {
        return false;
    }
    itinerary.days.iter().all(|day| {
        let budget = if day.is_transit_day {
            pace.transfer_effort_budget()
        } else {
            pace.daily_effort_budget()
        };
        day.effort_points <= budget
    })
}

/// Snapshot of which core preference fields have usable answers
fn summarize_confidence(prefs: &TripPreferences) -> ConfidenceSummary {
    let present = [
        prefs.destination.is_some(),
        prefs.trip_nights.is_some(),
        prefs.pace.is_some(),
        prefs.budget_per_night.is_some(),
        prefs.party.is_some(),
        !prefs.activities.is_empty(),
        prefs.dining_mode.is_some(),
    ];
    let fields_ready = present.iter().filter(|p| **p).count();
    let fields_total = present.len();
    let overall = if fields_ready == fields_total {
        crate::domain::ConfidenceLevel::Complete
    } else if fields_ready > 0 {
        crate::domain::ConfidenceLevel::Partial
    } else {
        crate::domain::ConfidenceLevel::Unknown
    };
    ConfidenceSummary {
        fields_ready,
        fields_total,
        overall,
    }
}

fn dining_plan(mode: DiningMode) -> DiningPlan {
    let summary = match mode {
        DiningMode::Scheduled => "Lunch and dinner picks are scheduled each day; breakfast at your hotel.",
        DiningMode::Flexible => "Dining left open; each area's notes list nearby options.",
        DiningMode::SelfCatered => "Self-catered trip; no restaurants scheduled.",
    };
    DiningPlan {
        mode,
        summary: summary.to_string(),
    }
}
