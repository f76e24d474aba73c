//! Dissatisfaction-driven regeneration
//!
//! Targeted repair of a presented itinerary. Each reason in the closed set
//! has its own handler; the dispatch match has no wildcard arm, so a new
//! reason fails to compile until a handler exists. Handlers mutate only the
//! fragments their reason names and recompute effort only on the days they
//! touched. A full rebuild is requested, never performed here.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::{
    BlockKind, DayBlock, DissatisfactionReason, Pace, QuickPlanDay, QuickPlanItinerary, TimeSlot,
    TripPreferences, VerifiedActivity,
};
use crate::llm::{CompletionRequest, LlmClient, Message};
use crate::orchestrator::DiscoveredData;

/// Traveler feedback on a presented itinerary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DissatisfactionFeedback {
    /// Reasons in submission order; handlers compose sequentially
    pub reasons: Vec<DissatisfactionReason>,
    #[serde(default)]
    pub free_text: Option<String>,
}

/// What a regeneration pass did
#[derive(Debug, Clone, Default)]
pub struct RegenOutcome {
    /// Human-readable change descriptions, at least one per reason
    pub changes_applied: Vec<String>,
    /// Non-fatal failures (LLM interpretation, no viable swap found)
    pub errors: Vec<String>,
    /// Set when a reason cannot be repaired in place (area changes)
    pub requires_rebuild: bool,
}

/// Applies reason-specific repairs to a presented itinerary
pub struct DissatisfactionRegenerator {
    llm: Option<Arc<dyn LlmClient>>,
}

impl Default for DissatisfactionRegenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl DissatisfactionRegenerator {
    pub fn new() -> Self {
        Self { llm: None }
    }

    /// Attach a completion client for free-text interpretation
    pub fn with_llm(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm: Some(llm) }
    }

    /// Apply every submitted reason in order
    ///
    /// Later handlers see the itinerary as already modified by earlier ones.
    pub async fn regenerate(
        &self,
        feedback: &DissatisfactionFeedback,
        itinerary: &mut QuickPlanItinerary,
        preferences: &mut TripPreferences,
        discovered: &DiscoveredData,
    ) -> RegenOutcome {
        let mut outcome = RegenOutcome::default();

        if let Some(text) = feedback.free_text.as_deref().map(str::trim)
            && !text.is_empty()
        {
            preferences.feedback_notes.push(text.to_string());
        }

        for reason in &feedback.reasons {
            debug!(%reason, "applying regeneration handler");
            let changes = match reason {
                DissatisfactionReason::WrongAreas => self.handle_wrong_areas(&mut outcome),
                DissatisfactionReason::WrongVibe => {
                    self.handle_wrong_vibe(feedback, itinerary, &mut outcome).await
                }
                DissatisfactionReason::TooPacked => handle_too_packed(itinerary, preferences),
                DissatisfactionReason::TooChill => handle_too_chill(itinerary, preferences, discovered),
                DissatisfactionReason::SurfDaysWrong => handle_surf_days(itinerary, preferences, discovered),
                DissatisfactionReason::DiningWrong => handle_dining(itinerary, discovered),
                DissatisfactionReason::TooTouristy => handle_too_touristy(itinerary, preferences, discovered),
                DissatisfactionReason::MissingActivity => {
                    self.handle_missing_activity(feedback, itinerary, preferences, discovered, &mut outcome)
                        .await
                }
                DissatisfactionReason::HotelWrong => handle_hotel(itinerary),
                DissatisfactionReason::BudgetExceeded => handle_budget(itinerary, preferences),
                DissatisfactionReason::Other => self.handle_other(feedback, &mut outcome).await,
            };
            if changes.is_empty() {
                // A reported problem must never vanish without a trace
                outcome.changes_applied.push(format!("noted your {} feedback for the next revision", reason));
            } else {
                outcome.changes_applied.extend(changes);
            }
        }
        outcome
    }

    /// Ask the completion client to compress free text into one adjustment
    /// sentence. Failure is recorded and the caller falls back.
    async fn interpret_free_text(&self, text: &str, outcome: &mut RegenOutcome) -> Option<String> {
        let llm = self.llm.as_ref()?;
        let request = CompletionRequest::new(
            vec![
                Message::system(
                    "Summarize the traveler's complaint as one short adjustment instruction for a trip planner.",
                ),
                Message::user(text),
            ],
            0.2,
        );
        match llm.complete(request).await {
            Ok(summary) => Some(summary.trim().to_string()),
            Err(err) => {
                warn!(error = %err, "free-text interpretation failed, degrading");
                outcome.errors.push(format!("feedback interpretation failed: {}", err));
                None
            }
        }
    }

    fn handle_wrong_areas(&self, outcome: &mut RegenOutcome) -> Vec<String> {
        // Area changes invalidate the skeleton; nothing here can repair
        // stops in place.
        outcome.requires_rebuild = true;
        vec!["marked the area selection for re-discovery; the itinerary will be rebuilt".to_string()]
    }

    async fn handle_wrong_vibe(
        &self,
        feedback: &DissatisfactionFeedback,
        itinerary: &mut QuickPlanItinerary,
        outcome: &mut RegenOutcome,
    ) -> Vec<String> {
        let mut changes = Vec::new();
        if let Some(text) = feedback.free_text.as_deref()
            && let Some(summary) = self.interpret_free_text(text, outcome).await
        {
            changes.push(format!("adjusting for: {}", summary));
        }
        for day in &mut itinerary.days {
            for slot in TimeSlot::ALL {
                if let Some(block) = day.slot_mut(slot).as_mut()
                    && block.kind == BlockKind::Free
                {
                    block.title = "Low-key local time".to_string();
                    changes.push(format!("day {}: swapped free time for a quieter option", day.day_number));
                }
            }
        }
        changes
    }

    async fn handle_missing_activity(
        &self,
        feedback: &DissatisfactionFeedback,
        itinerary: &mut QuickPlanItinerary,
        preferences: &TripPreferences,
        discovered: &DiscoveredData,
        outcome: &mut RegenOutcome,
    ) -> Vec<String> {
        let wanted = match feedback.free_text.as_deref() {
            Some(text) => self
                .interpret_free_text(text, outcome)
                .await
                .unwrap_or_else(|| text.trim().to_string()),
            None => String::new(),
        };
        let scheduled: Vec<String> = itinerary
            .days
            .iter()
            .flat_map(|d| d.blocks())
            .map(|b| b.title.clone())
            .collect();
        let candidate = discovered.activities.iter().find(|a| {
            !scheduled.contains(&a.name)
                && (wanted.is_empty() || a.name.to_lowercase().contains(&wanted.to_lowercase()))
        });
        match candidate {
            Some(activity) => place_activity(itinerary, preferences, activity),
            None => {
                let label = if wanted.is_empty() { "the requested activity".to_string() } else { wanted };
                itinerary.unmet_constraints.push(format!("could not schedule {}", label));
                vec![format!("no verified match for {}; recorded it as an open request", label)]
            }
        }
    }

    async fn handle_other(&self, feedback: &DissatisfactionFeedback, outcome: &mut RegenOutcome) -> Vec<String> {
        if let Some(text) = feedback.free_text.as_deref()
            && let Some(summary) = self.interpret_free_text(text, outcome).await
        {
            return vec![format!("noted: {}", summary)];
        }
        vec!["noted your feedback for the next revision".to_string()]
    }
}

/// Thin afternoon activity blocks on overfull days
fn handle_too_packed(itinerary: &mut QuickPlanItinerary, preferences: &mut TripPreferences) -> Vec<String> {
    let mut changes = Vec::new();
    if let Some(pace) = preferences.pace
        && pace == Pace::Packed
    {
        preferences.pace = Some(Pace::Balanced);
        changes.push("dialed the pace down from packed to balanced".to_string());
    }
    for day in &mut itinerary.days {
        let has_multiple_activities = day.blocks().filter(|b| b.kind == BlockKind::Activity).count() >= 2;
        if has_multiple_activities
            && let Some(block) = &day.afternoon
            && block.kind == BlockKind::Activity
        {
            let title = block.title.clone();
            day.afternoon = None;
            day.recompute_effort();
            changes.push(format!("day {}: dropped '{}' to open up the afternoon", day.day_number, title));
        }
    }
    changes
}

/// Fill spare capacity with not-yet-scheduled verified activities
fn handle_too_chill(
    itinerary: &mut QuickPlanItinerary,
    preferences: &mut TripPreferences,
    discovered: &DiscoveredData,
) -> Vec<String> {
    let mut changes = Vec::new();
    if let Some(pace) = preferences.pace
        && pace == Pace::Relaxed
    {
        preferences.pace = Some(Pace::Balanced);
        changes.push("stepped the pace up from relaxed to balanced".to_string());
    }
    let pace = preferences.pace.unwrap_or_default();
    let scheduled: Vec<String> = itinerary
        .days
        .iter()
        .flat_map(|d| d.blocks())
        .map(|b| b.title.clone())
        .collect();
    let mut extras = discovered.activities.iter().filter(|a| !scheduled.contains(&a.name));

    for day in &mut itinerary.days {
        if day.is_transit_day {
            continue;
        }
        let budget = pace.daily_effort_budget();
        let Some(slot) = first_free_slot(day) else { continue };
        let Some(extra) = extras.next() else { break };
        if day.effort_points + extra.effort_points > budget {
            continue;
        }
        *day.slot_mut(slot) = Some(DayBlock::new(
            BlockKind::Activity,
            extra.name.clone(),
            slot,
            extra.duration_hours,
            extra.effort_points,
        ));
        day.recompute_effort();
        changes.push(format!("day {}: added '{}'", day.day_number, extra.name));
    }
    changes
}

/// Rebalance surf sessions against the traveler's surf intent
fn handle_surf_days(
    itinerary: &mut QuickPlanItinerary,
    preferences: &TripPreferences,
    discovered: &DiscoveredData,
) -> Vec<String> {
    use crate::domain::ActivityKind;
    let mut changes = Vec::new();
    let surf_names: Vec<&VerifiedActivity> =
        discovered.activities.iter().filter(|a| a.kind == ActivityKind::Surf).collect();

    if !preferences.wants_surf() {
        // Surf fell out of the intents; clear any surf blocks
        for day in &mut itinerary.days {
            for slot in TimeSlot::ALL {
                let is_surf = day
                    .slot(slot)
                    .map(|b| surf_names.iter().any(|a| a.name == b.title))
                    .unwrap_or(false);
                if is_surf {
                    *day.slot_mut(slot) = None;
                    day.recompute_effort();
                    changes.push(format!("day {}: removed a surf session", day.day_number));
                }
            }
        }
        return changes;
    }

    let scheduled: Vec<String> = itinerary
        .days
        .iter()
        .flat_map(|d| d.blocks())
        .map(|b| b.title.clone())
        .collect();
    let pace = preferences.pace.unwrap_or_default();
    let mut unscheduled = surf_names.iter().filter(|a| !scheduled.contains(&a.name));

    // Surf works best in the morning; claim free mornings first
    for day in &mut itinerary.days {
        if day.is_transit_day || day.morning.is_some() {
            continue;
        }
        let Some(surf) = unscheduled.next() else { break };
        if day.effort_points + surf.effort_points > pace.daily_effort_budget() {
            continue;
        }
        day.morning = Some(DayBlock::new(
            BlockKind::Activity,
            surf.name.clone(),
            TimeSlot::Morning,
            surf.duration_hours,
            surf.effort_points,
        ));
        day.recompute_effort();
        changes.push(format!("day {}: added a morning surf session at {}", day.day_number, surf.name));
    }
    changes
}

/// Re-pick scheduled meals with a rotated, still-deterministic offset
fn handle_dining(itinerary: &mut QuickPlanItinerary, discovered: &DiscoveredData) -> Vec<String> {
    let mut changes = Vec::new();
    let stops = itinerary.stops.clone();
    for day in &mut itinerary.days {
        let Some(stop) = stops.iter().find(|s| s.id == day.stop_id) else { continue };
        let Some(restaurants) = discovered.restaurants.get(&stop.area_id) else { continue };
        for (slot, label, suits) in [
            (TimeSlot::Afternoon, "Lunch", true),
            (TimeSlot::Evening, "Dinner", false),
        ] {
            let is_meal = day.slot(slot).map(|b| b.kind == BlockKind::Meal).unwrap_or(false);
            if !is_meal {
                continue;
            }
            let qualifying: Vec<_> = restaurants
                .iter()
                .filter(|r| if suits { r.suits_lunch() } else { r.suits_dinner() })
                .collect();
            if qualifying.is_empty() {
                continue;
            }
            // Offset by one relative to the original rotation
            let pick = qualifying[(day.day_number as usize + 1) % qualifying.len()];
            if let Some(block) = day.slot_mut(slot).as_mut() {
                let new_title = format!("{} at {}", label, pick.name);
                if block.title != new_title {
                    block.title = new_title;
                    changes.push(format!("day {}: switched {} to {}", day.day_number, label.to_lowercase(), pick.name));
                }
            }
        }
    }
    changes
}

/// Swap heavily-mentioned picks for quieter verified alternatives
fn handle_too_touristy(
    itinerary: &mut QuickPlanItinerary,
    preferences: &TripPreferences,
    discovered: &DiscoveredData,
) -> Vec<String> {
    let mut changes = Vec::new();
    let pace = preferences.pace.unwrap_or_default();
    let scheduled: Vec<String> = itinerary
        .days
        .iter()
        .flat_map(|d| d.blocks())
        .map(|b| b.title.clone())
        .collect();
    // Quieter means fewer mentions among still-verified activities
    let mut quiet: Vec<&VerifiedActivity> =
        discovered.activities.iter().filter(|a| !scheduled.contains(&a.name)).collect();
    quiet.sort_by_key(|a| a.reddit_mentions);

    for day in &mut itinerary.days {
        let budget = if day.is_transit_day { pace.transfer_effort_budget() } else { pace.daily_effort_budget() };
        for slot in TimeSlot::ALL {
            let loud = day.slot(slot).and_then(|b| {
                (b.kind == BlockKind::Activity)
                    .then(|| discovered.activities.iter().find(|a| a.name == b.title && a.reddit_mentions >= 50))
                    .flatten()
            });
            if let Some(loud) = loud {
                let freed = day.slot(slot).map(|b| b.effort_cost).unwrap_or(0);
                // Quietest candidate that still fits the day's pace budget
                let fit = quiet
                    .iter()
                    .position(|a| day.effort_points - freed + a.effort_points <= budget);
                let Some(idx) = fit else { continue };
                let replacement = quiet.remove(idx);
                let old = loud.name.clone();
                *day.slot_mut(slot) = Some(DayBlock::new(
                    BlockKind::Activity,
                    replacement.name.clone(),
                    slot,
                    replacement.duration_hours,
                    replacement.effort_points,
                ));
                day.recompute_effort();
                changes.push(format!("day {}: swapped '{}' for quieter '{}'", day.day_number, old, replacement.name));
            }
        }
    }
    changes
}

/// Detach rejected lodging; re-selection happens upstream
fn handle_hotel(itinerary: &mut QuickPlanItinerary) -> Vec<String> {
    let mut changes = Vec::new();
    for stop in &mut itinerary.stops {
        if let Some(hotel) = stop.hotel.take() {
            itinerary.unmet_constraints.push(format!("lodging for {} needs re-selection", stop.area_name));
            changes.push(format!("released {} in {}; will propose alternatives", hotel.name, stop.area_name));
        }
    }
    changes
}

/// Drop lodging that blows the nightly budget
fn handle_budget(itinerary: &mut QuickPlanItinerary, preferences: &TripPreferences) -> Vec<String> {
    let mut changes = Vec::new();
    let Some(budget) = preferences.budget_per_night else {
        return changes;
    };
    for stop in &mut itinerary.stops {
        let over = stop.hotel.as_ref().map(|h| !budget.contains(h.nightly_rate)).unwrap_or(false);
        if over
            && let Some(hotel) = stop.hotel.take()
        {
            itinerary
                .unmet_constraints
                .push(format!("{} exceeds the {}-{} nightly budget", hotel.name, budget.min, budget.max));
            changes.push(format!("removed {} ({}/night) to get back under budget", hotel.name, hotel.nightly_rate));
        }
    }
    changes
}

fn place_activity(
    itinerary: &mut QuickPlanItinerary,
    preferences: &TripPreferences,
    activity: &VerifiedActivity,
) -> Vec<String> {
    let pace = preferences.pace.unwrap_or_default();
    for day in &mut itinerary.days {
        if day.is_transit_day {
            continue;
        }
        if day.effort_points + activity.effort_points > pace.daily_effort_budget() {
            continue;
        }
        let Some(slot) = first_free_slot(day) else { continue };
        *day.slot_mut(slot) = Some(DayBlock::new(
            BlockKind::Activity,
            activity.name.clone(),
            slot,
            activity.duration_hours,
            activity.effort_points,
        ));
        day.recompute_effort();
        return vec![format!("day {}: added '{}'", day.day_number, activity.name)];
    }
    itinerary.unmet_constraints.push(format!("no room left to schedule {}", activity.name));
    vec![format!("could not fit '{}' without breaking the pace budget", activity.name)]
}

fn first_free_slot(day: &QuickPlanDay) -> Option<TimeSlot> {
    TimeSlot::ALL.into_iter().find(|slot| day.slot(*slot).is_none())
}
