//! Conversation state machine
//!
//! Owns the preference record, per-field confidence, discovered candidate
//! data, and the turn history. One turn at a time: the entry point takes a
//! synchronous guard before touching state, so a double-submitted turn is
//! rejected immediately rather than racing the first one.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::builder::{ItineraryInputs, generate_itinerary};
use crate::config::ScheduleConfig;
use crate::domain::{
    ActivityIntent, AreaCandidate, BudgetRange, ConfidenceLevel, DiningMode, HotelCandidate, Pace,
    PartyComposition, QuickPlanItinerary, RestaurantCandidate, SkillLevel, TripPreferences, VerifiedActivity,
};
use crate::error::EngineError;

use super::fields::{FieldId, decide_next_field, field_spec, missing_fields};

/// Coarse conversation phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Collecting,
    ReadyToBuild,
    Presented,
}

/// Candidate data gathered by external collaborators during the session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveredData {
    pub areas: Vec<AreaCandidate>,
    pub hotels: HashMap<String, HotelCandidate>,
    pub activities: Vec<VerifiedActivity>,
    pub restaurants: HashMap<String, Vec<RestaurantCandidate>>,
}

/// User input for one turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RawResponse {
    Text(String),
    /// Distinct sentinel; never conflated with free text
    Skip,
}

/// What one turn did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Value parsed and written; field is now ready
    Applied(FieldId),
    /// Field skipped at the user's request
    Skipped(FieldId),
    /// Whitespace-only input; nothing written, ask again
    NoAnswer(FieldId),
    /// Input did not parse; field unchanged, ask again
    Rejected { field: FieldId, message: String },
}

/// One entry of the conversation history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub field: FieldId,
    pub response: RawResponse,
    pub at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Default)]
pub(super) struct OrchestratorState {
    pub phase: Phase,
    pub preferences: TripPreferences,
    pub confidence: BTreeMap<FieldId, ConfidenceLevel>,
    pub discovered: DiscoveredData,
    pub history: Vec<TurnRecord>,
    /// Seed for question phrasing; serialized so restore keeps the voice
    pub seed: u64,
}

/// Drives the preference conversation for one trip session
pub struct PreferenceOrchestrator {
    pub(super) state: OrchestratorState,
    turn_in_progress: AtomicBool,
    rng: StdRng,
}

impl PreferenceOrchestrator {
    pub fn new(seed: u64) -> Self {
        Self {
            state: OrchestratorState {
                seed,
                ..Default::default()
            },
            turn_in_progress: AtomicBool::new(false),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub(super) fn from_state(state: OrchestratorState) -> Self {
        let rng = StdRng::seed_from_u64(state.seed);
        Self {
            state,
            turn_in_progress: AtomicBool::new(false),
            rng,
        }
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn preferences(&self) -> &TripPreferences {
        &self.state.preferences
    }

    pub fn confidence(&self, field: FieldId) -> ConfidenceLevel {
        self.state.confidence.get(&field).copied().unwrap_or_default()
    }

    pub fn history(&self) -> &[TurnRecord] {
        &self.state.history
    }

    pub fn discovered_data(&self) -> &DiscoveredData {
        &self.state.discovered
    }

    pub fn discovered_data_mut(&mut self) -> &mut DiscoveredData {
        &mut self.state.discovered
    }

    /// Next field the conversation should ask about, if any
    pub fn decide_next_field(&self) -> Option<FieldId> {
        decide_next_field(&self.state.preferences, &self.state.confidence)
    }

    /// Fields that apply to this trip and are not yet ready
    pub fn missing_fields(&self) -> Vec<FieldId> {
        missing_fields(&self.state.preferences, &self.state.confidence)
    }

    /// Render the question for the next field, with session-stable variety
    pub fn next_question(&mut self) -> Option<(FieldId, String)> {
        let field = self.decide_next_field()?;
        let templates = question_templates(field);
        let pick = self.rng.random_range(0..templates.len());
        Some((field, templates[pick].to_string()))
    }

    /// Apply one user turn to a field
    ///
    /// Overlapping calls are rejected synchronously; the guard is taken
    /// before any state is read.
    pub fn process_user_response(&mut self, field: FieldId, response: RawResponse) -> Result<TurnOutcome, EngineError> {
        if self
            .turn_in_progress
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            warn!(%field, "turn rejected: prior turn still in progress");
            return Err(EngineError::TurnInProgress);
        }
        let outcome = self.apply_turn(field, response);
        self.turn_in_progress.store(false, Ordering::SeqCst);
        Ok(outcome)
    }

    fn apply_turn(&mut self, field: FieldId, response: RawResponse) -> TurnOutcome {
        let outcome = match &response {
            RawResponse::Skip => {
                if !field_spec(field).skippable {
                    return TurnOutcome::Rejected {
                        field,
                        message: format!("{} is needed before a trip can be built", field),
                    };
                }
                self.state.confidence.insert(field, ConfidenceLevel::READY);
                self.state.history.push(TurnRecord {
                    field,
                    response: RawResponse::Skip,
                    at: chrono::Utc::now(),
                });
                debug!(%field, "field skipped");
                TurnOutcome::Skipped(field)
            }
            RawResponse::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    // Nothing written; the conversation stays live and the
                    // same field is asked again.
                    return TurnOutcome::NoAnswer(field);
                }
                match self.write_field(field, trimmed) {
                    Ok(()) => {
                        self.state.confidence.insert(field, ConfidenceLevel::READY);
                        self.state.history.push(TurnRecord {
                            field,
                            response: response.clone(),
                            at: chrono::Utc::now(),
                        });
                        debug!(%field, "field confirmed");
                        TurnOutcome::Applied(field)
                    }
                    Err(message) => {
                        self.state.confidence.entry(field).or_insert(ConfidenceLevel::Partial);
                        TurnOutcome::Rejected { field, message }
                    }
                }
            }
        };
        if self.state.phase == Phase::Collecting && self.decide_next_field().is_none() {
            info!("all applicable fields ready");
            self.state.phase = Phase::ReadyToBuild;
        }
        outcome
    }

    fn write_field(&mut self, field: FieldId, text: &str) -> Result<(), String> {
        let prefs = &mut self.state.preferences;
        match field {
            FieldId::Destination => {
                prefs.destination = Some(text.to_string());
            }
            FieldId::TripNights => {
                let nights = parse_leading_number(text).ok_or("could not read a number of nights")?;
                if nights < 1 {
                    return Err("trip must be at least one night".to_string());
                }
                prefs.trip_nights = Some(nights);
            }
            FieldId::StartDate => {
                let date = chrono::NaiveDate::parse_from_str(text, "%Y-%m-%d")
                    .map_err(|_| "dates look like 2025-01-10".to_string())?;
                prefs.start_date = Some(date);
            }
            FieldId::Party => {
                prefs.party = Some(parse_party(text).ok_or("could not read the group size")?);
            }
            FieldId::Budget => {
                prefs.budget_per_night = Some(BudgetRange::parse(text).ok_or("budgets look like 100-250")?);
            }
            FieldId::Activities => {
                let intents = parse_activities(text);
                if intents.is_empty() {
                    return Err("name at least one activity".to_string());
                }
                prefs.activities = intents;
            }
            FieldId::SurfSkill => {
                prefs.surf_skill = Some(SkillLevel::parse(text).ok_or("beginner, intermediate, or advanced")?);
            }
            FieldId::Pace => {
                prefs.pace = Some(Pace::parse(text).ok_or("relaxed, balanced, or packed")?);
            }
            FieldId::DiningMode => {
                prefs.dining_mode = Some(DiningMode::parse(text).ok_or("scheduled, flexible, or self-catered")?);
            }
            FieldId::Pets => {
                let with_pet = parse_yes_no(text).ok_or("yes or no")?;
                prefs.flags.traveling_with_pet = with_pet;
                if !with_pet {
                    prefs.pet_type = None;
                }
            }
            FieldId::PetType => {
                prefs.pet_type = Some(text.to_string());
            }
        }
        Ok(())
    }

    /// Clear a field and everything declared dependent on it
    ///
    /// Dependents cascade: clearing `pets` also clears `pet_type`, and any
    /// follow-up whose trigger no longer holds drops out of scheduling on
    /// its own.
    pub fn go_back(&mut self, field: FieldId) {
        self.clear_field(field);
        for dependent in field_spec(field).dependents {
            self.go_back(*dependent);
        }
        if self.state.phase != Phase::Collecting {
            self.state.phase = Phase::Collecting;
        }
        debug!(%field, "went back");
    }

    fn clear_field(&mut self, field: FieldId) {
        let prefs = &mut self.state.preferences;
        match field {
            FieldId::Destination => prefs.destination = None,
            FieldId::TripNights => prefs.trip_nights = None,
            FieldId::StartDate => prefs.start_date = None,
            FieldId::Party => prefs.party = None,
            FieldId::Budget => prefs.budget_per_night = None,
            FieldId::Activities => prefs.activities.clear(),
            FieldId::SurfSkill => prefs.surf_skill = None,
            FieldId::Pace => prefs.pace = None,
            FieldId::DiningMode => prefs.dining_mode = None,
            FieldId::Pets => {
                prefs.flags.traveling_with_pet = false;
                prefs.pet_type = None;
            }
            FieldId::PetType => prefs.pet_type = None,
        }
        self.state.confidence.remove(&field);
    }

    /// Build the itinerary from confirmed preferences and discovered data
    pub fn build_itinerary(&mut self, config: &ScheduleConfig) -> Result<QuickPlanItinerary, EngineError> {
        if self.state.phase == Phase::Collecting {
            return Err(EngineError::Validation(format!(
                "still collecting preferences, missing: {:?}",
                self.missing_fields()
            )));
        }
        let inputs = ItineraryInputs {
            preferences: &self.state.preferences,
            areas: &self.state.discovered.areas,
            hotels: &self.state.discovered.hotels,
            restaurants: &self.state.discovered.restaurants,
            activities: &self.state.discovered.activities,
        };
        let itinerary = generate_itinerary(&inputs, config)?;
        self.state.phase = Phase::Presented;
        Ok(itinerary)
    }

    /// Reset the session for a new trip; the phrasing seed survives
    pub fn reset_trip(&mut self) {
        info!("trip reset");
        let seed = self.state.seed;
        self.state = OrchestratorState {
            seed,
            ..Default::default()
        };
    }
}

fn parse_leading_number(text: &str) -> Option<u32> {
    let digits: String = text.chars().skip_while(|c| !c.is_ascii_digit()).take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}

/// "2 adults and 1 kid" style input: first number is adults, second (if
/// any) is children. A bare number means adults only.
fn parse_party(text: &str) -> Option<PartyComposition> {
    let mut numbers = Vec::new();
    let mut current = String::new();
    for c in text.chars() {
        if c.is_ascii_digit() {
            current.push(c);
        } else if !current.is_empty() {
            numbers.push(current.parse::<u32>().ok()?);
            current.clear();
        }
    }
    if !current.is_empty() {
        numbers.push(current.parse::<u32>().ok()?);
    }
    match numbers.as_slice() {
        [adults] if *adults > 0 => Some(PartyComposition {
            adults: *adults,
            children: 0,
        }),
        [adults, children] if *adults > 0 => Some(PartyComposition {
            adults: *adults,
            children: *children,
        }),
        _ => None,
    }
}

fn parse_activities(text: &str) -> Vec<ActivityIntent> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .enumerate()
        .filter_map(|(idx, label)| {
            ActivityIntent::from_value(&serde_json::Value::String(label.to_string()), (idx + 1) as u8)
        })
        .collect()
}

fn parse_yes_no(text: &str) -> Option<bool> {
    match text.trim().to_lowercase().as_str() {
        "yes" | "y" | "yep" | "yeah" | "true" => Some(true),
        "no" | "n" | "nope" | "false" => Some(false),
        _ => None,
    }
}

fn question_templates(field: FieldId) -> &'static [&'static str] {
    match field {
        FieldId::Destination => &[
            "Where are you headed?",
            "What destination do you have in mind?",
        ],
        FieldId::TripNights => &[
            "How many nights is the trip?",
            "How long are you going for, in nights?",
        ],
        FieldId::StartDate => &[
            "What date does the trip start? (YYYY-MM-DD)",
            "When do you arrive? (YYYY-MM-DD)",
        ],
        FieldId::Party => &[
            "Who's coming? (e.g. 2 adults, 1 kid)",
            "How many travelers, adults and kids?",
        ],
        FieldId::Budget => &[
            "What's your nightly lodging budget? (e.g. 100-250)",
            "Roughly what range per night for lodging?",
        ],
        FieldId::Activities => &[
            "What do you want to do? List a few, most important first.",
            "Which activities matter most on this trip?",
        ],
        FieldId::SurfSkill => &[
            "What's your surf level: beginner, intermediate, or advanced?",
            "How experienced a surfer are you?",
        ],
        FieldId::Pace => &[
            "What pace suits you: relaxed, balanced, or packed?",
            "Slow mornings or full days?",
        ],
        FieldId::DiningMode => &[
            "Should I schedule restaurants, keep dining flexible, or are you self-catering?",
            "How do you want meals handled: scheduled, flexible, or self-catered?",
        ],
        FieldId::Pets => &[
            "Are you traveling with a pet?",
            "Any pets coming along?",
        ],
        FieldId::PetType => &[
            "What kind of pet?",
            "Tell me about the pet so I can check lodging.",
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ActivityKind;

    fn answer(orch: &mut PreferenceOrchestrator, field: FieldId, text: &str) -> TurnOutcome {
        orch.process_user_response(field, RawResponse::Text(text.to_string())).unwrap()
    }

    fn fill_required(orch: &mut PreferenceOrchestrator) {
        answer(orch, FieldId::Destination, "Baja California Sur");
        answer(orch, FieldId::TripNights, "7");
        answer(orch, FieldId::StartDate, "2025-01-10");
        answer(orch, FieldId::Party, "2 adults");
        answer(orch, FieldId::Budget, "100-250");
        answer(orch, FieldId::Activities, "surfing, hiking, tacos");
        answer(orch, FieldId::SurfSkill, "beginner");
        answer(orch, FieldId::Pace, "balanced");
        answer(orch, FieldId::DiningMode, "flexible");
        answer(orch, FieldId::Pets, "no");
    }

    #[test]
    fn test_full_conversation_reaches_ready() {
        let mut orch = PreferenceOrchestrator::new(7);
        assert_eq!(orch.decide_next_field(), Some(FieldId::Destination));
        fill_required(&mut orch);
        assert_eq!(orch.decide_next_field(), None);
        assert_eq!(orch.phase(), Phase::ReadyToBuild);
        assert!(orch.preferences().wants_surf());
        assert_eq!(orch.preferences().trip_nights, Some(7));
    }

    #[test]
    fn test_whitespace_response_keeps_conversation_live() {
        let mut orch = PreferenceOrchestrator::new(1);
        let outcome = answer(&mut orch, FieldId::Destination, "   \n  ");
        assert_eq!(outcome, TurnOutcome::NoAnswer(FieldId::Destination));
        assert!(orch.preferences().destination.is_none());
        // Same field is asked again and a real answer still lands
        assert_eq!(orch.decide_next_field(), Some(FieldId::Destination));
        let outcome = answer(&mut orch, FieldId::Destination, "Baja");
        assert_eq!(outcome, TurnOutcome::Applied(FieldId::Destination));
    }

    #[test]
    fn test_skip_is_recorded_as_sentinel() {
        let mut orch = PreferenceOrchestrator::new(1);
        answer(&mut orch, FieldId::Destination, "Baja");
        let outcome = orch.process_user_response(FieldId::Budget, RawResponse::Skip).unwrap();
        assert_eq!(outcome, TurnOutcome::Skipped(FieldId::Budget));
        assert!(orch.confidence(FieldId::Budget).is_ready());
        assert_eq!(orch.history().last().unwrap().response, RawResponse::Skip);
    }

    #[test]
    fn test_skip_rejected_for_required_core_fields() {
        let mut orch = PreferenceOrchestrator::new(1);
        for field in [FieldId::Destination, FieldId::TripNights] {
            let outcome = orch.process_user_response(field, RawResponse::Skip).unwrap();
            assert!(matches!(outcome, TurnOutcome::Rejected { field: f, .. } if f == field));
            assert!(!orch.confidence(field).is_ready());
        }
        // The phase can never promise a build that would fail on these
        assert_eq!(orch.phase(), Phase::Collecting);
        assert_eq!(orch.decide_next_field(), Some(FieldId::Destination));
    }

    #[test]
    fn test_rejected_input_leaves_field_unset() {
        let mut orch = PreferenceOrchestrator::new(1);
        answer(&mut orch, FieldId::Destination, "Baja");
        let outcome = answer(&mut orch, FieldId::TripNights, "a while");
        assert!(matches!(outcome, TurnOutcome::Rejected { field: FieldId::TripNights, .. }));
        assert!(orch.preferences().trip_nights.is_none());
        assert!(!orch.confidence(FieldId::TripNights).is_ready());
    }

    #[test]
    fn test_go_back_clears_dependents() {
        let mut orch = PreferenceOrchestrator::new(1);
        answer(&mut orch, FieldId::Party, "2");
        answer(&mut orch, FieldId::Pets, "yes");
        answer(&mut orch, FieldId::PetType, "a small dog");
        assert!(orch.preferences().flags.traveling_with_pet);
        assert!(orch.preferences().pet_type.is_some());

        orch.go_back(FieldId::Pets);
        assert!(!orch.preferences().flags.traveling_with_pet);
        assert!(orch.preferences().pet_type.is_none());
        assert!(!orch.confidence(FieldId::Pets).is_ready());
        assert!(!orch.confidence(FieldId::PetType).is_ready());
        // With the flag cleared the follow-up no longer applies
        assert!(!orch.missing_fields().contains(&FieldId::PetType));
    }

    #[test]
    fn test_go_back_on_activities_clears_surf_skill() {
        let mut orch = PreferenceOrchestrator::new(1);
        answer(&mut orch, FieldId::Activities, "surfing");
        answer(&mut orch, FieldId::SurfSkill, "advanced");
        orch.go_back(FieldId::Activities);
        assert!(orch.preferences().activities.is_empty());
        assert!(orch.preferences().surf_skill.is_none());
        assert!(!orch.missing_fields().contains(&FieldId::SurfSkill));
    }

    #[test]
    fn test_overlapping_turn_is_rejected() {
        let mut orch = PreferenceOrchestrator::new(1);
        // Simulate a turn still holding the guard
        orch.turn_in_progress.store(true, Ordering::SeqCst);
        let result = orch.process_user_response(FieldId::Destination, RawResponse::Text("Baja".to_string()));
        assert!(matches!(result, Err(EngineError::TurnInProgress)));
        assert!(orch.preferences().destination.is_none());

        orch.turn_in_progress.store(false, Ordering::SeqCst);
        let outcome = answer(&mut orch, FieldId::Destination, "Baja");
        assert_eq!(outcome, TurnOutcome::Applied(FieldId::Destination));
    }

    #[test]
    fn test_question_phrasing_is_seed_stable() {
        let mut a = PreferenceOrchestrator::new(42);
        let mut b = PreferenceOrchestrator::new(42);
        assert_eq!(a.next_question(), b.next_question());
    }

    #[test]
    fn test_build_refused_while_collecting() {
        let mut orch = PreferenceOrchestrator::new(1);
        let result = orch.build_itinerary(&ScheduleConfig::default());
        assert!(matches!(result, Err(EngineError::Validation(_))));
    }

    #[test]
    fn test_build_after_ready() {
        let mut orch = PreferenceOrchestrator::new(1);
        fill_required(&mut orch);
        assert_eq!(orch.phase(), Phase::ReadyToBuild);
        let itinerary = orch.build_itinerary(&ScheduleConfig::default()).unwrap();
        assert_eq!(itinerary.days.len(), 7);
        assert_eq!(orch.phase(), Phase::Presented);
    }

    #[test]
    fn test_reset_trip_clears_state() {
        let mut orch = PreferenceOrchestrator::new(1);
        fill_required(&mut orch);
        orch.reset_trip();
        assert_eq!(orch.phase(), Phase::Collecting);
        assert!(orch.preferences().destination.is_none());
        assert!(orch.history().is_empty());
        assert_eq!(orch.decide_next_field(), Some(FieldId::Destination));
    }

    #[test]
    fn test_activity_parse_orders_by_priority() {
        let mut orch = PreferenceOrchestrator::new(1);
        answer(&mut orch, FieldId::Activities, "tacos, surfing");
        let kinds = orch.preferences().intent_kinds();
        assert_eq!(kinds, vec![ActivityKind::Food, ActivityKind::Surf]);
    }
}
