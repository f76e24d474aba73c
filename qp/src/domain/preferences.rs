//! Traveler preferences and confidence tracking
//!
//! `TripPreferences` is mutated incrementally by the orchestrator as the
//! conversation progresses. Dynamic-shaped activity input (bare string or
//! structured record) is normalized into `ActivityIntent` at the boundary;
//! nothing downstream branches on the raw shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Trip pace tier - sets the daily effort budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Pace {
    /// Slow mornings, one thing a day
    Relaxed,
    /// A couple of activities with downtime
    #[default]
    Balanced,
    /// Full days, early starts
    Packed,
}

impl Pace {
    /// Daily effort budget in points for a non-transfer day
    pub fn daily_effort_budget(&self) -> u32 {
        match self {
            Self::Relaxed => 6,
            Self::Balanced => 10,
            Self::Packed => 14,
        }
    }

    /// Effort budget for a transfer day (halved)
    pub fn transfer_effort_budget(&self) -> u32 {
        self.daily_effort_budget() / 2
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "relaxed" | "chill" | "slow" | "easy" => Some(Self::Relaxed),
            "balanced" | "medium" | "moderate" | "mixed" => Some(Self::Balanced),
            "packed" | "busy" | "full" | "intense" => Some(Self::Packed),
            _ => None,
        }
    }
}

impl std::fmt::Display for Pace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Relaxed => write!(f, "relaxed"),
            Self::Balanced => write!(f, "balanced"),
            Self::Packed => write!(f, "packed"),
        }
    }
}

/// Nightly lodging budget range in whole currency units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetRange {
    pub min: u32,
    pub max: u32,
}

impl BudgetRange {
    /// Parse "100-250", "100 to 250", or a single number ("under 200" style
    /// phrasing is handled by the orchestrator before it gets here).
    pub fn parse(s: &str) -> Option<Self> {
        let cleaned: String = s.chars().filter(|c| c.is_ascii_digit() || *c == '-').collect();
        let parts: Vec<&str> = cleaned.split('-').filter(|p| !p.is_empty()).collect();
        match parts.as_slice() {
            [single] => {
                let max: u32 = single.parse().ok()?;
                Some(Self { min: 0, max })
            }
            [min, max] => {
                let min: u32 = min.parse().ok()?;
                let max: u32 = max.parse().ok()?;
                if min > max {
                    return None;
                }
                Some(Self { min, max })
            }
            _ => None,
        }
    }

    pub fn contains(&self, nightly_rate: u32) -> bool {
        nightly_rate >= self.min && nightly_rate <= self.max
    }
}

/// Who is traveling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PartyComposition {
    pub adults: u32,
    pub children: u32,
}

impl PartyComposition {
    pub fn total(&self) -> u32 {
        self.adults + self.children
    }
}

/// Category of activity the traveler is interested in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Surf,
    Hike,
    Beach,
    Food,
    Culture,
    Nightlife,
    Wildlife,
    Shopping,
    Wellness,
    Other,
}

impl ActivityKind {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "surf" | "surfing" => Self::Surf,
            "hike" | "hiking" | "trek" | "trekking" => Self::Hike,
            "beach" | "swimming" | "snorkel" | "snorkeling" => Self::Beach,
            "food" | "eating" | "tacos" | "restaurants" => Self::Food,
            "culture" | "museums" | "history" | "art" => Self::Culture,
            "nightlife" | "bars" | "clubs" => Self::Nightlife,
            "wildlife" | "whales" | "birding" | "whale watching" => Self::Wildlife,
            "shopping" | "markets" => Self::Shopping,
            "wellness" | "yoga" | "spa" => Self::Wellness,
            _ => Self::Other,
        }
    }
}

/// A normalized activity intent
///
/// Caller input may arrive as a bare string ("surfing") or a structured
/// record ({"type": "surf", "priority": 1}). Both shapes normalize here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityIntent {
    pub kind: ActivityKind,
    /// 1 = highest. Used to order per-day activity distribution.
    pub priority: u8,
    /// Preserved original label when the kind parsed to `Other`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_label: Option<String>,
}

impl ActivityIntent {
    pub fn new(kind: ActivityKind, priority: u8) -> Self {
        Self {
            kind,
            priority,
            custom_label: None,
        }
    }

    /// Normalize dynamic-shaped input into a tagged intent
    pub fn from_value(value: &Value, default_priority: u8) -> Option<Self> {
        match value {
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return None;
                }
                let kind = ActivityKind::parse(trimmed);
                let custom_label = (kind == ActivityKind::Other).then(|| trimmed.to_string());
                Some(Self {
                    kind,
                    priority: default_priority,
                    custom_label,
                })
            }
            Value::Object(map) => {
                let label = map.get("type").and_then(|v| v.as_str())?;
                let kind = ActivityKind::parse(label);
                let priority = map
                    .get("priority")
                    .and_then(|v| v.as_u64())
                    .map(|p| p.min(u8::MAX as u64) as u8)
                    .unwrap_or(default_priority);
                let custom_label = map
                    .get("customLabel")
                    .or_else(|| map.get("custom_label"))
                    .and_then(|v| v.as_str())
                    .map(String::from)
                    .or_else(|| (kind == ActivityKind::Other).then(|| label.to_string()));
                Some(Self {
                    kind,
                    priority,
                    custom_label,
                })
            }
            _ => None,
        }
    }
}

/// How the traveler wants dining handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DiningMode {
    /// Schedule specific lunch/dinner picks each day
    Scheduled,
    /// Suggest areas, leave meals open
    #[default]
    Flexible,
    /// Traveler will self-cater, no dining plan
    SelfCatered,
}

impl DiningMode {
    /// Whether lunch/dinner picks should be placed on the schedule
    pub fn schedules_meals(&self) -> bool {
        matches!(self, Self::Scheduled)
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "scheduled" | "plan" | "planned" | "book" => Some(Self::Scheduled),
            "flexible" | "open" | "wing it" => Some(Self::Flexible),
            "self" | "self-catered" | "cook" | "cooking" => Some(Self::SelfCatered),
            _ => None,
        }
    }
}

/// Skill level for skill-gated activities (surfing)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl SkillLevel {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "beginner" | "new" | "first time" | "never" => Some(Self::Beginner),
            "intermediate" | "some" | "ok" | "okay" => Some(Self::Intermediate),
            "advanced" | "expert" | "pro" => Some(Self::Advanced),
            _ => None,
        }
    }
}

/// Accessibility, dietary, and pet flags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TravelFlags {
    pub needs_accessibility: bool,
    pub dietary_restrictions: Vec<String>,
    pub traveling_with_pet: bool,
}

/// Everything the traveler has told us (or we have inferred) about the trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TripPreferences {
    /// Free-text destination ("Baja California Sur")
    pub destination: Option<String>,

    /// Trip length in nights
    pub trip_nights: Option<u32>,

    /// First night of the trip
    pub start_date: Option<chrono::NaiveDate>,

    /// Daily intensity tier
    pub pace: Option<Pace>,

    /// Nightly lodging budget
    pub budget_per_night: Option<BudgetRange>,

    /// Party composition
    pub party: Option<PartyComposition>,

    /// Normalized activity intents, priority-ordered
    pub activities: Vec<ActivityIntent>,

    /// Dining handling
    pub dining_mode: Option<DiningMode>,

    /// Accessibility / dietary / pet flags
    pub flags: TravelFlags,

    /// Pet detail, only meaningful while `flags.traveling_with_pet` is set
    pub pet_type: Option<String>,

    /// Surf skill, only meaningful while a surf intent is present
    pub surf_skill: Option<SkillLevel>,

    /// User-selected area split, if any
    pub split: Option<crate::domain::ItinerarySplit>,

    /// Accumulated free-text feedback from dissatisfaction turns
    pub feedback_notes: Vec<String>,
}

impl TripPreferences {
    /// Whether any surf intent is currently present
    pub fn wants_surf(&self) -> bool {
        self.activities.iter().any(|a| a.kind == ActivityKind::Surf)
    }

    /// Intent kinds in priority order (highest first)
    pub fn intent_kinds(&self) -> Vec<ActivityKind> {
        let mut sorted = self.activities.clone();
        sorted.sort_by_key(|a| a.priority);
        sorted.into_iter().map(|a| a.kind).collect()
    }
}

/// Ordered confidence tag per preference field
///
/// Transitions are monotonic within a field unless the orchestrator
/// explicitly resets the field via go-back. `READY` is the single canonical
/// gate level: field setters write it and follow-up triggers read it, so the
/// two can never drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    #[default]
    Unknown,
    Partial,
    Confirmed,
    Complete,
}

impl ConfidenceLevel {
    /// The canonical "answer is final enough to act on" level
    pub const READY: ConfidenceLevel = ConfidenceLevel::Confirmed;

    pub fn is_ready(&self) -> bool {
        *self >= Self::READY
    }
}
