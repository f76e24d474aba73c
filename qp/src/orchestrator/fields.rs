//! Preference field table and scheduling
//!
//! One declarative table drives the whole conversation: each entry names a
//! field, the fields that must be confirmed before it is asked, the fields
//! cleared alongside it on go-back, and a trigger deciding whether it
//! applies to this trip at all. `decide_next_field` is the only scheduler;
//! no other code decides question order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::{ConfidenceLevel, TripPreferences};

/// Identity of one preference field in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldId {
    Destination,
    TripNights,
    StartDate,
    Party,
    Budget,
    Activities,
    /// Follow-up, only while a surf intent is present
    SurfSkill,
    Pace,
    DiningMode,
    /// Traveling-with-pet flag
    Pets,
    /// Follow-up, only while the pet flag is set
    PetType,
}

impl std::fmt::Display for FieldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Destination => "destination",
            Self::TripNights => "trip_nights",
            Self::StartDate => "start_date",
            Self::Party => "party",
            Self::Budget => "budget",
            Self::Activities => "activities",
            Self::SurfSkill => "surf_skill",
            Self::Pace => "pace",
            Self::DiningMode => "dining_mode",
            Self::Pets => "pets",
            Self::PetType => "pet_type",
        };
        write!(f, "{}", name)
    }
}

/// One row of the conversation schedule
pub struct FieldSpec {
    pub field: FieldId,
    /// Fields that must be ready before this one is asked
    pub prerequisites: &'static [FieldId],
    /// Fields cleared together with this one on go-back
    pub dependents: &'static [FieldId],
    /// Whether this field applies given the current preferences
    pub trigger: fn(&TripPreferences) -> bool,
    /// False for fields the builder cannot start without
    pub skippable: bool,
}

fn always(_: &TripPreferences) -> bool {
    true
}

fn wants_surf(prefs: &TripPreferences) -> bool {
    prefs.wants_surf()
}

fn has_pet(prefs: &TripPreferences) -> bool {
    prefs.flags.traveling_with_pet
}

/// Conversation order. Follow-ups sit directly after the field that
/// triggers them.
pub const FIELD_TABLE: &[FieldSpec] = &[
    FieldSpec {
        field: FieldId::Destination,
        prerequisites: &[],
        dependents: &[],
        trigger: always,
        skippable: false,
    },
    FieldSpec {
        field: FieldId::TripNights,
        prerequisites: &[FieldId::Destination],
        dependents: &[FieldId::StartDate],
        trigger: always,
        skippable: false,
    },
    FieldSpec {
        field: FieldId::StartDate,
        prerequisites: &[FieldId::TripNights],
        dependents: &[],
        trigger: always,
        skippable: true,
    },
    FieldSpec {
        field: FieldId::Party,
        prerequisites: &[FieldId::Destination],
        dependents: &[],
        trigger: always,
        skippable: true,
    },
    FieldSpec {
        field: FieldId::Budget,
        prerequisites: &[FieldId::Party],
        dependents: &[],
        trigger: always,
        skippable: true,
    },
    FieldSpec {
        field: FieldId::Activities,
        prerequisites: &[FieldId::Budget],
        dependents: &[FieldId::SurfSkill],
        trigger: always,
        skippable: true,
    },
    FieldSpec {
        field: FieldId::SurfSkill,
        prerequisites: &[FieldId::Activities],
        dependents: &[],
        trigger: wants_surf,
        skippable: true,
    },
    FieldSpec {
        field: FieldId::Pace,
        prerequisites: &[FieldId::Activities],
        dependents: &[],
        trigger: always,
        skippable: true,
    },
    FieldSpec {
        field: FieldId::DiningMode,
        prerequisites: &[FieldId::Activities],
        dependents: &[],
        trigger: always,
        skippable: true,
    },
    FieldSpec {
        field: FieldId::Pets,
        prerequisites: &[FieldId::Party],
        dependents: &[FieldId::PetType],
        trigger: always,
        skippable: true,
    },
    FieldSpec {
        field: FieldId::PetType,
        prerequisites: &[FieldId::Pets],
        dependents: &[],
        trigger: has_pet,
        skippable: true,
    },
];

pub fn field_spec(field: FieldId) -> &'static FieldSpec {
    // FIELD_TABLE covers every FieldId variant
    FIELD_TABLE.iter().find(|s| s.field == field).unwrap_or(&FIELD_TABLE[0])
}

/// First applicable field not yet ready whose prerequisites are all ready
///
/// Conditional fields drop out of scheduling the moment their trigger stops
/// holding, so a cleared parent never leaves an orphaned follow-up.
pub fn decide_next_field(
    prefs: &TripPreferences,
    confidence: &BTreeMap<FieldId, ConfidenceLevel>,
) -> Option<FieldId> {
    let level = |field: FieldId| confidence.get(&field).copied().unwrap_or_default();
    FIELD_TABLE
        .iter()
        .filter(|spec| (spec.trigger)(prefs))
        .filter(|spec| !level(spec.field).is_ready())
        .find(|spec| spec.prerequisites.iter().all(|p| level(*p).is_ready()))
        .map(|spec| spec.field)
}

/// All fields that currently apply and are not yet ready
pub fn missing_fields(prefs: &TripPreferences, confidence: &BTreeMap<FieldId, ConfidenceLevel>) -> Vec<FieldId> {
    FIELD_TABLE
        .iter()
        .filter(|spec| (spec.trigger)(prefs))
        .filter(|spec| !confidence.get(&spec.field).copied().unwrap_or_default().is_ready())
        .map(|spec| spec.field)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ActivityIntent, ActivityKind};

    fn confirmed(fields: &[FieldId]) -> BTreeMap<FieldId, ConfidenceLevel> {
        fields.iter().map(|f| (*f, ConfidenceLevel::READY)).collect()
    }

    #[test]
    fn test_first_question_is_destination() {
        let prefs = TripPreferences::default();
        assert_eq!(decide_next_field(&prefs, &BTreeMap::new()), Some(FieldId::Destination));
    }

    #[test]
    fn test_prerequisites_gate_scheduling() {
        let prefs = TripPreferences::default();
        // Destination confirmed unlocks both trip_nights and party; trip_nights
        // comes first in table order.
        let confidence = confirmed(&[FieldId::Destination]);
        assert_eq!(decide_next_field(&prefs, &confidence), Some(FieldId::TripNights));
    }

    #[test]
    fn test_surf_skill_only_asked_with_surf_intent() {
        let confidence = confirmed(&[
            FieldId::Destination,
            FieldId::TripNights,
            FieldId::StartDate,
            FieldId::Party,
            FieldId::Budget,
            FieldId::Activities,
        ]);
        let without_surf = TripPreferences {
            activities: vec![ActivityIntent::new(ActivityKind::Hike, 1)],
            ..Default::default()
        };
        assert_eq!(decide_next_field(&without_surf, &confidence), Some(FieldId::Pace));

        let with_surf = TripPreferences {
            activities: vec![ActivityIntent::new(ActivityKind::Surf, 1)],
            ..Default::default()
        };
        assert_eq!(decide_next_field(&with_surf, &confidence), Some(FieldId::SurfSkill));
    }

    #[test]
    fn test_orphaned_followup_leaves_missing_list() {
        let mut prefs = TripPreferences {
            flags: crate::domain::TravelFlags {
                traveling_with_pet: true,
                ..Default::default()
            },
            ..Default::default()
        };
        let confidence = BTreeMap::new();
        assert!(missing_fields(&prefs, &confidence).contains(&FieldId::PetType));

        prefs.flags.traveling_with_pet = false;
        assert!(!missing_fields(&prefs, &confidence).contains(&FieldId::PetType));
    }

    #[test]
    fn test_all_confirmed_yields_none() {
        let prefs = TripPreferences::default();
        let confidence: BTreeMap<_, _> = FIELD_TABLE.iter().map(|s| (s.field, ConfidenceLevel::READY)).collect();
        assert_eq!(decide_next_field(&prefs, &confidence), None);
    }

    #[test]
    fn test_gate_level_matches_setter_level() {
        // The scheduler gate and the level field setters write must agree
        assert!(ConfidenceLevel::READY.is_ready());
        let mut confidence = BTreeMap::new();
        confidence.insert(FieldId::Destination, ConfidenceLevel::READY);
        let prefs = TripPreferences::default();
        assert_ne!(decide_next_field(&prefs, &confidence), Some(FieldId::Destination));
    }
}
