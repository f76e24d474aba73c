//! Session persistence
//!
//! The whole session state flattens into one versioned plain record. Every
//! collection inside the discovered data rides along; a record written by an
//! older build that lacks a collection restores it as empty rather than
//! failing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{ConfidenceLevel, TripPreferences};
use crate::error::EngineError;

use super::fields::FieldId;
use super::session::{DiscoveredData, OrchestratorState, Phase, PreferenceOrchestrator, TurnRecord};

pub const STATE_VERSION: u32 = 1;

/// Plain serializable snapshot of a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateRecord {
    pub version: u32,
    pub phase: Phase,
    pub preferences: TripPreferences,
    #[serde(default)]
    pub confidence: BTreeMap<FieldId, ConfidenceLevel>,
    #[serde(default)]
    pub discovered: DiscoveredData,
    #[serde(default)]
    pub history: Vec<TurnRecord>,
    pub seed: u64,
}

impl PreferenceOrchestrator {
    /// Snapshot the session as a plain record
    pub fn serialize(&self) -> StateRecord {
        StateRecord {
            version: STATE_VERSION,
            phase: self.state.phase,
            preferences: self.state.preferences.clone(),
            confidence: self.state.confidence.clone(),
            discovered: self.state.discovered.clone(),
            history: self.state.history.clone(),
            seed: self.state.seed,
        }
    }

    /// Rebuild a session from a snapshot
    pub fn restore(record: StateRecord) -> Result<Self, EngineError> {
        if record.version > STATE_VERSION {
            return Err(EngineError::Validation(format!(
                "state record version {} is newer than supported version {}",
                record.version, STATE_VERSION
            )));
        }
        Ok(Self::from_state(OrchestratorState {
            phase: record.phase,
            preferences: record.preferences,
            confidence: record.confidence,
            discovered: record.discovered,
            history: record.history,
            seed: record.seed,
        }))
    }

    /// Snapshot to a JSON string
    pub fn to_json(&self) -> Result<String, EngineError> {
        Ok(serde_json::to_string(&self.serialize())?)
    }

    /// Rebuild from a JSON string
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let record: StateRecord = serde_json::from_str(json)?;
        Self::restore(record)
    }
}
