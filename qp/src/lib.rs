//! QuickPlan - adaptive travel itinerary engine
//!
//! Turns a short preference conversation plus social-evidence research into
//! a verified, day-by-day trip plan, then repairs it in place when the
//! traveler pushes back.
//!
//! # Architecture
//!
//! ```text
//! user turns ──▶ orchestrator ──▶ builder ──▶ itinerary
//!                     │               ▲            │
//!                     │    discovered │            ▼
//!                     └──▶ verify ────┘         regen ──▶ change log
//! ```
//!
//! The orchestrator gathers preferences field by field. The verification
//! pipeline extracts, deduplicates, validates, and ranks activity
//! candidates from social evidence. The builder composes stops, daily
//! schedules, and meals under per-pace effort budgets. The regenerator
//! applies targeted repairs keyed by dissatisfaction reason.

pub mod builder;
pub mod cache;
pub mod config;
pub mod domain;
pub mod error;
pub mod llm;
pub mod orchestrator;
pub mod providers;
pub mod regen;
pub mod verify;

pub use builder::{ItineraryInputs, generate_itinerary};
pub use config::EngineConfig;
pub use error::{EngineError, ExtractionFailure};
pub use orchestrator::{PreferenceOrchestrator, RawResponse, StateRecord, TurnOutcome};
pub use regen::{DissatisfactionFeedback, DissatisfactionRegenerator, RegenOutcome};
pub use verify::{PipelineOutcome, VerificationPipeline};
