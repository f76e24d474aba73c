//! Preference conversation orchestration
//!
//! State machine for gathering trip preferences turn by turn, scheduling
//! which field to ask about next, and handing off to the builder once every
//! applicable field is confirmed.

mod fields;
mod serialize;
mod session;

pub use fields::{FIELD_TABLE, FieldId, FieldSpec, decide_next_field, field_spec, missing_fields};
pub use serialize::{STATE_VERSION, StateRecord};
pub use session::{DiscoveredData, Phase, PreferenceOrchestrator, RawResponse, TurnOutcome, TurnRecord};
