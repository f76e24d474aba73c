//! Activity verification pipeline
//!
//! Stages, strictly in order: extract candidate names from raw
//! social-evidence text, deduplicate, validate against tiered trust
//! signals, filter by seasonal availability, rank. Extraction technique is
//! decoupled from trust policy: matchers implement [`Extractor`] and can be
//! swapped without touching validation.

mod dedupe;
mod extract;
mod pipeline;
mod rank;
mod validate;

pub use dedupe::{ActivityCandidate, dedupe_candidates};
pub use extract::{ExtractedCandidate, Extractor, ListItemMatcher, RecommendationMatcher, WorthItMatcher, default_extractors};
pub use pipeline::{PipelineOutcome, PipelineStats, TripQuery, VerificationPipeline};
pub use rank::rank_activities;
pub use validate::{Validator, ValidationOutcome};
