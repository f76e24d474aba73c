//! Trust validation and seasonal filtering
//!
//! Three independent trust signals, any one sufficient: a mapping-service
//! place match, a curated known-operator match, or at least
//! `min_evidence_sources` distinct social-evidence sources each at or above
//! `min_evidence_score`. A candidate with zero satisfied signals is
//! rejected and counted - never silently dropped.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use crate::config::VerificationConfig;
use crate::domain::Verification;
use crate::providers::PlaceLookup;

use super::dedupe::ActivityCandidate;

/// Result of validating one candidate
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    /// At least one trust signal satisfied
    Verified(Verification),
    /// Zero trust signals satisfied - a normal filtering outcome
    Rejected,
}

/// Validates candidates against the trust tiers
pub struct Validator {
    places: Arc<dyn PlaceLookup>,
    config: VerificationConfig,
}

impl Validator {
    pub fn new(places: Arc<dyn PlaceLookup>, config: VerificationConfig) -> Self {
        Self { places, config }
    }

    /// Validate one candidate for a destination
    ///
    /// A failed place lookup counts as "no match" rather than failing the
    /// candidate; the other two signals are still consulted.
    pub async fn validate(&self, candidate: &ActivityCandidate, destination: &str) -> ValidationOutcome {
        let mut verification = Verification::default();

        // Tier 1: mapping-service place match
        match self.places.lookup_place(&candidate.name, destination).await {
            Ok(Some(place)) => {
                debug!(name = %candidate.name, place_id = %place.place_id, "validate: place match");
                verification.place_id = Some(place.place_id);
            }
            Ok(None) => {}
            Err(e) => {
                debug!(name = %candidate.name, error = %e, "validate: place lookup failed, treating as no match");
            }
        }

        // Tier 2: curated operator table for the destination
        if let Some(operators) = self.config.known_operators.get(&destination.to_lowercase()) {
            let candidate_lower = candidate.name.to_lowercase();
            if let Some(op) = operators.iter().find(|op| {
                let op_lower = op.name.to_lowercase();
                op_lower == candidate_lower || op_lower.contains(&candidate_lower) || candidate_lower.contains(&op_lower)
            }) {
                debug!(name = %candidate.name, operator = %op.name, "validate: operator match");
                verification.operator_url = Some(op.url.clone());
            }
        }

        // Tier 3: sufficient distinct social-evidence corroboration
        let qualifying: Vec<_> = candidate
            .evidence
            .iter()
            .filter(|e| e.score >= self.config.min_evidence_score)
            .collect();
        let distinct_urls: HashSet<&str> = qualifying.iter().map(|e| e.url.as_str()).collect();
        if distinct_urls.len() >= self.config.min_evidence_sources {
            verification.evidence_sources = qualifying.into_iter().cloned().collect();
        }

        if verification.has_place_match() || verification.has_operator() || !verification.evidence_sources.is_empty() {
            ValidationOutcome::Verified(verification)
        } else {
            ValidationOutcome::Rejected
        }
    }

    /// Confidence score for a verification: mapping-service validation
    /// weighs highest, then operator URL, then social evidence density.
    pub fn confidence_score(&self, verification: &Verification) -> f64 {
        let mut score = 0.0;
        if verification.has_place_match() {
            score += 0.5;
        }
        if verification.has_operator() {
            score += 0.3;
        }
        let density = (verification.evidence_sources.len() as f64 / 4.0).min(1.0);
        score += 0.2 * density;
        score.min(1.0)
    }
}

/// Whether a candidate's seasonal window overlaps the trip's month span
///
/// Candidates without a window always pass. `month_span` is the trip's
/// (first, last) month, possibly wrapping the year.
pub fn in_season(candidate: &ActivityCandidate, month_span: Option<(u32, u32)>) -> bool {
    match (candidate.season, month_span) {
        (Some(window), Some((from, to))) => window.overlaps_months(from, to),
        _ => true,
    }
}
