//! Candidate deduplication
//!
//! Exact merge on normalized name, with a word-overlap (Jaccard) fallback
//! for near-duplicates ("Cerritos Beach" / "Playa Cerritos Beach"). Merged
//! candidates sum mention counts, pool evidence, and keep the longer, more
//! descriptive name.

use std::collections::HashSet;

use tracing::debug;

use crate::domain::{ActivityKind, EvidenceSource, SeasonalWindow};

/// Word-overlap threshold above which two names are considered the same
const SIMILARITY_THRESHOLD: f64 = 0.6;

/// A deduplicated candidate flowing toward validation
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityCandidate {
    pub name: String,
    pub kind: ActivityKind,
    pub mentions: u32,
    pub evidence: Vec<EvidenceSource>,
    pub confidence_hint: f64,
    pub season: Option<SeasonalWindow>,
}

fn normalize_name(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn word_set(name: &str) -> HashSet<String> {
    normalize_name(name).split_whitespace().map(String::from).collect()
}

/// Jaccard similarity over word sets
fn similarity(a: &str, b: &str) -> f64 {
    let wa = word_set(a);
    let wb = word_set(b);
    if wa.is_empty() || wb.is_empty() {
        return 0.0;
    }
    let intersection = wa.intersection(&wb).count() as f64;
    let union = wa.union(&wb).count() as f64;
    intersection / union
}

fn merge_into(existing: &mut ActivityCandidate, incoming: ActivityCandidate) {
    existing.mentions += incoming.mentions;
    existing.evidence.extend(incoming.evidence);
    existing.confidence_hint = existing.confidence_hint.max(incoming.confidence_hint);
    if incoming.name.len() > existing.name.len() {
        existing.name = incoming.name;
    }
    if existing.season.is_none() {
        existing.season = incoming.season;
    }
}

/// Deduplicate candidates, merging similar names
pub fn dedupe_candidates(candidates: Vec<ActivityCandidate>) -> Vec<ActivityCandidate> {
    let mut merged: Vec<ActivityCandidate> = Vec::new();

    for candidate in candidates {
        let normalized = normalize_name(&candidate.name);

        let existing = merged.iter_mut().find(|m| {
            normalize_name(&m.name) == normalized || similarity(&m.name, &candidate.name) >= SIMILARITY_THRESHOLD
        });

        match existing {
            Some(slot) => {
                debug!(name = %candidate.name, into = %slot.name, "dedupe: merging candidate");
                merge_into(slot, candidate);
            }
            None => merged.push(candidate),
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(name: &str, mentions: u32, post_idx: usize) -> ActivityCandidate {
        ActivityCandidate {
            name: name.to_string(),
            kind: ActivityKind::Beach,
            mentions,
            evidence: vec![EvidenceSource {
                url: format!("https://example.com/{}", post_idx),
                source: "travel".to_string(),
                score: 12,
            }],
            confidence_hint: 0.5,
            season: None,
        }
    }

    #[test]
    fn test_exact_normalized_merge() {
        let merged = dedupe_candidates(vec![candidate("Cerritos Beach", 1, 0), candidate("cerritos  beach!", 2, 1)]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].mentions, 3);
        assert_eq!(merged[0].evidence.len(), 2);
    }

    #[test]
    fn test_similar_names_merge_keeping_longer() {
        let merged = dedupe_candidates(vec![
            candidate("Cerritos Beach", 1, 0),
            candidate("Playa Cerritos Beach", 1, 1),
        ]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].name, "Playa Cerritos Beach");
        assert_eq!(merged[0].mentions, 2);
        // The surviving entry keeps the first appearance's evidence first
        assert_eq!(merged[0].evidence[0].url, "https://example.com/0");
    }

    #[test]
    fn test_distinct_names_kept() {
        let merged = dedupe_candidates(vec![candidate("Cerritos Beach", 1, 0), candidate("Punta Lobos", 1, 1)]);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_similarity() {
        assert!(similarity("Cerritos Beach", "cerritos beach") > 0.99);
        assert!(similarity("Cerritos Beach", "Playa Cerritos Beach") >= 0.6);
        assert!(similarity("Cerritos Beach", "Hotel California") < 0.2);
    }
}
