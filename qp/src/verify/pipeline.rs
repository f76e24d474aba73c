//! Verification pipeline driver
//!
//! Runs extract -> dedupe -> validate -> seasonal filter -> rank. Evidence
//! searches fan out with bounded concurrency; each call carries its own
//! timeout and a fixed inter-call delay to respect upstream rate limits. A
//! failed call is recorded and skipped, never aborting the whole run.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::config::{SearchConfig, VerificationConfig};
use crate::domain::{ActivityKind, EvidenceSource, VerifiedActivity, generate_id};
use crate::error::ExtractionFailure;
use crate::providers::{EvidenceSearch, PlaceLookup, RawPost};

use super::dedupe::{ActivityCandidate, dedupe_candidates};
use super::extract::{Extractor, default_extractors};
use super::rank::rank_activities;
use super::validate::{ValidationOutcome, Validator, in_season};

/// What the pipeline is searching for
#[derive(Debug, Clone, Default)]
pub struct TripQuery {
    pub destination: String,
    /// Area names to build query variants for
    pub areas: Vec<String>,
    /// Trip month span (first, last), possibly wrapping the year
    pub month_span: Option<(u32, u32)>,
    /// Activity kinds the traveler asked for
    pub intents: Vec<ActivityKind>,
}

/// Counters for every pipeline stage
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct PipelineStats {
    pub queries_run: usize,
    pub queries_failed: usize,
    pub posts_scanned: usize,
    pub candidates_extracted: usize,
    pub candidates_after_dedupe: usize,
    pub rejected_no_signal: usize,
    pub rejected_out_of_season: usize,
    pub verified: usize,
}

/// Pipeline output: verified activities plus what happened along the way
#[derive(Debug)]
pub struct PipelineOutcome {
    pub activities: Vec<VerifiedActivity>,
    pub stats: PipelineStats,
    pub errors: Vec<ExtractionFailure>,
}

/// The activity verification pipeline
pub struct VerificationPipeline {
    search: Arc<dyn EvidenceSearch>,
    validator: Validator,
    extractors: Vec<Box<dyn Extractor>>,
    search_config: SearchConfig,
}

impl VerificationPipeline {
    pub fn new(
        search: Arc<dyn EvidenceSearch>,
        places: Arc<dyn PlaceLookup>,
        verification: VerificationConfig,
        search_config: SearchConfig,
    ) -> Self {
        Self {
            search,
            validator: Validator::new(places, verification),
            extractors: default_extractors(),
            search_config,
        }
    }

    /// Replace the matcher set (trust policy is unaffected)
    pub fn with_extractors(mut self, extractors: Vec<Box<dyn Extractor>>) -> Self {
        self.extractors = extractors;
        self
    }

    /// Query variants issued per area
    fn build_queries(&self, query: &TripQuery) -> Vec<String> {
        let mut queries = Vec::new();
        for area in &query.areas {
            queries.push(format!("best things to do in {}", area));
            queries.push(format!("{} hidden gems", area));
            for intent in &query.intents {
                queries.push(format!("{} {:?} recommendations", area, intent).to_lowercase());
            }
        }
        if queries.is_empty() {
            queries.push(format!("best things to do in {}", query.destination));
        }
        queries
    }

    /// Run all evidence searches with bounded fan-out
    async fn gather_posts(&self, queries: Vec<String>) -> (Vec<RawPost>, Vec<ExtractionFailure>) {
        let timeout = self.search_config.timeout();
        let delay = self.search_config.inter_call_delay();
        let sources = self.search_config.sources.clone();

        let results: Vec<(String, eyre::Result<Vec<RawPost>>)> = stream::iter(queries.into_iter().enumerate())
            .map(|(idx, query)| {
                let search = Arc::clone(&self.search);
                let sources = sources.clone();
                async move {
                    // Stagger launches to respect upstream rate limits
                    tokio::time::sleep(delay * idx as u32).await;
                    let result = match tokio::time::timeout(timeout, search.search_evidence(&query, &sources)).await {
                        Ok(inner) => inner,
                        Err(_) => Err(eyre::eyre!("timed out after {:?}", timeout)),
                    };
                    (query, result)
                }
            })
            .buffer_unordered(self.search_config.max_concurrent)
            .collect()
            .await;

        let mut posts: Vec<RawPost> = Vec::new();
        let mut seen_urls = std::collections::HashSet::new();
        let mut errors = Vec::new();
        for (query, result) in results {
            match result {
                Ok(found) => {
                    debug!(%query, count = found.len(), "gather_posts: query succeeded");
                    // Query variants overlap; the same post counts once
                    for post in found {
                        if seen_urls.insert(post.url.clone()) {
                            posts.push(post);
                        }
                    }
                }
                Err(e) => {
                    warn!(%query, error = %e, "gather_posts: query failed, continuing");
                    errors.push(ExtractionFailure {
                        query,
                        message: e.to_string(),
                    });
                }
            }
        }
        (posts, errors)
    }

    /// Extract raw candidates from posts using the matcher set
    fn extract_candidates(&self, posts: &[RawPost]) -> Vec<ActivityCandidate> {
        let mut candidates = Vec::new();
        for post in posts {
            let evidence = EvidenceSource {
                url: post.url.clone(),
                source: post.source.clone(),
                score: post.score,
            };
            for extractor in &self.extractors {
                for found in extractor.extract(post) {
                    candidates.push(ActivityCandidate {
                        name: found.name,
                        kind: found.kind,
                        mentions: 1,
                        evidence: vec![evidence.clone()],
                        confidence_hint: found.confidence_hint,
                        season: found.season,
                    });
                }
            }
        }
        candidates
    }

    /// Run the full pipeline for a trip
    pub async fn run(&self, query: &TripQuery) -> PipelineOutcome {
        let mut stats = PipelineStats::default();

        let queries = self.build_queries(query);
        stats.queries_run = queries.len();

        let (posts, errors) = self.gather_posts(queries).await;
        stats.queries_failed = errors.len();
        stats.posts_scanned = posts.len();

        let extracted = self.extract_candidates(&posts);
        stats.candidates_extracted = extracted.len();

        let deduped = dedupe_candidates(extracted);
        stats.candidates_after_dedupe = deduped.len();

        let mut activities = Vec::new();
        for candidate in deduped {
            match self.validator.validate(&candidate, &query.destination).await {
                ValidationOutcome::Verified(verification) => {
                    if !in_season(&candidate, query.month_span) {
                        debug!(name = %candidate.name, "run: out of season for this trip");
                        stats.rejected_out_of_season += 1;
                        continue;
                    }
                    let confidence_score = self.validator.confidence_score(&verification);
                    let relevance_score = if query.intents.contains(&candidate.kind) {
                        0.9
                    } else {
                        0.5 * (1.0 + candidate.confidence_hint).min(1.6)
                    };
                    activities.push(VerifiedActivity {
                        id: generate_id("act", &candidate.name),
                        name: candidate.name,
                        kind: candidate.kind,
                        location: None,
                        reddit_evidence: candidate.evidence.clone(),
                        verification,
                        effort_points: effort_for_kind(candidate.kind),
                        duration_hours: duration_for_kind(candidate.kind),
                        reddit_mentions: candidate.mentions,
                        seasonal_availability: candidate.season,
                        relevance_score,
                        confidence_score,
                    });
                }
                ValidationOutcome::Rejected => {
                    stats.rejected_no_signal += 1;
                }
            }
        }

        rank_activities(&mut activities, &query.intents);
        stats.verified = activities.len();

        info!(
            verified = stats.verified,
            rejected = stats.rejected_no_signal,
            failed_queries = stats.queries_failed,
            "Verification pipeline complete"
        );

        PipelineOutcome {
            activities,
            stats,
            errors,
        }
    }
}

/// Effort points one activity of this kind consumes
pub fn effort_for_kind(kind: ActivityKind) -> u32 {
    match kind {
        ActivityKind::Surf => 4,
        ActivityKind::Hike => 5,
        ActivityKind::Beach => 2,
        ActivityKind::Food => 2,
        ActivityKind::Culture => 3,
        ActivityKind::Nightlife => 3,
        ActivityKind::Wildlife => 4,
        ActivityKind::Shopping => 2,
        ActivityKind::Wellness => 2,
        ActivityKind::Other => 3,
    }
}

fn duration_for_kind(kind: ActivityKind) -> f32 {
    match kind {
        ActivityKind::Surf => 3.0,
        ActivityKind::Hike => 4.0,
        ActivityKind::Beach => 3.0,
        ActivityKind::Food => 1.5,
        ActivityKind::Culture => 2.0,
        ActivityKind::Nightlife => 3.0,
        ActivityKind::Wildlife => 3.0,
        ActivityKind::Shopping => 2.0,
        ActivityKind::Wellness => 1.5,
        ActivityKind::Other => 2.0,
    }
}
