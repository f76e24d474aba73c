//! Engine configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Verification pipeline settings
    pub verification: VerificationConfig,

    /// Evidence search fan-out settings
    pub search: SearchConfig,

    /// Background enrichment guard settings
    pub guard: GuardConfig,

    /// Daily schedule settings
    pub schedule: ScheduleConfig,
}

impl EngineConfig {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .quickplan.yml
        let local_config = PathBuf::from(".quickplan.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Verification trust thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VerificationConfig {
    /// Distinct evidence sources required for the social-evidence tier
    #[serde(rename = "min-evidence-sources")]
    pub min_evidence_sources: usize,

    /// Minimum score/upvotes each counted source must carry
    #[serde(rename = "min-evidence-score")]
    pub min_evidence_score: u32,

    /// Curated known operators, keyed by lowercase destination
    #[serde(rename = "known-operators")]
    pub known_operators: std::collections::HashMap<String, Vec<KnownOperator>>,
}

/// A curated operator entry for one destination
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnownOperator {
    pub name: String,
    pub url: String,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        let mut known_operators = std::collections::HashMap::new();
        known_operators.insert(
            "baja california sur".to_string(),
            vec![
                KnownOperator {
                    name: "Mario Surf School".to_string(),
                    url: "https://mariosurfschool.com".to_string(),
                },
                KnownOperator {
                    name: "Todos Santos Eco Adventures".to_string(),
                    url: "https://tosea.net".to_string(),
                },
            ],
        );
        Self {
            min_evidence_sources: 2,
            min_evidence_score: 10,
            known_operators,
        }
    }
}

/// Bounded fan-out settings for evidence search
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Max concurrent evidence queries
    #[serde(rename = "max-concurrent")]
    pub max_concurrent: usize,

    /// Per-query timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,

    /// Fixed delay between query launches in milliseconds
    #[serde(rename = "inter-call-delay-ms")]
    pub inter_call_delay_ms: u64,

    /// Source communities to search
    pub sources: Vec<String>,
}

impl SearchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn inter_call_delay(&self) -> Duration {
        Duration::from_millis(self.inter_call_delay_ms)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_concurrent: 4,
            timeout_ms: 10_000,
            inter_call_delay_ms: 250,
            sources: vec!["travel".to_string(), "solotravel".to_string()],
        }
    }
}

/// Enrichment guard bounds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    /// Max tracked keys
    #[serde(rename = "max-entries")]
    pub max_entries: usize,

    /// Seconds before a key expires and may be re-acquired
    #[serde(rename = "ttl-secs")]
    pub ttl_secs: u64,
}

impl GuardConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            max_entries: 256,
            ttl_secs: 60,
        }
    }
}

/// Daily schedule tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Budget usage fraction below which a free-time filler is appended
    #[serde(rename = "free-time-threshold")]
    pub free_time_threshold: f64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            free_time_threshold: 0.6,
        }
    }
}
